//! Slugification and the persisted artifact filename convention
//!
//! Slugs are lossy: `"my param"`, `"my-param"` and `"My_Param"` all map to
//! `"my-param"`. Callers that derive column keys from slugs must expect
//! collisions.

use chrono::{DateTime, TimeZone};

/// Timestamp layout embedded in slugs and filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Convert arbitrary text into a lowercase, hyphen-separated identifier.
#[must_use]
pub fn slugify(text: &str) -> String {
    ::slug::slugify(text)
}

/// Slug of an instant rendered as `YYYYMMDDHHMMSS` in its own timezone.
#[must_use]
pub fn timestamp_slug<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    slugify(&instant.format(TIMESTAMP_FORMAT).to_string())
}

/// Filename for a persisted artifact: `{slug(name)}-{slug(timestamp)}.{suffix}`.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use scribe_arrow::naming::artifact_filename;
///
/// let created_at = Utc.with_ymd_and_hms(2025, 1, 20, 13, 23, 30).unwrap();
/// assert_eq!(
///     artifact_filename("My output file", &created_at, "csv"),
///     "my-output-file-20250120132330.csv"
/// );
/// ```
#[must_use]
pub fn artifact_filename<Tz: TimeZone>(name: &str, created_at: &DateTime<Tz>, suffix: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}-{}.{suffix}", slugify(name), timestamp_slug(created_at))
}

/// Globally unique experiment slug: `slug(name + "-" + YYYYMMDDHHMMSS)`.
#[must_use]
pub fn experiment_slug<Tz: TimeZone>(name: &str, created_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    slugify(&format!("{name}-{}", created_at.format(TIMESTAMP_FORMAT)))
}
