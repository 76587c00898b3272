//! Artifact Record - metadata of a persisted experiment output

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::naming::artifact_filename;

/// Artifact Record describes a stored artifact.
///
/// Only metadata is tracked here; the payload lives in the file named by
/// `filename` and is read back through the handler named by `handler`.
///
/// ## Filename Format
///
/// Unless supplied explicitly, the filename follows
/// `{slug(name)}-{YYYYMMDDHHMMSS}.{suffix}`, e.g.
/// `features-20250120132330.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRecord {
    name: String,
    filename: String,
    handler: String,
    version: i64,
    created_at: DateTime<FixedOffset>,
    runtime_version: Option<String>,
}

impl ArtifactRecord {
    /// Create a new artifact record at version 0.
    ///
    /// # Arguments
    ///
    /// * `name` - Artifact name (e.g., "features")
    /// * `handler` - Handler alias (e.g., "csv", "json")
    /// * `suffix` - File suffix used to derive the filename
    /// * `created_at` - Creation instant
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        handler: impl Into<String>,
        suffix: &str,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        let name = name.into();
        Self {
            filename: artifact_filename(&name, &created_at, suffix),
            name,
            handler: handler.into(),
            version: 0,
            created_at,
            runtime_version: None,
        }
    }

    /// Replace the derived filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the artifact version.
    #[must_use]
    pub const fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Record the runtime version that produced the artifact.
    #[must_use]
    pub fn with_runtime_version(mut self, runtime_version: impl Into<String>) -> Self {
        self.runtime_version = Some(runtime_version.into());
        self
    }

    /// Get the artifact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the persisted filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Get the handler alias.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Get the version (monotonic per name).
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    /// Get the originating runtime version, if the handler reports one.
    #[must_use]
    pub fn runtime_version(&self) -> Option<&str> {
        self.runtime_version.as_deref()
    }
}
