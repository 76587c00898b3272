//! Artifact handlers (CSV, Parquet)
//!
//! A handler knows how to persist one kind of artifact: it carries the
//! artifact's metadata ([`ArtifactMeta`]) and reads/writes the payload
//! through a caller-supplied byte stream. The host registry dispatches on
//! [`ArtifactHandler::ALIAS`] and opens files in binary mode when
//! [`ArtifactHandler::BINARY`] is set.
//!
//! ## Example
//!
//! ```rust
//! use arrow::array::{ArrayRef, StringArray};
//! use arrow::record_batch::RecordBatch;
//! use scribe_arrow::handler::{ArtifactHandler, CsvArtifact, CsvReadOptions};
//! use std::sync::Arc;
//!
//! let batch = RecordBatch::try_from_iter(vec![(
//!     "key",
//!     Arc::new(StringArray::from(vec!["value"])) as ArrayRef,
//! )])?;
//!
//! let handler = CsvArtifact::construct("My output file");
//! let mut buf = Vec::new();
//! handler.write(&batch, &mut buf)?;
//!
//! let table = CsvArtifact::read(buf.as_slice(), &CsvReadOptions::default())?;
//! assert_eq!(table.num_rows(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod csv;
pub mod export;
mod parquet;

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::csv::{CsvArtifact, CsvArtifactBuilder, CsvReadOptions, CsvWriteOptions};
pub use self::parquet::{
    ParquetArtifact, ParquetArtifactBuilder, ParquetReadOptions, ParquetWriteOptions,
};
pub use export::{resolve_table, ArrowExport};

use crate::experiment::ArtifactRecord;
use crate::naming::artifact_filename;
use crate::table::Table;
use crate::Result;

/// Metadata every handler instance carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactMeta {
    name: String,
    filename: String,
    created_at: DateTime<Utc>,
    version: i64,
    dirty: bool,
}

impl ArtifactMeta {
    /// Resolve metadata, deriving the filename when none is given.
    ///
    /// `created_at` defaults to now; the default filename is
    /// `{slug(name)}-{YYYYMMDDHHMMSS}.{suffix}`.
    #[must_use]
    pub fn resolve(
        name: impl Into<String>,
        suffix: &str,
        filename: Option<String>,
        created_at: Option<DateTime<Utc>>,
        version: i64,
        dirty: bool,
    ) -> Self {
        let name = name.into();
        let created_at = created_at.unwrap_or_else(Utc::now);
        Self {
            filename: filename.unwrap_or_else(|| artifact_filename(&name, &created_at, suffix)),
            name,
            created_at,
            version,
            dirty,
        }
    }

    /// Artifact name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persisted filename
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Creation instant
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Version, monotonic per name
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Whether the payload still needs writing
    #[must_use]
    pub const fn dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the payload as persisted
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Read/write contract shared by artifact handlers.
pub trait ArtifactHandler {
    /// Registry alias (e.g. `"csv"`)
    const ALIAS: &'static str;
    /// File suffix, without the dot
    const SUFFIX: &'static str;
    /// Open files in binary mode
    const BINARY: bool;
    /// Handler can write but not read back
    const OUTPUT_ONLY: bool;

    /// Options accepted by [`ArtifactHandler::read`]
    type ReadOptions: Default;

    /// Handler metadata
    fn meta(&self) -> &ArtifactMeta;

    /// Parse a stream into a table.
    ///
    /// # Errors
    /// Returns the underlying parser's error unchanged
    fn read<R: Read>(buf: R, options: &Self::ReadOptions) -> Result<Table>;

    /// Serialize `data` into `buf` with this handler's writer options.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidInput`] if `data` is not convertible
    /// to a table; nothing is written in that case
    fn write<W: Write + Send>(&self, data: &dyn ArrowExport, buf: W) -> Result<()>;

    /// Metadata view consumed by the interchange.
    ///
    /// Arrow handlers do not report a runtime version.
    fn record(&self) -> ArtifactRecord {
        let meta = self.meta();
        ArtifactRecord::new(
            meta.name(),
            Self::ALIAS,
            Self::SUFFIX,
            meta.created_at().fixed_offset(),
        )
        .with_filename(meta.filename())
        .with_version(meta.version())
    }
}
