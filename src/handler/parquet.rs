//! Arrow-powered Parquet handler

use std::io::{Read, Write};

use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::arrow::ArrowWriter;
use ::parquet::file::properties::WriterProperties;
use arrow::record_batch::RecordBatchReader;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::export::{resolve_table, ArrowExport};
use super::{ArtifactHandler, ArtifactMeta};
use crate::table::Table;
use crate::Result;

/// Options for [`ParquetArtifact::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParquetReadOptions {
    /// Rows per record batch
    pub batch_size: usize,
}

impl Default for ParquetReadOptions {
    fn default() -> Self {
        Self { batch_size: 8192 }
    }
}

/// Options for [`ParquetArtifact::write`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetWriteOptions {
    /// Maximum rows per row group (`None` = writer default)
    pub max_row_group_size: Option<usize>,
}

impl ParquetWriteOptions {
    fn properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder();
        if let Some(rows) = self.max_row_group_size {
            builder = builder.set_max_row_group_size(rows);
        }
        builder.build()
    }
}

/// Parquet artifact handler.
#[derive(Debug, Clone)]
pub struct ParquetArtifact {
    meta: ArtifactMeta,
    writer_options: ParquetWriteOptions,
}

impl ParquetArtifact {
    /// Construct a handler created now with default options.
    #[must_use]
    pub fn construct(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    /// Builder for the optional construction fields.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ParquetArtifactBuilder {
        ParquetArtifactBuilder::new(name)
    }

    /// Writer options applied by [`ArtifactHandler::write`].
    #[must_use]
    pub const fn writer_options(&self) -> ParquetWriteOptions {
        self.writer_options
    }
}

impl ArtifactHandler for ParquetArtifact {
    const ALIAS: &'static str = "parquet";
    const SUFFIX: &'static str = "parquet";
    const BINARY: bool = true;
    const OUTPUT_ONLY: bool = false;

    type ReadOptions = ParquetReadOptions;

    fn meta(&self) -> &ArtifactMeta {
        &self.meta
    }

    fn read<R: Read>(mut buf: R, options: &ParquetReadOptions) -> Result<Table> {
        // The footer is read first, so the reader needs random access.
        let mut data = Vec::new();
        buf.read_to_end(&mut data)?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(data))?
            .with_batch_size(options.batch_size)
            .build()?;

        let mut table = Table::new(reader.schema());
        for batch in reader {
            table.append_batch(batch?)?;
        }
        debug!(rows = table.num_rows(), columns = table.num_columns(), "read Parquet");
        Ok(table)
    }

    fn write<W: Write + Send>(&self, data: &dyn ArrowExport, buf: W) -> Result<()> {
        let table = resolve_table(data)?;
        let mut writer = ArrowWriter::try_new(buf, table.schema(), Some(self.writer_options.properties()))?;
        for batch in table.batches() {
            writer.write(batch)?;
        }
        writer.close()?;
        debug!(rows = table.num_rows(), columns = table.num_columns(), "wrote Parquet");
        Ok(())
    }
}

/// Builder for `ParquetArtifact`.
#[derive(Debug)]
pub struct ParquetArtifactBuilder {
    name: String,
    filename: Option<String>,
    created_at: Option<DateTime<Utc>>,
    writer_options: ParquetWriteOptions,
    version: i64,
    dirty: bool,
}

impl ParquetArtifactBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            created_at: None,
            writer_options: ParquetWriteOptions::default(),
            version: 0,
            dirty: true,
        }
    }

    /// Use an explicit filename instead of the derived one.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set a custom creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the writer options.
    #[must_use]
    pub const fn writer_options(mut self, writer_options: ParquetWriteOptions) -> Self {
        self.writer_options = writer_options;
        self
    }

    /// Set the version.
    #[must_use]
    pub const fn version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Set the dirty flag.
    #[must_use]
    pub const fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    /// Build the `ParquetArtifact`.
    #[must_use]
    pub fn build(self) -> ParquetArtifact {
        ParquetArtifact {
            meta: ArtifactMeta::resolve(
                self.name,
                ParquetArtifact::SUFFIX,
                self.filename,
                self.created_at,
                self.version,
                self.dirty,
            ),
            writer_options: self.writer_options,
        }
    }
}
