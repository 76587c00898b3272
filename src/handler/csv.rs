//! Arrow-powered CSV handler

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::export::{resolve_table, ArrowExport};
use super::{ArtifactHandler, ArtifactMeta};
use crate::table::Table;
use crate::{Error, Result};

/// Options for [`CsvArtifact::read`].
#[derive(Debug, Clone, PartialEq)]
pub struct CsvReadOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// First line is a header
    pub has_header: bool,
    /// Rows per record batch
    pub batch_size: usize,
    /// Rows sampled for type inference (`None` = all)
    pub max_infer_records: Option<usize>,
    /// Column types that override inference
    pub column_types: Vec<(String, DataType)>,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            batch_size: 8192,
            max_infer_records: None,
            column_types: Vec::new(),
        }
    }
}

impl CsvReadOptions {
    /// Set the field delimiter
    #[must_use]
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set header presence
    #[must_use]
    pub const fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Force the type of a column instead of inferring it
    #[must_use]
    pub fn column_type(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.column_types.push((name.into(), data_type));
        self
    }
}

/// Options for [`CsvArtifact::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvWriteOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Emit a header line
    pub has_header: bool,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
        }
    }
}

/// CSV artifact handler.
#[derive(Debug, Clone)]
pub struct CsvArtifact {
    meta: ArtifactMeta,
    value: Option<Table>,
    writer_options: CsvWriteOptions,
}

impl CsvArtifact {
    /// Construct a handler created now with default options.
    #[must_use]
    pub fn construct(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    /// Builder for the optional construction fields.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CsvArtifactBuilder {
        CsvArtifactBuilder::new(name)
    }

    /// Stored value, if one was supplied at construction.
    #[must_use]
    pub const fn value(&self) -> Option<&Table> {
        self.value.as_ref()
    }

    /// Writer options applied by [`ArtifactHandler::write`].
    #[must_use]
    pub const fn writer_options(&self) -> CsvWriteOptions {
        self.writer_options
    }

    /// Write `data` with explicit options.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `data` is not convertible to a
    /// table, or an Arrow error if a column cannot be rendered as text
    pub fn write_with<W: Write>(
        data: &dyn ArrowExport,
        buf: W,
        options: &CsvWriteOptions,
    ) -> Result<()> {
        let table = resolve_table(data)?;
        let mut writer = WriterBuilder::new()
            .with_header(options.has_header)
            .with_delimiter(options.delimiter)
            .build(buf);

        if table.batches().is_empty() {
            writer.write(&arrow::record_batch::RecordBatch::new_empty(table.schema()))?;
        }
        for batch in table.batches() {
            writer.write(batch)?;
        }
        debug!(rows = table.num_rows(), columns = table.num_columns(), "wrote CSV");
        Ok(())
    }

    /// Write the value supplied at construction.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if no value was supplied
    pub fn write_value<W: Write + Send>(&self, buf: W) -> Result<()> {
        let value = self
            .value
            .as_ref()
            .ok_or_else(|| Error::InvalidInput(format!("artifact '{}' has no value", self.meta.name())))?;
        self.write(value, buf)
    }
}

impl ArtifactHandler for CsvArtifact {
    const ALIAS: &'static str = "csv";
    const SUFFIX: &'static str = "csv";
    const BINARY: bool = true;
    const OUTPUT_ONLY: bool = false;

    type ReadOptions = CsvReadOptions;

    fn meta(&self) -> &ArtifactMeta {
        &self.meta
    }

    fn read<R: Read>(mut buf: R, options: &CsvReadOptions) -> Result<Table> {
        // Inference consumes the stream, so buffer it once.
        let mut bytes = Vec::new();
        buf.read_to_end(&mut bytes)?;

        let format = Format::default()
            .with_header(options.has_header)
            .with_delimiter(options.delimiter);
        let (inferred, _) = format.infer_schema(Cursor::new(&bytes), options.max_infer_records)?;

        let fields: Vec<Field> = inferred
            .fields()
            .iter()
            .map(|field| {
                options
                    .column_types
                    .iter()
                    .find(|(name, _)| name == field.name())
                    .map_or_else(
                        || field.as_ref().clone(),
                        |(_, data_type)| field.as_ref().clone().with_data_type(data_type.clone()),
                    )
            })
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let reader = ReaderBuilder::new(schema.clone())
            .with_header(options.has_header)
            .with_delimiter(options.delimiter)
            .with_batch_size(options.batch_size)
            .build(Cursor::new(bytes))?;

        let mut table = Table::new(schema);
        for batch in reader {
            table.append_batch(batch?)?;
        }
        debug!(rows = table.num_rows(), columns = table.num_columns(), "read CSV");
        Ok(table)
    }

    fn write<W: Write + Send>(&self, data: &dyn ArrowExport, buf: W) -> Result<()> {
        Self::write_with(data, buf, &self.writer_options)
    }
}

/// Builder for `CsvArtifact`.
#[derive(Debug)]
pub struct CsvArtifactBuilder {
    name: String,
    value: Option<Table>,
    filename: Option<String>,
    created_at: Option<DateTime<Utc>>,
    writer_options: CsvWriteOptions,
    version: i64,
    dirty: bool,
}

impl CsvArtifactBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            filename: None,
            created_at: None,
            writer_options: CsvWriteOptions::default(),
            version: 0,
            dirty: true,
        }
    }

    /// Set the value to persist.
    #[must_use]
    pub fn value(mut self, value: Table) -> Self {
        self.value = Some(value);
        self
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
    pub const fn writer_options(mut self, writer_options: CsvWriteOptions) -> Self {
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

    /// Build the `CsvArtifact`.
    #[must_use]
    pub fn build(self) -> CsvArtifact {
        CsvArtifact {
            meta: ArtifactMeta::resolve(
                self.name,
                CsvArtifact::SUFFIX,
                self.filename,
                self.created_at,
                self.version,
                self.dirty,
            ),
            value: self.value,
            writer_options: self.writer_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::Int64Type;
    use chrono::TimeZone;

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn test_handler_identity() {
        assert_eq!(CsvArtifact::ALIAS, "csv");
        assert_eq!(CsvArtifact::SUFFIX, "csv");
        assert!(CsvArtifact::BINARY);
        assert!(!CsvArtifact::OUTPUT_ONLY);
    }

    #[test]
    fn test_read_infers_types() {
        let data = "id,score,label\n1,0.5,a\n2,,b\n";
        let table = CsvArtifact::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(table.num_rows(), 2);
        let schema = table.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
        assert!(table.column("score").unwrap().unwrap().is_null(1));
    }

    #[test]
    fn test_read_column_type_override() {
        let data = "id;code\n1;007\n";
        let options = CsvReadOptions::default()
            .delimiter(b';')
            .column_type("code", DataType::Utf8);
        let table = CsvArtifact::read(data.as_bytes(), &options).unwrap();

        let code = table.column("code").unwrap().unwrap();
        assert_eq!(code.as_string::<i32>().value(0), "007");
        let id = table.column("id").unwrap().unwrap();
        assert_eq!(id.as_primitive::<Int64Type>().value(0), 1);
    }

    #[test]
    fn test_read_malformed_row_propagates() {
        let data = "a,b\n1,2\n3\n";
        let err = CsvArtifact::read(data.as_bytes(), &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Arrow(_)));
    }

    #[test]
    fn test_write_value_requires_value() {
        let handler = CsvArtifact::construct("empty");
        assert!(matches!(
            handler.write_value(Vec::<u8>::new()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_record_reports_no_runtime_version() {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 20, 13, 23, 30).unwrap();
        let handler = CsvArtifact::builder("data").created_at(created_at).build();
        let record = handler.record();

        assert_eq!(record.handler(), "csv");
        assert_eq!(record.filename(), "data-20250120132330.csv");
        assert!(record.runtime_version().is_none());
    }
}
