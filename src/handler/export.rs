//! Capability probe for data handed to artifact writers
//!
//! Writers accept anything that can become a [`Table`] without copying:
//!
//! 1. a native [`Table`],
//! 2. a type exporting an Arrow C stream ([`FFI_ArrowArrayStream`]),
//! 3. a type exporting a struct array whose children are the columns.
//!
//! Everything else is rejected with [`Error::InvalidInput`] before any
//! byte is written.

use std::sync::Arc;

use arrow::array::{Array, StructArray};
use arrow::datatypes::Schema;
use arrow::ffi_stream::{ArrowArrayStreamReader, FFI_ArrowArrayStream};
use arrow::record_batch::{RecordBatch, RecordBatchIterator, RecordBatchReader};
use tracing::debug;

use crate::table::Table;
use crate::{Error, Result};

/// Arrow export capabilities. Every method defaults to "not supported".
pub trait ArrowExport {
    /// Borrow as a native table
    fn as_table(&self) -> Option<&Table> {
        None
    }

    /// Export as a struct array (one child per column)
    fn export_array(&self) -> Option<StructArray> {
        None
    }

    /// Export through the Arrow C stream interface
    fn export_stream(&self) -> Option<FFI_ArrowArrayStream> {
        None
    }
}

impl ArrowExport for Table {
    fn as_table(&self) -> Option<&Table> {
        Some(self)
    }
}

impl ArrowExport for RecordBatch {
    fn export_array(&self) -> Option<StructArray> {
        Some(StructArray::from(self.clone()))
    }
}

impl ArrowExport for StructArray {
    fn export_array(&self) -> Option<StructArray> {
        Some(self.clone())
    }
}

/// Row-oriented JSON is not columnar.
impl ArrowExport for serde_json::Value {}

/// Row-oriented JSON is not columnar.
impl ArrowExport for Vec<serde_json::Value> {}

/// Turn exported data into a table.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `data` exposes no capability, or the
/// import error of the capability it does expose
pub fn resolve_table(data: &dyn ArrowExport) -> Result<Table> {
    if let Some(table) = data.as_table() {
        debug!("Provided object is already a columnar table");
        return Ok(table.clone());
    }

    if let Some(stream) = data.export_stream() {
        debug!("Importing columnar data through the Arrow C stream interface");
        let reader = ArrowArrayStreamReader::try_new(stream)?;
        let schema = reader.schema();
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        return Table::try_new(schema, batches);
    }

    if let Some(array) = data.export_array() {
        debug!("Importing columnar data from an exported struct array");
        if array.null_count() > 0 {
            return Err(Error::InvalidInput(
                "exported struct array has top-level nulls and cannot become table rows"
                    .to_string(),
            ));
        }
        let (fields, columns, _) = array.into_parts();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        return Ok(Table::from_batch(batch));
    }

    Err(Error::InvalidInput(
        "object is not convertible to a columnar table".to_string(),
    ))
}

/// Wrap batches as an exportable C stream (the producer side of the interface).
#[must_use]
pub fn stream_from_batches(table: &Table) -> FFI_ArrowArrayStream {
    let reader = RecordBatchIterator::new(
        table.batches().to_vec().into_iter().map(Ok),
        table.schema(),
    );
    FFI_ArrowArrayStream::new(Box::new(reader))
}
