//! Columnar table (Arrow)
//!
//! A [`Table`] is a schema plus an ordered list of record batches that all
//! share it. Rows are implied by position: row `i` of the table is the
//! `i`-th row across the batches taken in order.
//!
//! Append-only: batches can be added, never updated in place.

use crate::{Error, Result};
use arrow::array::ArrayRef;
use arrow::compute::{concat, concat_batches};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

/// Named, typed columns of equal length.
#[derive(Debug, Clone)]
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Table {
    /// Create an empty table (zero rows) with the given schema
    #[must_use]
    pub const fn new(schema: SchemaRef) -> Self {
        Self {
            schema,
            batches: Vec::new(),
        }
    }

    /// Create a table from batches that all match `schema`
    ///
    /// # Errors
    /// Returns error if any batch schema differs from `schema`
    pub fn try_new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self> {
        let mut table = Self::new(schema);
        for batch in batches {
            table.append_batch(batch)?;
        }
        Ok(table)
    }

    /// Create a single-batch table
    #[must_use]
    pub fn from_batch(batch: RecordBatch) -> Self {
        Self {
            schema: batch.schema(),
            batches: vec![batch],
        }
    }

    /// Append a batch (the only supported write)
    ///
    /// # Errors
    ///
    /// Returns error if batch schema doesn't match the table schema
    pub fn append_batch(&mut self, batch: RecordBatch) -> Result<()> {
        if batch.schema() != self.schema {
            return Err(Error::StorageError(format!(
                "Schema mismatch: expected {:?}, got {:?}",
                self.schema,
                batch.schema()
            )));
        }

        self.batches.push(batch);
        Ok(())
    }

    /// Table schema
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Get all record batches
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total rows across all batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Number of columns in the schema
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// Column names in schema order
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect()
    }

    /// Full column by name, concatenated across batches
    ///
    /// Returns `Ok(None)` if the column does not exist.
    ///
    /// # Errors
    /// Returns error if the column chunks cannot be concatenated
    pub fn column(&self, name: &str) -> Result<Option<ArrayRef>> {
        let Ok(index) = self.schema.index_of(name) else {
            return Ok(None);
        };

        if let [batch] = self.batches.as_slice() {
            return Ok(Some(batch.column(index).clone()));
        }
        if self.batches.is_empty() {
            let field = self.schema.field(index);
            return Ok(Some(arrow::array::new_empty_array(field.data_type())));
        }

        let chunks: Vec<&dyn arrow::array::Array> = self
            .batches
            .iter()
            .map(|batch| batch.column(index).as_ref())
            .collect();
        Ok(Some(concat(&chunks)?))
    }

    /// Collapse all batches into one
    ///
    /// # Errors
    /// Returns error if batches cannot be concatenated
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(concat_batches(&self.schema, &self.batches)?)
    }
}

/// Equal schemas and equal data; batch boundaries are ignored.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        if self.schema != other.schema || self.num_rows() != other.num_rows() {
            return false;
        }
        match (self.to_record_batch(), other.to_record_batch()) {
            (Ok(left), Ok(right)) => left == right,
            _ => false,
        }
    }
}

impl From<RecordBatch> for Table {
    fn from(batch: RecordBatch) -> Self {
        Self::from_batch(batch)
    }
}
