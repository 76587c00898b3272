//! Schema discovery for dynamically keyed parameters and metrics
//!
//! Every record may log a different set of parameter/metric names. The
//! discovery pass walks all records once and builds the superset of column
//! keys, in first-seen order, with the type of the first value seen for
//! each key. Later values under the same name may widen that type (`null`
//! to anything, integer to float). The population pass then looks every record up against that
//! fixed column set, so each row gets a value (or null) for every column.
//!
//! ## Key collisions
//!
//! Column keys are `slug("parameter-" + name)` / `slug("metric-" + name)`.
//! Slugs are lossy, so two names can share a key (`"my param"` and
//! `"my-param"`). The first name registered owns the column and its type;
//! values logged under the other name never appear in the table. This is
//! logged at `trace` level and never raised.

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::scalar::{build_array, infer_type, unify};
use crate::experiment::{LoggedValues, Values};
use crate::naming::slugify;
use crate::Result;

/// Column key prefix for parameters
pub const PARAMETER_PREFIX: &str = "parameter-";

/// Column key prefix for metrics
pub const METRIC_PREFIX: &str = "metric-";

/// Which mapping a dynamic column is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `parameters`
    Parameter,
    /// `metrics`
    Metric,
}

impl ValueKind {
    /// Column key prefix
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Parameter => PARAMETER_PREFIX,
            Self::Metric => METRIC_PREFIX,
        }
    }

    fn values<R: LoggedValues>(self, record: &R) -> &Values {
        match self {
            Self::Parameter => record.parameters(),
            Self::Metric => record.metrics(),
        }
    }
}

/// Original (unslugified) name behind a dynamic column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Mapping the name lives in
    pub kind: ValueKind,
    /// Name as logged
    pub name: String,
}

#[derive(Debug, Clone)]
struct Column {
    key: String,
    data_type: DataType,
    /// `None` for fixed columns
    source: Option<Source>,
}

/// Ordered column-key → type map plus the key → original-name map.
#[derive(Debug, Clone, Default)]
pub struct SchemaDiscovery {
    columns: Vec<Column>,
    index: FxHashMap<String, usize>,
}

impl SchemaDiscovery {
    /// Create an empty discovery state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a discovery state seeded with fixed columns
    #[must_use]
    pub fn with_fixed<'a>(fixed: impl IntoIterator<Item = (&'a str, DataType)>) -> Self {
        let mut discovery = Self::new();
        for (name, data_type) in fixed {
            discovery.register(name.to_string(), data_type, None);
        }
        discovery
    }

    /// Register every parameter and metric of `record` not yet seen
    ///
    /// # Errors
    /// Returns error if a value's type cannot be inferred
    pub fn observe<R: LoggedValues>(&mut self, record: &R) -> Result<()> {
        for kind in [ValueKind::Parameter, ValueKind::Metric] {
            for (name, value) in kind.values(record) {
                let key = slugify(&format!("{}{name}", kind.prefix()));

                if let Some(&position) = self.index.get(&key) {
                    let column = &mut self.columns[position];
                    let same_source = column
                        .source
                        .as_ref()
                        .is_some_and(|source| source.kind == kind && source.name == *name);

                    if !same_source {
                        trace!(key = %key, name = %name, "column key already registered, skipping");
                    } else if !value.is_null() {
                        // Incompatible values keep the first type and fail at population.
                        if let Some(widened) = unify(&column.data_type, &infer_type(value)?) {
                            column.data_type = widened;
                        }
                    }
                    continue;
                }

                let data_type = infer_type(value)?;
                self.register(
                    key,
                    data_type,
                    Some(Source {
                        kind,
                        name: name.clone(),
                    }),
                );
            }
        }
        Ok(())
    }

    fn register(&mut self, key: String, data_type: DataType, source: Option<Source>) {
        self.index.insert(key.clone(), self.columns.len());
        self.columns.push(Column {
            key,
            data_type,
            source,
        });
    }

    /// Check whether a column key is registered
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Original name behind a dynamic column key
    #[must_use]
    pub fn source(&self, key: &str) -> Option<&Source> {
        self.index
            .get(key)
            .and_then(|&position| self.columns[position].source.as_ref())
    }

    /// Number of dynamic (parameter/metric) columns
    #[must_use]
    pub fn dynamic_len(&self) -> usize {
        self.columns.iter().filter(|c| c.source.is_some()).count()
    }

    /// All fields, fixed then dynamic, in registration order
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        self.columns
            .iter()
            .map(|column| Field::new(&column.key, column.data_type.clone(), true))
            .collect()
    }

    /// Dynamic fields only, in registration order
    #[must_use]
    pub fn dynamic_fields(&self) -> Vec<Field> {
        self.columns
            .iter()
            .filter(|column| column.source.is_some())
            .map(|column| Field::new(&column.key, column.data_type.clone(), true))
            .collect()
    }

    /// Build one array per dynamic column, one slot per record
    ///
    /// Records that never logged a column's source name get a null.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if a value does not fit its column
    pub fn populate<R: LoggedValues>(&self, records: &[&R]) -> Result<Vec<ArrayRef>> {
        self.columns
            .iter()
            .filter_map(|column| column.source.as_ref().map(|source| (column, source)))
            .map(|(column, source)| {
                let values: Vec<_> = records
                    .iter()
                    .map(|record| source.kind.values(*record).get(&source.name))
                    .collect();
                build_array(&column.key, &column.data_type, &values)
            })
            .collect()
    }
}
