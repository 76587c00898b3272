//! Project/Repository → columnar table interchange
//!
//! Flattens a tree of experiments (with tests, parameters, metrics and
//! artifact metadata) or a flat artifact repository into a single
//! [`Table`].
//!
//! ## Projection
//!
//! ```text
//! Project ──► [discovery pass] ──► schema ──► [population pass] ──► Table
//!                 │                               │
//!                 └─ column key → type            └─ null for unset keys
//!                    column key → original name
//! ```
//!
//! The projection is pure: no I/O, no mutation of its input, and either a
//! complete table or an error is returned.
//!
//! ## Example
//!
//! ```rust
//! use scribe_arrow::experiment::{ExperimentRecord, Project};
//! use scribe_arrow::interchange::to_table;
//!
//! let mut project = Project::with_author("myself");
//! project.push(ExperimentRecord::builder("First", "myself").parameter("depth", 3).build());
//! project.push(ExperimentRecord::builder("Second", "myself").metric("auc", 0.9).build());
//!
//! let table = to_table(&project)?;
//! assert_eq!(table.num_rows(), 2);
//! assert!(table.column_names().contains(&"parameter-depth"));
//! assert!(table.column_names().contains(&"metric-auc"));
//! # Ok::<(), scribe_arrow::Error>(())
//! ```

mod project;
mod repository;
pub mod scalar;
pub mod schema;

use std::any::{type_name, Any};

pub use project::{experiment_fixed_fields, project_to_table, test_fixed_fields};
pub use repository::{artifact_fields, repository_to_table, utc_seconds};
pub use schema::{SchemaDiscovery, ValueKind, METRIC_PREFIX, PARAMETER_PREFIX};

use crate::experiment::{Project, Repository};
use crate::table::Table;
use crate::{Error, Result};

/// Anything the interchange can project
#[derive(Debug, Clone, Copy)]
pub enum Tracked<'a> {
    /// One row per experiment
    Project(&'a Project),
    /// One row per artifact
    Repository(&'a Repository),
}

impl<'a> From<&'a Project> for Tracked<'a> {
    fn from(project: &'a Project) -> Self {
        Self::Project(project)
    }
}

impl<'a> From<&'a Repository> for Tracked<'a> {
    fn from(repository: &'a Repository) -> Self {
        Self::Repository(repository)
    }
}

/// Convert a project or repository to a table.
///
/// # Errors
/// Returns error if a logged value cannot be stored in its column
pub fn to_table<'a>(obj: impl Into<Tracked<'a>>) -> Result<Table> {
    match obj.into() {
        Tracked::Project(project) => project_to_table(project),
        Tracked::Repository(repository) => repository_to_table(repository),
    }
}

/// Convert a dynamically typed value to a table.
///
/// # Errors
/// Returns [`Error::UnsupportedType`] unless `obj` is a [`Project`] or
/// [`Repository`]
pub fn to_table_dyn<T: Any>(obj: &T) -> Result<Table> {
    let any = obj as &dyn Any;
    if let Some(project) = any.downcast_ref::<Project>() {
        project_to_table(project)
    } else if let Some(repository) = any.downcast_ref::<Repository>() {
        repository_to_table(repository)
    } else {
        Err(Error::UnsupportedType(type_name::<T>().to_string()))
    }
}
