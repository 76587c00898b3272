//! Experiment Tracking Schema
//!
//! Read-only domain model consumed by the interchange and produced by the
//! host tracking library.
//!
//! ## Schema Overview
//!
//! ```text
//! Project (1) ──< ExperimentRecord (N)
//!                      │
//!                      ├──< TestRecord (N)      [own parameters/metrics]
//!                      └──< ArtifactRecord (N)  [metadata only]
//!
//! Repository (1) ──< ArtifactRecord (N)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use scribe_arrow::experiment::{ExperimentRecord, LoggedValues, Project, TestRecord};
//!
//! let mut project = Project::with_author("myself");
//! project.push(
//!     ExperimentRecord::builder("My experiment", "myself")
//!         .parameter("max-depth", 5)
//!         .metric("auc", 0.81)
//!         .test(TestRecord::new("Holdout", "2024 cohort").metric("auc", 0.78))
//!         .build(),
//! );
//!
//! assert_eq!(project.experiments()[0].parameters().len(), 1);
//! ```

mod artifact_record;
mod experiment_record;
mod project;
mod test_record;

pub use artifact_record::ArtifactRecord;
pub use experiment_record::{ExperimentRecord, ExperimentRecordBuilder};
pub use project::{Project, Repository};
pub use test_record::TestRecord;

/// Free-form parameter/metric mapping, in logging order.
pub type Values = serde_json::Map<String, serde_json::Value>;

/// Records that carry dynamically keyed parameters and metrics.
pub trait LoggedValues {
    /// Logged parameters.
    fn parameters(&self) -> &Values;

    /// Logged metrics.
    fn metrics(&self) -> &Values;
}
