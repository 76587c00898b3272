//! # scribe-arrow: Arrow interchange and artifact handlers for experiment tracking
//!
//! **Version**: 0.1.0
//!
//! scribe-arrow projects an experiment-tracking project (experiments with
//! their tests, parameters, metrics and artifact metadata) or an artifact
//! repository into a single Apache Arrow table, and persists tabular
//! artifacts as CSV or Parquet.
//!
//! ## Modules
//!
//! - [`interchange`]: two-pass projection (schema discovery, then population)
//! - [`handler`]: CSV/Parquet artifact handlers and the Arrow export probe
//! - [`experiment`]: the read-only domain model being projected
//! - [`table`]: schema plus record batches, the unit every module exchanges
//!
//! ## Example Usage
//!
//! ```rust
//! use scribe_arrow::experiment::{ExperimentRecord, Project};
//! use scribe_arrow::handler::{ArtifactHandler, ParquetArtifact, ParquetReadOptions};
//!
//! let mut project = Project::with_author("myself");
//! project.push(
//!     ExperimentRecord::builder("Baseline", "myself")
//!         .parameter("learning-rate", 0.1)
//!         .metric("auc", 0.8)
//!         .build(),
//! );
//!
//! let table = scribe_arrow::to_table(&project)?;
//!
//! let handler = ParquetArtifact::construct("Project snapshot");
//! let mut buf = Vec::new();
//! handler.write(&table, &mut buf)?;
//!
//! let restored = ParquetArtifact::read(buf.as_slice(), &ParquetReadOptions::default())?;
//! assert_eq!(restored.num_rows(), 1);
//! # Ok::<(), scribe_arrow::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod experiment;
pub mod handler;
pub mod interchange;
pub mod naming;
pub mod table;

pub use error::{Error, Result};
pub use interchange::{to_table, to_table_dyn, Tracked};
pub use table::Table;
