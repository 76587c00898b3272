//! Repository → table: one row per artifact, fixed columns

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Fields, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::experiment::{ArtifactRecord, Repository};
use crate::table::Table;
use crate::Result;

/// Timezone attached to every projected timestamp
pub const UTC: &str = "UTC";

/// `timestamp[s, tz=UTC]`
#[must_use]
pub fn utc_seconds() -> DataType {
    DataType::Timestamp(TimeUnit::Second, Some(UTC.into()))
}

/// Seconds since the epoch; sub-second precision is dropped.
pub(crate) fn epoch_seconds<Tz: TimeZone>(instant: &DateTime<Tz>) -> i64 {
    instant.timestamp()
}

/// Artifact columns: name, filename, created_at, version, runtime_version, handler
#[must_use]
pub fn artifact_fields() -> Fields {
    Fields::from(vec![
        Field::new("name", DataType::Utf8, true),
        Field::new("filename", DataType::Utf8, true),
        Field::new("created_at", utc_seconds(), true),
        Field::new("version", DataType::Int64, true),
        Field::new("runtime_version", DataType::Utf8, true),
        Field::new("handler", DataType::Utf8, true),
    ])
}

/// One array per artifact field, one slot per artifact.
///
/// `runtime_version` is null for artifacts whose handler does not report it.
pub(crate) fn artifact_columns(artifacts: &[&ArtifactRecord]) -> Vec<ArrayRef> {
    vec![
        Arc::new(StringArray::from_iter_values(
            artifacts.iter().map(|artifact| artifact.name()),
        )),
        Arc::new(StringArray::from_iter_values(
            artifacts.iter().map(|artifact| artifact.filename()),
        )),
        Arc::new(
            TimestampSecondArray::from_iter_values(
                artifacts
                    .iter()
                    .map(|artifact| epoch_seconds(&artifact.created_at())),
            )
            .with_timezone(UTC),
        ),
        Arc::new(Int64Array::from_iter_values(
            artifacts.iter().map(|artifact| artifact.version()),
        )),
        Arc::new(
            artifacts
                .iter()
                .map(|artifact| artifact.runtime_version())
                .collect::<StringArray>(),
        ),
        Arc::new(StringArray::from_iter_values(
            artifacts.iter().map(|artifact| artifact.handler()),
        )),
    ]
}

/// Project a repository to a table.
///
/// # Errors
/// Returns error if the record batch cannot be assembled
pub fn repository_to_table(repository: &Repository) -> Result<Table> {
    let schema = Arc::new(Schema::new(artifact_fields()));
    let artifacts: Vec<&ArtifactRecord> = repository.artifacts().iter().collect();
    let batch = RecordBatch::try_new(schema, artifact_columns(&artifacts))?;

    debug!(artifacts = artifacts.len(), "projected repository");
    Ok(Table::from_batch(batch))
}
