//! Project → table: one row per experiment
//!
//! ## Column layout
//!
//! ```text
//! name | slug | short_slug | author | created_at | last_updated |
//! last_updated_by | tags | dependencies |
//! parameter-* ... | metric-* ...            (discovered, first-seen order)
//! tests: list<struct<name, description, parameter-*, metric-*>>
//! artifacts: list<struct<name, filename, created_at, version, runtime_version, handler>>
//! ```
//!
//! Tests get their own discovery pass: their parameter/metric columns live
//! inside the `tests` struct and never share keys with experiment columns.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, ListArray, ListBuilder, StringArray, StringBuilder, StructArray,
    TimestampSecondArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use tracing::debug;

use super::repository::{artifact_columns, artifact_fields, epoch_seconds, utc_seconds, UTC};
use super::scalar::list_of;
use super::schema::SchemaDiscovery;
use crate::experiment::{ArtifactRecord, ExperimentRecord, Project, TestRecord};
use crate::table::Table;
use crate::Result;

/// Fixed experiment columns, in output order
#[must_use]
pub fn experiment_fixed_fields() -> Vec<(&'static str, DataType)> {
    vec![
        ("name", DataType::Utf8),
        ("slug", DataType::Utf8),
        ("short_slug", DataType::Utf8),
        ("author", DataType::Utf8),
        ("created_at", utc_seconds()),
        ("last_updated", utc_seconds()),
        ("last_updated_by", DataType::Utf8),
        ("tags", list_of(DataType::Utf8)),
        ("dependencies", list_of(DataType::Utf8)),
    ]
}

/// Fixed test struct members, in output order
#[must_use]
pub fn test_fixed_fields() -> Vec<(&'static str, DataType)> {
    vec![("name", DataType::Utf8), ("description", DataType::Utf8)]
}

/// Project a project to a table.
///
/// An empty project yields the fixed columns plus empty `tests` and
/// `artifacts` columns, with zero rows.
///
/// # Errors
/// Returns [`crate::Error::TypeMismatch`] if a logged value does not fit the
/// type discovered for its column, or an Arrow error if assembly fails
pub fn project_to_table(project: &Project) -> Result<Table> {
    let experiments: Vec<&ExperimentRecord> = project.experiments().iter().collect();

    // Pass 1: schema discovery
    let mut discovery = SchemaDiscovery::with_fixed(experiment_fixed_fields());
    let mut test_discovery = SchemaDiscovery::with_fixed(test_fixed_fields());
    for experiment in &experiments {
        discovery.observe(*experiment)?;
        for test in experiment.tests() {
            test_discovery.observe(test)?;
        }
    }

    let test_fields = Fields::from(test_discovery.fields());
    let mut fields = discovery.fields();
    fields.push(Field::new(
        "tests",
        list_of(DataType::Struct(test_fields.clone())),
        true,
    ));
    fields.push(Field::new(
        "artifacts",
        list_of(DataType::Struct(artifact_fields())),
        true,
    ));
    let schema = Arc::new(Schema::new(fields));

    // Pass 2: population
    let mut columns = fixed_columns(&experiments);
    columns.extend(discovery.populate(&experiments)?);
    columns.push(tests_column(&experiments, &test_discovery, test_fields)?);
    columns.push(artifacts_column(&experiments)?);

    let batch = RecordBatch::try_new(schema, columns)?;
    debug!(
        experiments = batch.num_rows(),
        columns = batch.num_columns(),
        parameters_and_metrics = discovery.dynamic_len(),
        "projected project"
    );
    Ok(Table::from_batch(batch))
}

fn fixed_columns(experiments: &[&ExperimentRecord]) -> Vec<ArrayRef> {
    let strings = |get: fn(&ExperimentRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(
            experiments.iter().map(|experiment| get(experiment)),
        ))
    };
    let timestamps = |get: fn(&ExperimentRecord) -> i64| -> ArrayRef {
        Arc::new(
            TimestampSecondArray::from_iter_values(experiments.iter().map(|experiment| get(experiment)))
                .with_timezone(UTC),
        )
    };

    vec![
        strings(ExperimentRecord::name),
        strings(ExperimentRecord::slug),
        strings(ExperimentRecord::short_slug),
        strings(ExperimentRecord::author),
        timestamps(|experiment| epoch_seconds(&experiment.created_at())),
        timestamps(|experiment| epoch_seconds(&experiment.last_updated())),
        strings(ExperimentRecord::last_updated_by),
        string_lists(experiments.iter().map(|experiment| experiment.tags())),
        string_lists(experiments.iter().map(|experiment| experiment.dependencies())),
    ]
}

fn string_lists<'a>(rows: impl Iterator<Item = &'a [String]>) -> ArrayRef {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for row in rows {
        for value in row {
            builder.values().append_value(value);
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn tests_column(
    experiments: &[&ExperimentRecord],
    discovery: &SchemaDiscovery,
    fields: Fields,
) -> Result<ArrayRef> {
    let tests: Vec<&TestRecord> = experiments
        .iter()
        .flat_map(|experiment| experiment.tests())
        .collect();

    let mut children: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(tests.iter().map(|test| test.name()))),
        Arc::new(
            tests
                .iter()
                .map(|test| test.description())
                .collect::<StringArray>(),
        ),
    ];
    children.extend(discovery.populate(&tests)?);

    nested_list(
        fields,
        children,
        experiments.iter().map(|experiment| experiment.tests().len()),
    )
}

fn artifacts_column(experiments: &[&ExperimentRecord]) -> Result<ArrayRef> {
    let artifacts: Vec<&ArtifactRecord> = experiments
        .iter()
        .flat_map(|experiment| experiment.artifacts())
        .collect();

    nested_list(
        artifact_fields(),
        artifact_columns(&artifacts),
        experiments.iter().map(|experiment| experiment.artifacts().len()),
    )
}

/// `list<struct<fields>>` where row `i` holds the next `lengths[i]` entries.
fn nested_list(
    fields: Fields,
    children: Vec<ArrayRef>,
    lengths: impl IntoIterator<Item = usize>,
) -> Result<ArrayRef> {
    let entries = StructArray::try_new(fields.clone(), children, None)?;
    let item = Arc::new(Field::new_list_field(DataType::Struct(fields), true));
    Ok(Arc::new(ListArray::try_new(
        item,
        OffsetBuffer::from_lengths(lengths),
        Arc::new(entries),
        None,
    )?))
}
