//! Project/Repository projection tests
//!
//! Every test builds the tracked objects in memory, projects them and
//! inspects the resulting columns.

mod common;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Fields, Float64Type, Int64Type, TimeUnit, TimestampSecondType};
use chrono::{FixedOffset, TimeZone};
use serde_json::json;
use scribe_arrow::experiment::{ArtifactRecord, ExperimentRecord, Project, Repository, TestRecord};
use scribe_arrow::{to_table, to_table_dyn, Error};

use common::{created_at, created_at_fixed, init_tracing};

// =============================================================================
// Project projection
// =============================================================================

#[test]
fn test_project_basic_columns() {
    init_tracing();
    let project = Project::from_experiments(vec![ExperimentRecord::builder("My experiment", "myself")
        .created_at(created_at_fixed())
        .tag("baseline")
        .parameter("features", json!(["a", "b"]))
        .metric("auc", 0.81)
        .build()]);

    let table = to_table(&project).unwrap();
    assert_eq!(table.num_rows(), 1);
    assert_eq!(
        table.column_names(),
        vec![
            "name",
            "slug",
            "short_slug",
            "author",
            "created_at",
            "last_updated",
            "last_updated_by",
            "tags",
            "dependencies",
            "parameter-features",
            "metric-auc",
            "tests",
            "artifacts",
        ]
    );

    let slug = table.column("slug").unwrap().unwrap();
    assert_eq!(slug.as_string::<i32>().value(0), "my-experiment-20250120132330");
    let short_slug = table.column("short_slug").unwrap().unwrap();
    assert_eq!(short_slug.as_string::<i32>().value(0), "my-experiment");
    let last_updated_by = table.column("last_updated_by").unwrap().unwrap();
    assert_eq!(last_updated_by.as_string::<i32>().value(0), "myself");

    let created = table.column("created_at").unwrap().unwrap();
    assert_eq!(
        created.data_type(),
        &DataType::Timestamp(TimeUnit::Second, Some("UTC".into()))
    );
    assert_eq!(
        created.as_primitive::<TimestampSecondType>().value(0),
        created_at().timestamp()
    );

    let features = table.column("parameter-features").unwrap().unwrap();
    let features = features.as_list::<i32>();
    assert_eq!(features.value(0).as_string::<i32>().value(1), "b");

    let auc = table.column("metric-auc").unwrap().unwrap();
    assert!((auc.as_primitive::<Float64Type>().value(0) - 0.81).abs() < f64::EPSILON);
}

#[test]
fn test_zero_experiments_yields_fixed_schema() {
    let table = to_table(&Project::new()).unwrap();
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.num_columns(), 11);
    assert!(table.column_names().iter().all(|name| !name.starts_with("parameter-")));
}

#[test]
fn test_mismatched_parameters_are_null_filled() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me")
            .created_at(created_at_fixed())
            .parameter("p", 1)
            .build(),
        ExperimentRecord::builder("Second", "me")
            .created_at(created_at_fixed())
            .metric("m", 0.5)
            .build(),
    ]);

    let table = to_table(&project).unwrap();
    let p = table.column("parameter-p").unwrap().unwrap();
    assert!(p.is_valid(0));
    assert!(p.is_null(1));
    assert_eq!(p.as_primitive::<Int64Type>().value(0), 1);

    let m = table.column("metric-m").unwrap().unwrap();
    assert!(m.is_null(0));
    assert!(m.is_valid(1));
}

#[test]
fn test_row_order_follows_input_order() {
    let names = ["zeta", "alpha", "mid", "beta"];
    let project = Project::from_experiments(
        names
            .iter()
            .map(|name| ExperimentRecord::builder(*name, "me").build())
            .collect(),
    );

    let table = to_table(&project).unwrap();
    let column = table.column("name").unwrap().unwrap();
    let projected: Vec<&str> = column.as_string::<i32>().iter().map(Option::unwrap).collect();
    assert_eq!(projected, names);
}

#[test]
fn test_nested_tests_keep_values_and_order() {
    let project = Project::from_experiments(vec![ExperimentRecord::builder("Exp", "me")
        .created_at(created_at_fixed())
        .test(TestRecord::new("My test", "Demo test").metric("my-metric", 0.5))
        .test(TestRecord::new("My second test", "Demo test").metric("my-metric", 0.25))
        .build()]);

    let table = to_table(&project).unwrap();
    let tests = table.column("tests").unwrap().unwrap();
    let tests = tests.as_list::<i32>();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests.value_length(0), 2);

    let entries = tests.value(0);
    let entries = entries.as_struct();
    let names = entries.column_by_name("name").unwrap().as_string::<i32>();
    assert_eq!(names.value(0), "My test");
    assert_eq!(names.value(1), "My second test");

    let metric = entries
        .column_by_name("metric-my-metric")
        .unwrap()
        .as_primitive::<Float64Type>();
    assert!((metric.value(0) - 0.5).abs() < f64::EPSILON);
    assert!((metric.value(1) - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_tests_split_across_experiments() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("No tests", "me").build(),
        ExperimentRecord::builder("One test", "me")
            .test(TestRecord::named("holdout").parameter("fold", 3))
            .build(),
    ]);

    let table = to_table(&project).unwrap();
    let tests = table.column("tests").unwrap().unwrap();
    let tests = tests.as_list::<i32>();
    assert_eq!(tests.value_length(0), 0);
    assert_eq!(tests.value_length(1), 1);

    let entries = tests.value(1);
    let entries = entries.as_struct();
    assert!(entries.column_by_name("description").unwrap().is_null(0));
    assert_eq!(
        entries
            .column_by_name("parameter-fold")
            .unwrap()
            .as_primitive::<Int64Type>()
            .value(0),
        3
    );
}

#[test]
fn test_artifacts_column_lists_metadata() {
    let artifact = ArtifactRecord::new("features", "json", "json", created_at_fixed())
        .with_version(2)
        .with_runtime_version("3.12.1");
    let project = Project::from_experiments(vec![ExperimentRecord::builder("Exp", "me")
        .created_at(created_at_fixed())
        .artifact(artifact)
        .build()]);

    let table = to_table(&project).unwrap();
    let artifacts = table.column("artifacts").unwrap().unwrap();
    let artifacts = artifacts.as_list::<i32>();
    assert_eq!(artifacts.value_length(0), 1);

    let entries = artifacts.value(0);
    let entries = entries.as_struct();
    assert_eq!(
        entries.column_by_name("filename").unwrap().as_string::<i32>().value(0),
        "features-20250120132330.json"
    );
    assert_eq!(
        entries
            .column_by_name("version")
            .unwrap()
            .as_primitive::<Int64Type>()
            .value(0),
        2
    );
}

#[test]
fn test_slug_collision_first_name_wins() {
    // Both names slugify to `parameter-my-param`; the second value is dropped.
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me").parameter("my param", 1).build(),
        ExperimentRecord::builder("Second", "me").parameter("my-param", 2).build(),
    ]);

    let table = to_table(&project).unwrap();
    let column = table.column("parameter-my-param").unwrap().unwrap();
    let values = column.as_primitive::<Int64Type>();
    assert_eq!(values.value(0), 1);
    assert!(values.is_null(1));
    assert_eq!(
        table
            .column_names()
            .iter()
            .filter(|name| name.starts_with("parameter-"))
            .count(),
        1
    );
}

#[test]
fn test_integer_metric_widens_into_float_column() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me").metric("loss", 0.5).build(),
        ExperimentRecord::builder("Second", "me").metric("loss", 1).build(),
    ]);

    let table = to_table(&project).unwrap();
    let loss = table.column("metric-loss").unwrap().unwrap();
    assert!((loss.as_primitive::<Float64Type>().value(1) - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_incompatible_values_fail_without_partial_table() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me").parameter("depth", 3).build(),
        ExperimentRecord::builder("Second", "me").parameter("depth", "deep").build(),
    ]);

    let err = to_table(&project).unwrap_err();
    let Error::TypeMismatch { column, .. } = &err else {
        panic!("expected a type mismatch, got {err:?}");
    };
    assert_eq!(column, "parameter-depth");
}

#[test]
fn test_struct_parameter_with_gap() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me")
            .parameter("model", json!({"depth": 3, "kind": "tree"}))
            .build(),
        ExperimentRecord::builder("Second", "me").build(),
    ]);

    let table = to_table(&project).unwrap();
    let model = table.column("parameter-model").unwrap().unwrap();
    let model = model.as_struct();
    assert_eq!(model.len(), 2);
    assert!(model.is_valid(0));
    assert!(model.is_null(1));
    assert_eq!(
        model
            .column_by_name("depth")
            .unwrap()
            .as_primitive::<Int64Type>()
            .value(0),
        3
    );
    assert_eq!(
        model.column_by_name("kind").unwrap().as_string::<i32>().value(0),
        "tree"
    );
}

#[test]
fn test_struct_parameter_extra_members_dropped() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me")
            .parameter("model", json!({"depth": 3}))
            .build(),
        ExperimentRecord::builder("Second", "me")
            .parameter("model", json!({"depth": 5, "kind": "forest"}))
            .build(),
    ]);

    let table = to_table(&project).unwrap();
    let model = table.column("parameter-model").unwrap().unwrap();
    let model = model.as_struct();
    assert_eq!(model.num_columns(), 1);
    assert!(model.column_by_name("kind").is_none());
    let depth = model.column_by_name("depth").unwrap().as_primitive::<Int64Type>();
    assert_eq!(depth.value(0), 3);
    assert_eq!(depth.value(1), 5);
}

#[test]
fn test_empty_struct_parameter_keeps_row_count() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me").parameter("cfg", json!({})).build(),
        ExperimentRecord::builder("Second", "me").build(),
        ExperimentRecord::builder("Third", "me").parameter("cfg", json!({})).build(),
    ]);

    let table = to_table(&project).unwrap();
    assert_eq!(table.num_rows(), 3);
    let cfg = table.column("parameter-cfg").unwrap().unwrap();
    assert_eq!(cfg.data_type(), &DataType::Struct(Fields::empty()));
    assert!(cfg.is_valid(0));
    assert!(cfg.is_null(1));
    assert!(cfg.is_valid(2));
}

#[test]
fn test_empty_struct_parameter_on_every_row() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me").parameter("cfg", json!({})).build(),
        ExperimentRecord::builder("Second", "me").parameter("cfg", json!({})).build(),
    ]);

    let table = to_table(&project).unwrap();
    let cfg = table.column("parameter-cfg").unwrap().unwrap();
    assert_eq!(cfg.len(), 2);
    assert_eq!(cfg.null_count(), 0);
}

#[test]
fn test_integer_metric_widens_when_float_follows() {
    let project = Project::from_experiments(vec![
        ExperimentRecord::builder("First", "me").metric("loss", 1).build(),
        ExperimentRecord::builder("Second", "me").metric("loss", 0.5).build(),
    ]);

    let table = to_table(&project).unwrap();
    let loss = table.column("metric-loss").unwrap().unwrap();
    assert_eq!(loss.data_type(), &DataType::Float64);
    let loss = loss.as_primitive::<Float64Type>();
    assert!((loss.value(0) - 1.0).abs() < f64::EPSILON);
    assert!((loss.value(1) - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_timestamps_normalized_to_utc() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let local = offset.with_ymd_and_hms(2025, 1, 20, 8, 23, 30).unwrap();
    let project = Project::from_experiments(vec![ExperimentRecord::builder("Exp", "me")
        .created_at(local)
        .build()]);

    let table = to_table(&project).unwrap();
    let column = table.column("created_at").unwrap().unwrap();
    assert_eq!(
        column.as_primitive::<TimestampSecondType>().value(0),
        created_at().timestamp()
    );
}

// =============================================================================
// Repository projection
// =============================================================================

#[test]
fn test_repository_optional_runtime_version() {
    let repository = Repository::from_artifacts(vec![
        ArtifactRecord::new("config", "json", "json", created_at_fixed())
            .with_runtime_version("3.12.1"),
        ArtifactRecord::new("features", "csv", "csv", created_at_fixed()),
    ]);

    let table = to_table(&repository).unwrap();
    assert_eq!(table.num_rows(), 2);

    let runtime = table.column("runtime_version").unwrap().unwrap();
    assert!(runtime.is_valid(0));
    assert!(runtime.is_null(1));
    assert_eq!(runtime.as_string::<i32>().value(0), "3.12.1");

    let handler = table.column("handler").unwrap().unwrap();
    assert_eq!(handler.as_string::<i32>().value(1), "csv");
}

#[test]
fn test_empty_repository_yields_fixed_schema() {
    let table = to_table(&Repository::new()).unwrap();
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.num_columns(), 6);
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_unsupported_type_is_rejected() {
    let err = to_table_dyn(&"not a project".to_string()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));

    let table = to_table_dyn(&Repository::new()).unwrap();
    assert_eq!(table.num_rows(), 0);
}
