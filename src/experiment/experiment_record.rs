//! Experiment Record - root entity for experiment tracking

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ArtifactRecord, LoggedValues, TestRecord, Values};
use crate::naming::{experiment_slug, slugify};

/// Experiment Record represents a tracked experiment.
///
/// Parameter and metric keys are free-form and vary between experiments
/// in the same project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentRecord {
    name: String,
    slug: String,
    short_slug: String,
    author: String,
    created_at: DateTime<FixedOffset>,
    last_updated: DateTime<FixedOffset>,
    last_updated_by: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    parameters: Values,
    #[serde(default)]
    metrics: Values,
    #[serde(default)]
    tests: Vec<TestRecord>,
    #[serde(default)]
    artifacts: Vec<ArtifactRecord>,
    #[serde(default)]
    dependencies: Vec<String>,
}

impl ExperimentRecord {
    /// Create a new experiment record created now.
    #[must_use]
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self::builder(name, author).build()
    }

    /// Create a builder for constructing an experiment record with optional fields.
    #[must_use]
    pub fn builder(name: impl Into<String>, author: impl Into<String>) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(name, author)
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the unique slug (name + creation timestamp).
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Get the short slug (name only).
    #[must_use]
    pub fn short_slug(&self) -> &str {
        &self.short_slug
    }

    /// Get the author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn last_updated(&self) -> DateTime<FixedOffset> {
        self.last_updated
    }

    /// Get who last updated the experiment.
    #[must_use]
    pub fn last_updated_by(&self) -> &str {
        &self.last_updated_by
    }

    /// Get the tags in logging order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Get the logged tests.
    #[must_use]
    pub fn tests(&self) -> &[TestRecord] {
        &self.tests
    }

    /// Get the logged artifact metadata.
    #[must_use]
    pub fn artifacts(&self) -> &[ArtifactRecord] {
        &self.artifacts
    }

    /// Get the slugs of upstream experiments.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl LoggedValues for ExperimentRecord {
    fn parameters(&self) -> &Values {
        &self.parameters
    }

    fn metrics(&self) -> &Values {
        &self.metrics
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    name: String,
    author: String,
    created_at: DateTime<FixedOffset>,
    last_updated: Option<DateTime<FixedOffset>>,
    last_updated_by: Option<String>,
    tags: Vec<String>,
    parameters: Values,
    metrics: Values,
    tests: Vec<TestRecord>,
    artifacts: Vec<ArtifactRecord>,
    dependencies: Vec<String>,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            created_at: Utc::now().fixed_offset(),
            last_updated: None,
            last_updated_by: None,
            tags: Vec::new(),
            parameters: Values::new(),
            metrics: Values::new(),
            tests: Vec::new(),
            artifacts: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<FixedOffset>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the last update timestamp. Defaults to the creation timestamp.
    #[must_use]
    pub const fn last_updated(mut self, last_updated: DateTime<FixedOffset>) -> Self {
        self.last_updated = Some(last_updated);
        self
    }

    /// Set who last updated the experiment. Defaults to the author.
    #[must_use]
    pub fn last_updated_by(mut self, last_updated_by: impl Into<String>) -> Self {
        self.last_updated_by = Some(last_updated_by.into());
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Log a parameter. Re-logging a key overwrites it in place.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Log a metric.
    #[must_use]
    pub fn metric(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metrics.insert(key.into(), value.into());
        self
    }

    /// Attach a test.
    #[must_use]
    pub fn test(mut self, test: TestRecord) -> Self {
        self.tests.push(test);
        self
    }

    /// Attach artifact metadata.
    #[must_use]
    pub fn artifact(mut self, artifact: ArtifactRecord) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Declare a dependency on another experiment by slug.
    #[must_use]
    pub fn dependency(mut self, slug: impl Into<String>) -> Self {
        self.dependencies.push(slug.into());
        self
    }

    /// Build the `ExperimentRecord`.
    #[must_use]
    pub fn build(self) -> ExperimentRecord {
        ExperimentRecord {
            slug: experiment_slug(&self.name, &self.created_at),
            short_slug: slugify(&self.name),
            last_updated: self.last_updated.unwrap_or(self.created_at),
            last_updated_by: self.last_updated_by.unwrap_or_else(|| self.author.clone()),
            name: self.name,
            author: self.author,
            created_at: self.created_at,
            tags: self.tags,
            parameters: self.parameters,
            metrics: self.metrics,
            tests: self.tests,
            artifacts: self.artifacts,
            dependencies: self.dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_experiment_record_slugs() {
        let created_at = Utc
            .with_ymd_and_hms(2025, 1, 20, 13, 23, 30)
            .unwrap()
            .fixed_offset();
        let record = ExperimentRecord::builder("My experiment", "myself")
            .created_at(created_at)
            .build();

        assert_eq!(record.slug(), "my-experiment-20250120132330");
        assert_eq!(record.short_slug(), "my-experiment");
        assert_eq!(record.last_updated(), created_at);
        assert_eq!(record.last_updated_by(), "myself");
    }

    #[test]
    fn test_experiment_record_builder() {
        let record = ExperimentRecord::builder("test-name", "me")
            .parameter("lr", 0.01)
            .metric("loss", 0.5)
            .tag("baseline")
            .dependency("upstream-20250101000000")
            .build();

        assert_eq!(record.parameters().get("lr"), Some(&serde_json::json!(0.01)));
        assert_eq!(record.metrics().get("loss"), Some(&serde_json::json!(0.5)));
        assert_eq!(record.tags(), ["baseline"]);
        assert_eq!(record.dependencies(), ["upstream-20250101000000"]);
    }
}
