//! Test Record - evaluation of an experiment on a named population

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LoggedValues, Values};

/// A test logged inside an experiment.
///
/// Parameters and metrics are keyed independently of the parent experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestRecord {
    name: String,
    description: Option<String>,
    #[serde(default)]
    parameters: Values,
    #[serde(default)]
    metrics: Values,
}

impl TestRecord {
    /// Create a test with a description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Create a test without a description.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Log a parameter.
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

    /// Get the test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl LoggedValues for TestRecord {
    fn parameters(&self) -> &Values {
        &self.parameters
    }

    fn metrics(&self) -> &Values {
        &self.metrics
    }
}
