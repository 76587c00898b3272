//! Project and Repository - ordered collections consumed by the interchange

use serde::{Deserialize, Serialize};

use super::{ArtifactRecord, ExperimentRecord};

/// Ordered collection of experiments.
///
/// Experiment order is logging order and is preserved by every projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    author: Option<String>,
    experiments: Vec<ExperimentRecord>,
}

impl Project {
    /// Create an empty project.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty project with a default author.
    #[must_use]
    pub fn with_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            experiments: Vec::new(),
        }
    }

    /// Create a project from existing experiments.
    #[must_use]
    pub fn from_experiments(experiments: Vec<ExperimentRecord>) -> Self {
        Self {
            author: None,
            experiments,
        }
    }

    /// Get the default author, if any.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Append an experiment.
    pub fn push(&mut self, experiment: ExperimentRecord) {
        self.experiments.push(experiment);
    }

    /// Get the experiments in order.
    #[must_use]
    pub fn experiments(&self) -> &[ExperimentRecord] {
        &self.experiments
    }

    /// Look up an experiment by slug or short slug.
    ///
    /// A short slug matches the most recently logged experiment with that
    /// name.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&ExperimentRecord> {
        self.experiments
            .iter()
            .rev()
            .find(|exp| exp.slug() == slug || exp.short_slug() == slug)
    }

    /// Number of experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Check if the project has no experiments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

/// Flat, ordered collection of artifacts not tied to any experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    artifacts: Vec<ArtifactRecord>,
}

impl Repository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository from existing artifacts.
    #[must_use]
    pub const fn from_artifacts(artifacts: Vec<ArtifactRecord>) -> Self {
        Self { artifacts }
    }

    /// Append an artifact.
    pub fn push(&mut self, artifact: ArtifactRecord) {
        self.artifacts.push(artifact);
    }

    /// Get the artifacts in order.
    #[must_use]
    pub fn artifacts(&self) -> &[ArtifactRecord] {
        &self.artifacts
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Check if the repository has no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
