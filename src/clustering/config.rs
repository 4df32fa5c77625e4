//! K-means run configuration

use crate::error::{ClusterError, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the initial centroids are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InitMethod {
    /// k distinct vectors drawn without replacement
    #[default]
    RandomSample,
    /// k-means++: each new centroid drawn with probability proportional to
    /// its squared distance from the nearest centroid chosen so far
    PlusPlus,
}

/// Parameters of a single clustering run
///
/// Deserializable from JSON with every field optional:
///
/// ```json
/// { "k": 10, "tolerance": 0.01, "max_iterations": 100, "seed": 7, "init": "plus-plus" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Stop when no centroid moves farther than this (Euclidean)
    pub tolerance: f64,
    /// Hard cap on assign/update rounds
    pub max_iterations: usize,
    /// Seed for centroid initialization
    pub seed: u64,
    pub init: InitMethod,
    /// Run assignment over rayon shards. Does not change results.
    pub parallel: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            tolerance: 1e-4,
            max_iterations: 300,
            seed: 42,
            init: InitMethod::RandomSample,
            parallel: true,
        }
    }
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_init(mut self, init: InitMethod) -> Self {
        self.init = init;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Check the parameters against a dataset of `n` vectors
    pub fn validate(&self, n: usize) -> Result<(), ClusterError> {
        if self.k < 1 {
            return Err(ClusterError::invalid("k must be at least 1"));
        }
        if self.k > n {
            return Err(ClusterError::invalid(format!(
                "k ({}) cannot exceed the number of vectors ({})",
                self.k, n
            )));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(ClusterError::invalid(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::invalid("max_iterations must be at least 1"));
        }
        Ok(())
    }
}
