//! vecluster - deterministic k-means over vector datasets
//!
//! Loads fixed-dimension vectors from JSON lines, partitions them with
//! Lloyd's algorithm, and turns the result into plot-ready records.
//! Identical inputs and seed always give bit-identical results, with or
//! without parallel assignment.

pub mod clustering;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod visualization;

// Re-export commonly used types
pub use clustering::{cluster, ClusterEngine, ClusterResult, InitMethod, KMeansConfig};
pub use dataset::{generate_clusters, Component, Dataset, GeneratorConfig, SyntheticClusters};
pub use distance::{euclidean, nearest, squared_euclidean};
pub use error::{ClusterError, ConfigError, DatasetError};
pub use visualization::{plot_records, project_2d, sample_records, PlotRecord};
