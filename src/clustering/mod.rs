//! Clustering
//!
//! Provides:
//! - Lloyd's k-means with random-sample or k-means++ seeding
//! - Run configuration loadable from JSON

pub mod config;
pub mod kmeans;

pub use config::{InitMethod, KMeansConfig};
pub use kmeans::{cluster, within_cluster_sse, ClusterEngine, ClusterResult, SHARD_SIZE};
