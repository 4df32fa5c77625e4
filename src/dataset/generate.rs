//! Synthetic clustered datasets
//!
//! Each cluster gets a center drawn uniformly from `[0, extent)^D`; its points
//! are drawn uniformly within `spread / 2` of the center on every axis. Output
//! is ordered cluster by cluster.

use super::Dataset;
use crate::error::ClusterError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Parameters for [`generate_clusters`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub clusters: usize,
    pub points_per_cluster: usize,
    pub dimension: usize,
    /// Upper bound (exclusive) of every center coordinate
    pub extent: f64,
    /// Side length of the box around each center that points fall in
    pub spread: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            clusters: 3,
            points_per_cluster: 100,
            dimension: 2,
            extent: 100.0,
            spread: 5.0,
            seed: 42,
        }
    }
}

/// Generated points together with the ground truth that produced them
#[derive(Debug, Clone)]
pub struct SyntheticClusters {
    pub dataset: Dataset<f64>,
    pub centers: Vec<Vec<f64>>,
    /// Source cluster of each point
    pub labels: Vec<usize>,
}

/// Generate a deterministic clustered dataset
pub fn generate_clusters(config: &GeneratorConfig) -> Result<SyntheticClusters, ClusterError> {
    if config.clusters == 0 {
        return Err(ClusterError::invalid("clusters must be at least 1"));
    }
    if config.points_per_cluster == 0 {
        return Err(ClusterError::invalid("points_per_cluster must be at least 1"));
    }
    if config.dimension == 0 {
        return Err(ClusterError::invalid("dimension must be at least 1"));
    }
    if !(config.extent.is_finite() && config.extent > 0.0) {
        return Err(ClusterError::invalid("extent must be a positive finite number"));
    }
    if !(config.spread.is_finite() && config.spread >= 0.0) {
        return Err(ClusterError::invalid("spread must be a non-negative finite number"));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let total = config.clusters * config.points_per_cluster;
    let mut centers = Vec::with_capacity(config.clusters);
    let mut vectors = Vec::with_capacity(total);
    let mut labels = Vec::with_capacity(total);
    let half = config.spread / 2.0;

    for cluster_id in 0..config.clusters {
        let center: Vec<f64> = (0..config.dimension)
            .map(|_| rng.gen::<f64>() * config.extent)
            .collect();

        for _ in 0..config.points_per_cluster {
            let point: Vec<f64> = center
                .iter()
                .map(|&c| c + rng.gen::<f64>() * config.spread - half)
                .collect();
            vectors.push(point);
            labels.push(cluster_id);
        }

        centers.push(center);
    }

    Ok(SyntheticClusters {
        dataset: Dataset::new(vectors)?,
        centers,
        labels,
    })
}
