//! K-means clustering implementation
//!
//! Lloyd's algorithm: alternate an assignment step (every vector goes to its
//! nearest centroid, ties to the lowest centroid index) and an update step
//! (every centroid moves to the mean of its members) until no centroid moves
//! farther than the tolerance or the iteration budget runs out.
//!
//! A centroid that receives no members keeps its previous position.

use super::config::{InitMethod, KMeansConfig};
use crate::dataset::{Component, Dataset};
use crate::distance::{euclidean, nearest, squared_euclidean};
use crate::error::ClusterError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Vectors per assignment shard
///
/// Partial sums are formed per shard and merged in shard order on both the
/// parallel and the sequential path, so the two produce identical bits.
pub const SHARD_SIZE: usize = 4096;

/// Final partition of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// Cluster index of each vector, in dataset order
    pub assignments: Vec<usize>,
    /// One centroid per cluster
    pub centroids: Vec<Vec<f64>>,
    /// Assign/update rounds executed
    pub iterations: usize,
    /// Whether the run stopped on the tolerance rather than the iteration cap
    pub converged: bool,
    /// Within-cluster sum of squared distances for `assignments` and `centroids`
    pub inertia: f64,
    /// Inertia after each assignment step
    pub inertia_history: Vec<f64>,
}

impl ClusterResult {
    /// Number of clusters
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    pub fn dimension(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    /// Find the nearest centroid for a new vector
    pub fn predict<T: Component>(&self, vector: &[T]) -> Result<usize, ClusterError> {
        if vector.len() != self.dimension() {
            return Err(ClusterError::invalid(format!(
                "vector has dimension {} but centroids have {}",
                vector.len(),
                self.dimension()
            )));
        }
        Ok(nearest(vector, &self.centroids).0)
    }

    /// Vector indices per cluster. Labels outside `0..k` (only possible in a
    /// hand-built or deserialized result) are skipped.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.k()];
        for (i, &cluster_id) in self.assignments.iter().enumerate() {
            if let Some(cluster) = clusters.get_mut(cluster_id) {
                cluster.push(i);
            }
        }
        clusters
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k()];
        for &cluster_id in &self.assignments {
            if let Some(size) = sizes.get_mut(cluster_id) {
                *size += 1;
            }
        }
        sizes
    }
}

/// Lloyd's k-means over a [`Dataset`]
///
/// Holds only configuration; every call to [`ClusterEngine::cluster`] owns its
/// own centroid buffers.
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    config: KMeansConfig,
}

impl ClusterEngine {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Seeded initial centroids for `dataset`
    pub fn initial_centroids<T: Component>(
        &self,
        dataset: &Dataset<T>,
    ) -> Result<Vec<Vec<f64>>, ClusterError> {
        self.config.validate(dataset.len())?;

        let vectors = dataset.vectors();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let indices = match self.config.init {
            InitMethod::RandomSample => {
                rand::seq::index::sample(&mut rng, vectors.len(), self.config.k).into_vec()
            }
            InitMethod::PlusPlus => self.init_plusplus(vectors, &mut rng),
        };

        Ok(indices
            .into_iter()
            .map(|i| vectors[i].iter().map(|&x| x.into()).collect())
            .collect())
    }

    /// Run k-means to convergence or until `max_iterations` rounds have run
    pub fn cluster<T: Component>(&self, dataset: &Dataset<T>) -> Result<ClusterResult, ClusterError> {
        let start = Instant::now();
        let mut centroids = self.initial_centroids(dataset)?;
        let vectors = dataset.vectors();
        let dimension = dataset.dimension();

        let mut inertia_history = Vec::new();
        let mut iterations = 0;
        let mut converged = false;

        for iteration in 1..=self.config.max_iterations {
            iterations = iteration;

            let pass = self.assign_pass(vectors, &centroids, dimension);
            inertia_history.push(pass.inertia);

            let updated = update_centroids(&pass, &centroids);
            let shift = max_displacement(&centroids, &updated);
            centroids = updated;

            debug!(
                iteration,
                inertia = pass.inertia,
                shift,
                empty_clusters = pass.counts.iter().filter(|&&c| c == 0).count(),
                "lloyd iteration"
            );

            if shift <= self.config.tolerance {
                converged = true;
                break;
            }
        }

        // Labels are recomputed so they agree with the centroids handed back.
        let last = self.assign_pass(vectors, &centroids, dimension);

        info!(
            vectors = vectors.len(),
            dimension,
            k = self.config.k,
            iterations,
            converged,
            inertia = last.inertia,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "k-means finished"
        );

        Ok(ClusterResult {
            assignments: last.labels,
            centroids,
            iterations,
            converged,
            inertia: last.inertia,
            inertia_history,
        })
    }

    /// k-means++ seeding
    ///
    /// Falls back to the lowest-index unchosen vector once every remaining
    /// vector coincides with a chosen centroid, so k is never reduced.
    fn init_plusplus<T: Component>(&self, vectors: &[Vec<T>], rng: &mut ChaCha8Rng) -> Vec<usize> {
        let n = vectors.len();
        let k = self.config.k;
        let mut chosen = Vec::with_capacity(k);
        let mut is_chosen = vec![false; n];

        let first = rng.gen_range(0..n);
        chosen.push(first);
        is_chosen[first] = true;

        let mut min_d2: Vec<f64> = vectors
            .iter()
            .map(|v| squared_euclidean(v, &vectors[first]))
            .collect();

        while chosen.len() < k {
            let total: f64 = min_d2.iter().sum();

            let mut pick = None;
            if total > 0.0 && total.is_finite() {
                let mut target = rng.gen::<f64>() * total;
                for (i, &d) in min_d2.iter().enumerate() {
                    if d <= 0.0 || is_chosen[i] {
                        continue;
                    }
                    pick = Some(i);
                    target -= d;
                    if target < 0.0 {
                        break;
                    }
                }
            }

            // k <= n, so an unchosen vector always exists here
            let next = match pick.or_else(|| is_chosen.iter().position(|&c| !c)) {
                Some(i) => i,
                None => break,
            };
            chosen.push(next);
            is_chosen[next] = true;

            let centroid = &vectors[next];
            let shrink = |(d, v): (&mut f64, &Vec<T>)| {
                *d = d.min(squared_euclidean(v, centroid));
            };
            if self.config.parallel {
                min_d2.par_iter_mut().zip(vectors.par_iter()).for_each(shrink);
            } else {
                min_d2.iter_mut().zip(vectors.iter()).for_each(shrink);
            }
        }

        chosen
    }

    /// Assign every vector to its nearest centroid and accumulate member sums
    fn assign_pass<T: Component>(
        &self,
        vectors: &[Vec<T>],
        centroids: &[Vec<f64>],
        dimension: usize,
    ) -> Pass {
        let mut total = Pass::empty(centroids.len(), dimension, vectors.len());

        if self.config.parallel {
            let shards: Vec<Pass> = vectors
                .par_chunks(SHARD_SIZE)
                .map(|shard| assign_shard(shard, centroids, dimension))
                .collect();
            for shard in shards {
                total.merge(shard);
            }
        } else {
            for shard in vectors.chunks(SHARD_SIZE) {
                total.merge(assign_shard(shard, centroids, dimension));
            }
        }

        total
    }
}

/// Labels and per-cluster partial sums for a contiguous range of vectors
#[derive(Debug)]
struct Pass {
    labels: Vec<usize>,
    sums: Vec<Vec<f64>>,
    counts: Vec<usize>,
    inertia: f64,
}

impl Pass {
    fn empty(k: usize, dimension: usize, capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            sums: vec![vec![0.0; dimension]; k],
            counts: vec![0; k],
            inertia: 0.0,
        }
    }

    fn merge(&mut self, other: Pass) {
        self.labels.extend(other.labels);
        for (acc, part) in self.sums.iter_mut().zip(other.sums.iter()) {
            for (a, p) in acc.iter_mut().zip(part.iter()) {
                *a += p;
            }
        }
        for (acc, part) in self.counts.iter_mut().zip(other.counts.iter()) {
            *acc += part;
        }
        self.inertia += other.inertia;
    }
}

fn assign_shard<T: Component>(shard: &[Vec<T>], centroids: &[Vec<f64>], dimension: usize) -> Pass {
    let mut pass = Pass::empty(centroids.len(), dimension, shard.len());

    for vector in shard {
        let (cluster_id, dist) = nearest(vector, centroids);
        pass.labels.push(cluster_id);
        pass.counts[cluster_id] += 1;
        pass.inertia += dist;
        for (s, &x) in pass.sums[cluster_id].iter_mut().zip(vector.iter()) {
            *s += x.into();
        }
    }

    pass
}

/// New centroids from member means; empty clusters keep their previous position
fn update_centroids(pass: &Pass, previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    previous
        .iter()
        .zip(pass.sums.iter().zip(pass.counts.iter()))
        .map(|(prev, (sum, &count))| {
            if count == 0 {
                prev.clone()
            } else {
                let n = count as f64;
                sum.iter().map(|s| s / n).collect()
            }
        })
        .collect()
}

/// Largest Euclidean distance any centroid moved
fn max_displacement(old: &[Vec<f64>], new: &[Vec<f64>]) -> f64 {
    old.iter()
        .zip(new.iter())
        .map(|(a, b)| euclidean(a, b))
        .fold(0.0, f64::max)
}

/// Within-cluster sum of squared distances
pub fn within_cluster_sse<T: Component>(
    dataset: &Dataset<T>,
    assignments: &[usize],
    centroids: &[Vec<f64>],
) -> f64 {
    dataset
        .iter()
        .zip(assignments.iter())
        .map(|(v, &c)| squared_euclidean(v, &centroids[c]))
        .sum()
}

/// Cluster `dataset` into `k` groups with random-sample seeding
pub fn cluster<T: Component>(
    dataset: &Dataset<T>,
    k: usize,
    tolerance: f64,
    max_iterations: usize,
    seed: u64,
) -> Result<ClusterResult, ClusterError> {
    let config = KMeansConfig::new(k)
        .with_tolerance(tolerance)
        .with_max_iterations(max_iterations)
        .with_seed(seed);
    ClusterEngine::new(config).cluster(dataset)
}
