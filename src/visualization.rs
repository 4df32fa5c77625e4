//! Plot-ready views of a clustering result
//!
//! Plotting tools consume one JSON object per line pairing a vector with the
//! coordinates of its assigned centroid:
//!
//! ```text
//! {"vec":[0.1,0.2],"centroid":[0.05,0.3]}
//! ```

use crate::clustering::ClusterResult;
use crate::dataset::{Component, Dataset};
use crate::error::{ClusterError, DatasetError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::io::{self, BufWriter, Write};

/// A vector paired with its assigned centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRecord {
    pub vec: Vec<f64>,
    pub centroid: Vec<f64>,
}

impl PlotRecord {
    /// Both points reduced to their first two dimensions
    pub fn projected(&self) -> PlotRecord {
        let (x, y) = project_2d(&self.vec);
        let (cx, cy) = project_2d(&self.centroid);
        PlotRecord {
            vec: vec![x, y],
            centroid: vec![cx, cy],
        }
    }
}

/// Simple 2D projection using the first two dimensions (fast, no computation)
///
/// One-dimensional vectors are placed on the x axis.
pub fn project_2d(v: &[f64]) -> (f64, f64) {
    match v {
        [] => (0.0, 0.0),
        [x] => (*x, 0.0),
        [x, y, ..] => (*x, *y),
    }
}

/// Pair every vector of `dataset` with the centroid it was assigned to
pub fn plot_records<T: Component>(
    dataset: &Dataset<T>,
    result: &ClusterResult,
) -> Result<Vec<PlotRecord>, ClusterError> {
    if result.assignments.len() != dataset.len() {
        return Err(ClusterError::invalid(format!(
            "result has {} assignments but dataset has {} vectors",
            result.assignments.len(),
            dataset.len()
        )));
    }

    dataset
        .iter()
        .zip(result.assignments.iter())
        .map(|(v, &c)| {
            let centroid = result.centroids.get(c).ok_or_else(|| {
                ClusterError::invalid(format!("assignment {} has no centroid", c))
            })?;
            Ok(PlotRecord {
                vec: v.iter().map(|&x| x.into()).collect(),
                centroid: centroid.clone(),
            })
        })
        .collect()
}

/// Seeded sample without replacement
///
/// Returns every record when `sample_size` is `None` or at least the number of
/// records. Sampled records keep their original relative order.
pub fn sample_records(
    records: Vec<PlotRecord>,
    sample_size: Option<usize>,
    seed: u64,
) -> Vec<PlotRecord> {
    let n = match sample_size {
        Some(n) if n < records.len() => n,
        _ => return records,
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keep = vec![false; records.len()];
    for i in rand::seq::index::sample(&mut rng, records.len(), n) {
        keep[i] = true;
    }

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect()
}

/// Write records as JSON lines
pub fn write_jsonl<W: Write>(records: &[PlotRecord], writer: W) -> Result<(), DatasetError> {
    let mut writer = BufWriter::new(writer);
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(DatasetError::Encode)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Human-readable report: labels, centers, and per-cluster statistics
pub fn write_summary<W: Write>(result: &ClusterResult, writer: W) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);

    writeln!(writer, "Cluster Labels for Each Vector:")?;
    writeln!(writer, "{}", serde_json::to_string(&result.assignments)?)?;
    writeln!(writer)?;
    writeln!(writer, "Cluster Centers:")?;
    for centroid in &result.centroids {
        writeln!(writer, "{}", serde_json::to_string(centroid)?)?;
    }
    writeln!(writer)?;

    writeln!(writer, "╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(writer, "║              Clustering Summary                              ║")?;
    writeln!(writer, "╚══════════════════════════════════════════════════════════════╝")?;
    writeln!(writer, "  Clusters:   {}", result.k())?;
    writeln!(writer, "  Vectors:    {}", result.assignments.len())?;
    writeln!(writer, "  Iterations: {}", result.iterations)?;
    writeln!(
        writer,
        "  Converged:  {}",
        if result.converged { "✓ yes" } else { "✗ no (iteration cap)" }
    )?;
    writeln!(writer, "  Inertia:    {:.6}", result.inertia)?;

    let total = result.assignments.len().max(1) as f64;
    for (i, size) in result.cluster_sizes().iter().enumerate() {
        let marker = if *size == 0 { " (empty)" } else { "" };
        writeln!(
            writer,
            "    Cluster {}: {} vectors ({:.1}%){}",
            i,
            size,
            *size as f64 / total * 100.0,
            marker
        )?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::cluster;

    fn fitted() -> (Dataset<f64>, ClusterResult) {
        let ds = Dataset::new(vec![vec![0.0, 0.0, 9.0], vec![0.0, 2.0, 9.0], vec![5.0, 5.0, 9.0]])
            .unwrap();
        let result = cluster(&ds, 1, 1e-9, 10, 0).unwrap();
        (ds, result)
    }

    #[test]
    fn test_project_2d() {
        assert_eq!(project_2d(&[1.0, 2.0, 3.0]), (1.0, 2.0));
        assert_eq!(project_2d(&[4.0]), (4.0, 0.0));
    }

    #[test]
    fn test_plot_records_pair_vector_with_centroid() {
        let (ds, result) = fitted();
        let records = plot_records(&ds, &result).unwrap();

        assert_eq!(records.len(), 3);
        for (record, v) in records.iter().zip(ds.iter()) {
            assert_eq!(record.vec.as_slice(), v);
            assert_eq!(record.centroid, result.centroids[0]);
        }

        let flat = records[2].projected();
        assert_eq!(flat.vec, vec![5.0, 5.0]);
        assert_eq!(flat.centroid.len(), 2);
    }

    #[test]
    fn test_plot_records_length_mismatch() {
        let (ds, mut result) = fitted();
        result.assignments.pop();
        assert!(plot_records(&ds, &result).is_err());
    }

    #[test]
    fn test_sample_records() {
        let records: Vec<PlotRecord> = (0..50)
            .map(|i| PlotRecord {
                vec: vec![i as f64],
                centroid: vec![0.0],
            })
            .collect();

        let all = sample_records(records.clone(), None, 1);
        assert_eq!(all.len(), 50);
        assert_eq!(sample_records(records.clone(), Some(80), 1).len(), 50);

        let a = sample_records(records.clone(), Some(10), 7);
        let b = sample_records(records, Some(10), 7);
        assert_eq!(a.len(), 10);
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0].vec[0] < w[1].vec[0]));
    }

    #[test]
    fn test_write_jsonl() {
        let record = PlotRecord {
            vec: vec![1.0, 2.5],
            centroid: vec![0.5, 0.0],
        };
        let mut buf = Vec::new();
        write_jsonl(&[record.clone()], &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"vec\":[1.0,2.5],\"centroid\":[0.5,0.0]}\n");
        let back: PlotRecord = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_write_summary() {
        let (_, result) = fitted();
        let mut buf = Vec::new();
        write_summary(&result, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Cluster Labels for Each Vector:\n[0,0,0]\n"));
        assert!(text.contains("Cluster Centers:"));
        assert!(text.contains("Cluster 0: 3 vectors (100.0%)"));
    }

    #[test]
    fn test_write_summary_with_stray_label() {
        let result: ClusterResult = serde_json::from_str(
            r#"{"assignments":[0,3],"centroids":[[1.0]],"iterations":1,
                "converged":true,"inertia":0.0,"inertia_history":[0.0]}"#,
        )
        .unwrap();

        let mut buf = Vec::new();
        write_summary(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Cluster 0: 1 vectors (50.0%)"));
    }
}
