//! JSON-lines dataset I/O
//!
//! One JSON array of numbers per line, e.g.
//!
//! ```text
//! [0.12, 3.5]
//! [0.10, 3.4]
//! ```
//!
//! Blank lines are skipped. Line numbers in errors are 1-based.

use super::{Component, Dataset};
use crate::error::DatasetError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

impl<T: Component + DeserializeOwned> Dataset<T> {
    /// Read a dataset from a JSON-lines stream
    pub fn from_jsonl_reader<R: BufRead>(reader: R) -> Result<Self, DatasetError> {
        let start = Instant::now();
        let mut vectors: Vec<Vec<T>> = Vec::new();
        let mut expected: Option<usize> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|source| match source.kind() {
                ErrorKind::InvalidData => DatasetError::Encoding {
                    line: line_no,
                    source,
                },
                _ => DatasetError::Io(source),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let vector: Vec<T> = serde_json::from_str(trimmed).map_err(|source| {
                DatasetError::Json {
                    line: line_no,
                    source,
                }
            })?;

            match expected {
                None => expected = Some(vector.len()),
                Some(dim) if dim != vector.len() => {
                    return Err(DatasetError::Dimension {
                        line: line_no,
                        expected: dim,
                        found: vector.len(),
                    });
                }
                Some(_) => {}
            }

            vectors.push(vector);
        }

        let dataset = Dataset::new(vectors)?;
        info!(
            vectors = dataset.len(),
            dimension = dataset.dimension(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "read dataset"
        );
        Ok(dataset)
    }

    /// Read a dataset from a JSON-lines file
    pub fn from_jsonl_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening dataset");
        let file = File::open(path)?;
        Self::from_jsonl_reader(BufReader::new(file))
    }
}

impl<T: Component + Serialize> Dataset<T> {
    /// Write the dataset as JSON lines, one vector per line
    pub fn write_jsonl<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        let mut writer = BufWriter::new(writer);
        for vector in self.vectors() {
            serde_json::to_writer(&mut writer, vector).map_err(DatasetError::Encode)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}
