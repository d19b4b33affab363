//! Optional side outputs for raw score and label matrices.
//!
//! The multi-label precision/recall helper can dump its inputs for offline
//! inspection. Nothing is written unless the caller hands in a sink.

use crate::config::ArtifactConfig;
use crate::core::{constants::*, error::Result};
use ndarray::{Array2, ArrayView2};
use std::path::{Path, PathBuf};

/// Destination for debug dumps of metric inputs.
pub trait ArtifactSink {
    /// Persist the raw score matrix (`samples x classes`).
    fn write_scores(&mut self, scores: &ArrayView2<'_, f64>) -> Result<()>;

    /// Persist the many-hot true-label matrix (`samples x classes`).
    fn write_labels(&mut self, labels: &ArrayView2<'_, i64>) -> Result<()>;
}

/// Writes `.npy` files into a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpyArtifactSink {
    scores_path: PathBuf,
    labels_path: PathBuf,
}

impl NpyArtifactSink {
    /// Sink writing the default file names into `directory`.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self::with_file_names(directory, DEFAULT_SCORES_ARTIFACT, DEFAULT_LABELS_ARTIFACT)
    }

    /// Sink with explicit file names.
    pub fn with_file_names<P: AsRef<Path>>(directory: P, scores_file: &str, labels_file: &str) -> Self {
        let directory = directory.as_ref();
        Self {
            scores_path: directory.join(scores_file),
            labels_path: directory.join(labels_file),
        }
    }

    /// Sink described by an [`ArtifactConfig`].
    pub fn from_config(config: &ArtifactConfig) -> Self {
        Self::with_file_names(&config.directory, &config.scores_file, &config.labels_file)
    }

    /// Path of the score dump.
    pub fn scores_path(&self) -> &Path {
        &self.scores_path
    }

    /// Path of the label dump.
    pub fn labels_path(&self) -> &Path {
        &self.labels_path
    }
}

impl ArtifactSink for NpyArtifactSink {
    fn write_scores(&mut self, scores: &ArrayView2<'_, f64>) -> Result<()> {
        ndarray_npy::write_npy(&self.scores_path, scores)?;
        log::debug!("wrote {:?} scores to {}", scores.dim(), self.scores_path.display());
        Ok(())
    }

    fn write_labels(&mut self, labels: &ArrayView2<'_, i64>) -> Result<()> {
        ndarray_npy::write_npy(&self.labels_path, labels)?;
        log::debug!("wrote {:?} labels to {}", labels.dim(), self.labels_path.display());
        Ok(())
    }
}

/// Keeps the most recent dumps in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryArtifactSink {
    /// Last score matrix written
    pub scores: Option<Array2<f64>>,
    /// Last label matrix written
    pub labels: Option<Array2<i64>>,
}

impl MemoryArtifactSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactSink for MemoryArtifactSink {
    fn write_scores(&mut self, scores: &ArrayView2<'_, f64>) -> Result<()> {
        self.scores = Some(scores.to_owned());
        Ok(())
    }

    fn write_labels(&mut self, labels: &ArrayView2<'_, i64>) -> Result<()> {
        self.labels = Some(labels.to_owned());
        Ok(())
    }
}
