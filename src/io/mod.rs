//! Input/output helpers.
//!
//! Metrics never touch the filesystem on their own; the only output path is
//! the opt-in [`ArtifactSink`] used to dump raw inputs for inspection.

pub mod artifacts;

pub use artifacts::{ArtifactSink, MemoryArtifactSink, NpyArtifactSink};
