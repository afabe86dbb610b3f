//! Deterministic image stages: histogramming and stack composition

pub mod compositor;
pub mod histogram;

// Re-export for easier access
pub use compositor::StackCompositor;
pub use histogram::{BinEdges, FrameHistogrammer};
