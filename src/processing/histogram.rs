use crate::error::{Result, SimulationError};
use crate::types::FrameImage;
use ndarray::Array2;

/// Bin edges `0, res, 2·res, …, size·res` shared by both image axes.
///
/// Every bin is half-open `[e_k, e_{k+1})` except the last one, which also
/// includes the upper edge.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    pub fn new(size: usize, resolution_nm: f64) -> Result<Self> {
        if size == 0 {
            return Err(SimulationError::invalid_parameter("size", size, "must be positive"));
        }
        if !(resolution_nm.is_finite() && resolution_nm > 0.0) {
            return Err(SimulationError::invalid_parameter(
                "resolution_nm",
                resolution_nm,
                "must be a positive finite number",
            ));
        }
        let edges = (0..=size).map(|k| k as f64 * resolution_nm).collect();
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins per axis
    pub fn bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin containing `value`, or `None` when it falls outside the edges
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        // NaN fails both comparisons
        if !(value >= first && value <= last) {
            return None;
        }
        let upper = self.edges.partition_point(|&e| e <= value);
        Some((upper - 1).min(self.bins() - 1))
    }
}

/// Bins photon landings into `size × size` frames with one fixed set of edges.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameHistogrammer {
    edges: BinEdges,
}

impl FrameHistogrammer {
    pub fn new(edges: BinEdges) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// 2D histogram of `(x, y)` landings, indexed `[x_bin, y_bin]`.
    ///
    /// Landings outside the edges are dropped; empty input gives zeros.
    pub fn histogram(&self, landings: &[[f64; 2]]) -> FrameImage {
        let bins = self.edges.bins();
        let mut image = Array2::<u32>::zeros((bins, bins));
        for &[x, y] in landings {
            if let (Some(i), Some(j)) = (self.edges.bin_index(x), self.edges.bin_index(y)) {
                image[[i, j]] += 1;
            }
        }
        image
    }
}
