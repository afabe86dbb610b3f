//! Per-frame photon records and the composited image stack

use ndarray::{Array2, Array3};

/// Photons emitted by all ON emitters during one frame.
///
/// `landings` holds the row-stacked `(x_nm, y_nm)` coordinates of every
/// emitter in index order; `photon_counts[i]` is the number of rows emitter
/// `i` contributed (0 when it was not ON).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameEmission {
    pub photon_counts: Vec<u32>,
    pub landings: Vec<[f64; 2]>,
}

impl FrameEmission {
    pub fn total_photons(&self) -> u64 {
        self.photon_counts.iter().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.landings.is_empty()
    }
}

/// Detector image for one frame, indexed `[x_bin, y_bin]`
pub type FrameImage = Array2<u32>;

/// Final `(nframes, size, size)` stack with the scalar offsets it received
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack {
    pub data: Array3<f64>,
    pub noise: f64,
    pub background: f64,
}

impl ImageStack {
    pub fn nframes(&self) -> usize {
        self.data.dim().0
    }

    /// `(nframes, size, size)`
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }
}
