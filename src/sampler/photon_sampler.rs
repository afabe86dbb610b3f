//! Photon count and landing position sampling for ON emitters

use crate::error::{Result, SimulationError};
use crate::types::{Emitter, EmitterState, FrameEmission, PhotonRange, SimulationConfig};
use itertools::izip;
use ndarray::ArrayView1;
use rand::Rng;
use rand::distributions::Uniform;
use rand_distr::{Distribution, Normal};

/// Draws photon counts and isotropic normal landing offsets.
#[derive(Debug, Clone, Copy)]
pub struct PhotonSampler {
    count: Uniform<u32>,
    offset: Normal<f64>,
}

impl PhotonSampler {
    pub fn new(range: PhotonRange, sigma_nm: f64) -> Result<Self> {
        if range.min >= range.max {
            return Err(SimulationError::invalid_parameter(
                "photon_range",
                format!("[{}, {})", range.min, range.max),
                "range is empty",
            ));
        }
        if !(sigma_nm.is_finite() && sigma_nm > 0.0) {
            return Err(SimulationError::invalid_parameter(
                "photon_sigma_nm",
                sigma_nm,
                "must be a positive finite number",
            ));
        }
        let offset = Normal::new(0.0, sigma_nm)
            .map_err(|e| SimulationError::invalid_parameter("photon_sigma_nm", sigma_nm, e.to_string()))?;
        Ok(Self {
            count: Uniform::new(range.min, range.max),
            offset,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Self::new(config.photon_range, config.photon_sigma_nm)
    }

    /// Photons emitted by an emitter in the given state
    pub fn sample_count<R: Rng + ?Sized>(&self, state: EmitterState, rng: &mut R) -> u32 {
        if state.is_on() { self.count.sample(rng) } else { 0 }
    }

    /// Append `count` landing coordinates around `emitter` to `landings`
    pub fn sample_landings<R: Rng + ?Sized>(
        &self,
        emitter: &Emitter,
        count: u32,
        landings: &mut Vec<[f64; 2]>,
        rng: &mut R,
    ) {
        landings.extend((0..count).map(|_| {
            let x = emitter.x_nm + self.offset.sample(rng);
            let y = emitter.y_nm + self.offset.sample(rng);
            [x, y]
        }));
    }

    /// Sample one frame: counts for every emitter, then landings for the ON
    /// ones into a buffer sized from those counts.
    pub fn sample_frame<R: Rng + ?Sized>(
        &self,
        emitters: &[Emitter],
        states: ArrayView1<'_, EmitterState>,
        rng: &mut R,
    ) -> FrameEmission {
        let photon_counts: Vec<u32> = states.iter().map(|&s| self.sample_count(s, rng)).collect();
        let total: usize = photon_counts.iter().map(|&c| c as usize).sum();

        let mut landings = Vec::with_capacity(total);
        for (emitter, &count) in izip!(emitters, &photon_counts) {
            if count > 0 {
                self.sample_landings(emitter, count, &mut landings, rng);
            }
        }

        FrameEmission {
            photon_counts,
            landings,
        }
    }
}
