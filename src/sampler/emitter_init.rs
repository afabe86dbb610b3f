//! Emitter placement and initial states

use crate::error::{Result, SimulationError};
use crate::types::{Emitter, EmitterPopulation, EmitterState, PositionMode, SimulationConfig};
use rand::Rng;
use rand::distributions::Uniform;
use rand_distr::{Distribution, Normal};
use std::ops::Range;
use tracing::{debug, warn};

/// Molecule count range used when the configuration leaves it unset
pub const RANDOM_MOLECULE_RANGE: Range<usize> = 10..15;

/// Source of emitter coordinates over a square detector of side `extent_nm`.
pub trait PositionGenerator {
    fn generate<R: Rng + ?Sized>(
        &self,
        count: usize,
        extent_nm: f64,
        rng: &mut R,
    ) -> Result<Vec<[f64; 2]>>;
}

impl PositionGenerator for PositionMode {
    fn generate<R: Rng + ?Sized>(
        &self,
        count: usize,
        extent_nm: f64,
        rng: &mut R,
    ) -> Result<Vec<[f64; 2]>> {
        // All x coordinates are drawn before the y coordinates
        let unit: Vec<f64> = match *self {
            PositionMode::Uniform => Uniform::new(0.0, 1.0)
                .sample_iter(&mut *rng)
                .take(2 * count)
                .collect(),
            PositionMode::Normal { mean, std_dev } => Normal::new(mean, std_dev)
                .map_err(|e| {
                    SimulationError::invalid_parameter("position_mode", format!("{:?}", self), e.to_string())
                })?
                .sample_iter(&mut *rng)
                .take(2 * count)
                .collect(),
        };
        let (xs, ys) = unit.split_at(count);
        Ok(xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| [x * extent_nm, y * extent_nm])
            .collect())
    }
}

/// Number of emitters for this run, drawing one when the config leaves it open
pub fn resolve_molecule_count<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> usize {
    config
        .molecules
        .unwrap_or_else(|| rng.gen_range(RANDOM_MOLECULE_RANGE))
}

/// Place `molecules` emitters with the configured position mode.
pub fn initialize_emitters<R: Rng + ?Sized>(
    config: &SimulationConfig,
    molecules: usize,
    rng: &mut R,
) -> Result<EmitterPopulation> {
    initialize_emitters_with(&config.position_mode, molecules, config.extent_nm(), rng)
}

/// Place emitters with a caller-supplied generator.
///
/// A single emitter is always centered and ON, without consuming randomness.
pub fn initialize_emitters_with<G, R>(
    generator: &G,
    molecules: usize,
    extent_nm: f64,
    rng: &mut R,
) -> Result<EmitterPopulation>
where
    G: PositionGenerator + ?Sized,
    R: Rng + ?Sized,
{
    if molecules == 0 {
        return Err(SimulationError::invalid_parameter("molecules", 0, "must be positive"));
    }

    if molecules == 1 {
        let center = extent_nm / 2.0;
        return Ok(EmitterPopulation {
            emitters: vec![Emitter::builder().index(0).x_nm(center).y_nm(center).build()],
            initial_states: vec![EmitterState::On],
        });
    }

    let positions = generator.generate(molecules, extent_nm, rng)?;
    if positions.len() != molecules {
        return Err(SimulationError::invalid_parameter(
            "position_generator",
            positions.len(),
            format!("expected {} positions", molecules),
        ));
    }
    let emitters: Vec<Emitter> = positions
        .iter()
        .enumerate()
        .map(|(index, &[x_nm, y_nm])| Emitter::builder().index(index).x_nm(x_nm).y_nm(y_nm).build())
        .collect();

    let outside = emitters
        .iter()
        .filter(|e| !(0.0..=extent_nm).contains(&e.x_nm) || !(0.0..=extent_nm).contains(&e.y_nm))
        .count();
    if outside > 0 {
        warn!(outside, molecules, extent_nm, "emitters placed outside the detector extent");
    }

    let initial_states: Vec<EmitterState> = (0..molecules)
        .map(|_| {
            if rng.gen_bool(0.5) {
                EmitterState::On
            } else {
                EmitterState::Off
            }
        })
        .collect();

    debug!(
        molecules,
        initially_on = initial_states.iter().filter(|s| s.is_on()).count(),
        "initialized emitters"
    );

    Ok(EmitterPopulation {
        emitters,
        initial_states,
    })
}
