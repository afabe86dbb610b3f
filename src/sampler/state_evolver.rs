//! Markov-chain evolution of emitter blinking states

use crate::error::{Result, SimulationError};
use crate::types::{EmitterState, StateTrajectories, TransitionMatrix};
use ndarray::{Array2, ArrayView1};
use rand::Rng;
use rand::distributions::WeightedIndex;
use rand_distr::Distribution;
use tracing::debug;

/// Samples next states from a validated transition matrix.
///
/// Each row is turned into a cumulative-weight categorical distribution once,
/// at construction.
#[derive(Debug, Clone)]
pub struct StateEvolver {
    rows: [WeightedIndex<f64>; 3],
}

fn categorical(state: EmitterState, probs: &[f64; 3]) -> Result<WeightedIndex<f64>> {
    WeightedIndex::new(probs.iter().copied()).map_err(|e| SimulationError::InvalidTransitionModel {
        row: state.index(),
        state: state.name(),
        reason: e.to_string(),
    })
}

impl StateEvolver {
    pub fn new(matrix: &TransitionMatrix) -> Result<Self> {
        matrix.validate()?;
        Ok(Self {
            rows: [
                categorical(EmitterState::On, matrix.row(EmitterState::On))?,
                categorical(EmitterState::Off, matrix.row(EmitterState::Off))?,
                categorical(EmitterState::Bleached, matrix.row(EmitterState::Bleached))?,
            ],
        })
    }

    /// One categorical draw from the row of `from`
    pub fn step<R: Rng + ?Sized>(&self, from: EmitterState, rng: &mut R) -> EmitterState {
        let next = self.rows[from.index()].sample(rng);
        EmitterState::ALL[next]
    }

    /// Evolve every emitter from its initial state over `nframes` frames.
    ///
    /// Frames are advanced in increasing order; within a frame emitters are
    /// drawn in index order from the same generator.
    pub fn evolve<R: Rng + ?Sized>(
        &self,
        initial_states: &[EmitterState],
        nframes: usize,
        rng: &mut R,
    ) -> StateTrajectories {
        let molecules = initial_states.len();
        let mut states = Array2::from_elem((molecules, nframes), EmitterState::Off);
        if nframes == 0 {
            return StateTrajectories { states };
        }
        states.column_mut(0).assign(&ArrayView1::from(initial_states));

        for frame in 1..nframes {
            for emitter in 0..molecules {
                let previous = states[[emitter, frame - 1]];
                states[[emitter, frame]] = self.step(previous, rng);
            }
        }

        let trajectories = StateTrajectories { states };
        debug!(
            molecules,
            nframes,
            bleached = trajectories.count_in_frame(nframes - 1, EmitterState::Bleached),
            "evolved emitter states"
        );
        trajectories
    }
}
