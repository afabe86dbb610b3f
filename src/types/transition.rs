//! Markov transition model over emitter states

use crate::error::{Result, SimulationError};
use crate::types::emitter::EmitterState;
use serde::{Deserialize, Serialize};

/// Tolerance applied when checking that a row sums to one
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// 3×3 row-stochastic matrix. Rows are the current state and columns the next
/// state, both in [`EmitterState::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionMatrix(pub [[f64; 3]; 3]);

impl Default for TransitionMatrix {
    fn default() -> Self {
        Self::canonical()
    }
}

impl TransitionMatrix {
    /// Blinking rates used for the reference SMLM movies
    pub fn canonical() -> Self {
        Self([
            [0.3999, 0.60, 0.0001],
            [0.2099, 0.79, 0.0001],
            [0.0, 0.0, 1.0],
        ])
    }

    pub fn row(&self, from: EmitterState) -> &[f64; 3] {
        &self.0[from.index()]
    }

    pub fn probability(&self, from: EmitterState, to: EmitterState) -> f64 {
        self.0[from.index()][to.index()]
    }

    /// Check every row is a distribution and that bleaching is absorbing.
    pub fn validate(&self) -> Result<()> {
        for (row, state) in EmitterState::ALL.iter().enumerate() {
            let probs = &self.0[row];
            let invalid = |reason: String| SimulationError::InvalidTransitionModel {
                row,
                state: state.name(),
                reason,
            };

            if let Some(p) = probs.iter().find(|p| !p.is_finite()) {
                return Err(invalid(format!("non-finite probability {}", p)));
            }
            if let Some(p) = probs.iter().find(|&&p| p < 0.0) {
                return Err(invalid(format!("negative probability {}", p)));
            }
            let sum: f64 = probs.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(invalid(format!("probabilities sum to {}, expected 1", sum)));
            }
        }

        let bleached = self.row(EmitterState::Bleached);
        if *bleached != [0.0, 0.0, 1.0] {
            return Err(SimulationError::InvalidTransitionModel {
                row: EmitterState::Bleached.index(),
                state: EmitterState::Bleached.name(),
                reason: format!("bleached state must be absorbing, got {:?}", bleached),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_matrix_is_valid() {
        TransitionMatrix::canonical().validate().unwrap();
        assert_eq!(
            TransitionMatrix::default().probability(EmitterState::On, EmitterState::Bleached),
            0.0001
        );
    }

    #[test]
    fn test_row_sum_rejected() {
        let mut m = TransitionMatrix::canonical();
        m.0[1] = [0.2, 0.7, 0.0001];
        let err = m.validate().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidTransitionModel { row: 1, state: "off", .. }
        ));
    }

    #[test]
    fn test_negative_entry_rejected() {
        let mut m = TransitionMatrix::canonical();
        m.0[0] = [1.1, -0.1, 0.0];
        let err = m.validate().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidTransitionModel { row: 0, .. }));
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_non_absorbing_bleach_rejected() {
        let mut m = TransitionMatrix::canonical();
        m.0[2] = [0.5, 0.0, 0.5];
        let err = m.validate().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidTransitionModel { row: 2, .. }));

        // Sums to one within tolerance but could still leave BLEACHED
        m.0[2] = [5e-10, 0.0, 1.0];
        let err = m.validate().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidTransitionModel { row: 2, .. }));
        assert!(err.to_string().contains("absorbing"));
    }

    #[test]
    fn test_matrix_json_shape() {
        let m: TransitionMatrix =
            serde_json::from_str("[[0.5, 0.5, 0.0], [0.5, 0.5, 0.0], [0.0, 0.0, 1.0]]").unwrap();
        m.validate().unwrap();
        assert_eq!(m.probability(EmitterState::Off, EmitterState::On), 0.5);
    }
}
