//! Stochastic stages of the simulation: placement, blinking and emission

pub mod emitter_init;
pub mod photon_sampler;
pub mod state_evolver;

// Re-export the sampling entry points
pub use emitter_init::{
    PositionGenerator, RANDOM_MOLECULE_RANGE, initialize_emitters, initialize_emitters_with,
    resolve_molecule_count,
};
pub use photon_sampler::PhotonSampler;
pub use state_evolver::StateEvolver;
