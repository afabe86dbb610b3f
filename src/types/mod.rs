//! Type definitions for the simulation

pub mod config;
pub mod emitter;
pub mod frame;
pub mod trajectory;
pub mod transition;

// Re-export the main types for convenience
pub use config::{BackgroundModel, NoiseModel, PhotonRange, PositionMode, SimulationConfig};
pub use emitter::{Emitter, EmitterPopulation, EmitterState};
pub use frame::{FrameEmission, FrameImage, ImageStack};
pub use trajectory::StateTrajectories;
pub use transition::TransitionMatrix;
