pub mod error;
pub mod processing;
#[cfg(feature = "python")]
pub mod python;
pub mod sampler;
pub mod simulation;
pub mod types;
pub mod utils;

pub use error::{Result, SimulationError};
pub use simulation::{Simulation, SimulationOutput};
pub use types::{
    BackgroundModel, Emitter, EmitterPopulation, EmitterState, FrameEmission, FrameImage, ImageStack,
    NoiseModel, PhotonRange, PositionMode, SimulationConfig, StateTrajectories, TransitionMatrix,
};
