//! Error type shared by configuration, simulation and export

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    /// A transition matrix row is not a probability distribution
    #[error("invalid transition model: row {row} ({state}): {reason}")]
    InvalidTransitionModel {
        row: usize,
        state: &'static str,
        reason: String,
    },
    /// A configuration value is out of range or unrecognized
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("frame shapes do not match: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode TIFF stack: {0}")]
    Tiff(#[from] tiff::TiffError),
    #[error("failed to build table: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl SimulationError {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while validating configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransitionModel { .. } | Self::InvalidParameter { .. } | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
