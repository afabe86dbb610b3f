//! Simulation parameters and their validation

use crate::error::{Result, SimulationError};
use crate::types::transition::TransitionMatrix;
use bon::bon;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How emitter coordinates are drawn over the detector extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PositionMode {
    /// Each coordinate ~ U[0, extent)
    #[default]
    Uniform,
    /// Each coordinate ~ N(mean, std_dev) in units of the extent
    Normal { mean: f64, std_dev: f64 },
}

impl PositionMode {
    pub const NORMAL_DEFAULT_MEAN: f64 = 2.0;
    pub const NORMAL_DEFAULT_STD_DEV: f64 = 1.0;
    pub const NAMES: [&'static str; 2] = ["uniform", "normal"];

    pub fn normal() -> Self {
        PositionMode::Normal {
            mean: Self::NORMAL_DEFAULT_MEAN,
            std_dev: Self::NORMAL_DEFAULT_STD_DEV,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PositionMode::Uniform => "uniform",
            PositionMode::Normal { .. } => "normal",
        }
    }
}

impl FromStr for PositionMode {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Ok(PositionMode::Uniform),
            "normal" => Ok(PositionMode::normal()),
            _ => Err(SimulationError::invalid_parameter(
                "position_mode",
                s,
                "expected `uniform` or `normal`",
            )),
        }
    }
}

/// Photon count range for an ON emitter, `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotonRange {
    pub min: u32,
    pub max: u32,
}

impl Default for PhotonRange {
    fn default() -> Self {
        Self { min: 1000, max: 10000 }
    }
}

/// Frame-wide additive noise, one draw per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    pub mean: f64,
    pub std_dev: f64,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self { mean: 0.0, std_dev: 1.0 }
    }
}

/// Frame-wide background offset ~ U[low, high), one draw per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundModel {
    pub low: f64,
    pub high: f64,
}

impl Default for BackgroundModel {
    fn default() -> Self {
        Self { low: 0.0, high: 100.0 }
    }
}

impl BackgroundModel {
    /// Both bounds finite, `low < high`, and a width that fits in an `f64`
    pub fn validate(&self) -> Result<()> {
        let Self { low, high } = *self;
        if !(low.is_finite() && high.is_finite() && low < high && (high - low).is_finite()) {
            return Err(SimulationError::invalid_parameter(
                "background",
                format!("[{}, {})", low, high),
                "range must be finite and non-empty",
            ));
        }
        Ok(())
    }
}

/// Immutable, validated parameters of one simulation run.
///
/// `molecules == None` means the count is drawn from `[10, 15)` when the run
/// starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Detector width and height in pixels
    pub size: usize,
    pub molecules: Option<usize>,
    pub nframes: usize,
    /// Physical pixel pitch in nm
    pub resolution_nm: f64,
    pub position_mode: PositionMode,
    pub transition_matrix: TransitionMatrix,
    pub photon_range: PhotonRange,
    /// Standard deviation of photon landings around the emitter, in nm
    pub photon_sigma_nm: f64,
    pub noise: NoiseModel,
    pub background: BackgroundModel,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: 1200,
            molecules: Some(1000),
            nframes: 500,
            resolution_nm: 65.0,
            position_mode: PositionMode::Uniform,
            transition_matrix: TransitionMatrix::canonical(),
            photon_range: PhotonRange::default(),
            photon_sigma_nm: 70.0,
            noise: NoiseModel::default(),
            background: BackgroundModel::default(),
            seed: None,
        }
    }
}

#[bon]
impl SimulationConfig {
    #[builder]
    pub fn new(
        #[builder(default = 1200)] size: usize,
        molecules: Option<usize>,
        #[builder(default = 500)] nframes: usize,
        #[builder(default = 65.0)] resolution_nm: f64,
        #[builder(default)] position_mode: PositionMode,
        #[builder(default)] transition_matrix: TransitionMatrix,
        #[builder(default)] photon_range: PhotonRange,
        #[builder(default = 70.0)] photon_sigma_nm: f64,
        #[builder(default)] noise: NoiseModel,
        #[builder(default)] background: BackgroundModel,
        seed: Option<u64>,
    ) -> Result<Self> {
        let config = Self {
            size,
            molecules,
            nframes,
            resolution_nm,
            position_mode,
            transition_matrix,
            photon_range,
            photon_sigma_nm,
            noise,
            background,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration; missing fields take the default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(mode) = value.pointer("/position_mode/mode").and_then(|m| m.as_str()) {
            if !PositionMode::NAMES.contains(&mode) {
                return Err(SimulationError::invalid_parameter(
                    "position_mode",
                    mode,
                    "expected `uniform` or `normal`",
                ));
            }
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Physical width of the detector in nm
    pub fn extent_nm(&self) -> f64 {
        self.size as f64 * self.resolution_nm
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SimulationError::invalid_parameter("size", self.size, "must be positive"));
        }
        if self.nframes == 0 {
            return Err(SimulationError::invalid_parameter(
                "nframes",
                self.nframes,
                "must be positive",
            ));
        }
        if self.molecules == Some(0) {
            return Err(SimulationError::invalid_parameter("molecules", 0, "must be positive"));
        }
        if !(self.resolution_nm.is_finite() && self.resolution_nm > 0.0) {
            return Err(SimulationError::invalid_parameter(
                "resolution_nm",
                self.resolution_nm,
                "must be a positive finite number",
            ));
        }
        if !(self.photon_sigma_nm.is_finite() && self.photon_sigma_nm > 0.0) {
            return Err(SimulationError::invalid_parameter(
                "photon_sigma_nm",
                self.photon_sigma_nm,
                "must be a positive finite number",
            ));
        }
        if self.photon_range.min >= self.photon_range.max {
            return Err(SimulationError::invalid_parameter(
                "photon_range",
                format!("[{}, {})", self.photon_range.min, self.photon_range.max),
                "range is empty",
            ));
        }
        if let PositionMode::Normal { mean, std_dev } = self.position_mode {
            if !mean.is_finite() || !(std_dev.is_finite() && std_dev > 0.0) {
                return Err(SimulationError::invalid_parameter(
                    "position_mode",
                    format!("normal(mean = {}, std_dev = {})", mean, std_dev),
                    "mean must be finite and std_dev positive",
                ));
            }
        }
        if !self.noise.mean.is_finite() || !(self.noise.std_dev.is_finite() && self.noise.std_dev >= 0.0) {
            return Err(SimulationError::invalid_parameter(
                "noise",
                format!("normal(mean = {}, std_dev = {})", self.noise.mean, self.noise.std_dev),
                "mean must be finite and std_dev non-negative",
            ));
        }
        self.background.validate()?;
        self.transition_matrix.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SimulationConfig::builder().molecules(1000).build().unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.extent_nm(), 78000.0);
    }

    #[test]
    fn test_zero_counts_rejected() {
        let err = SimulationConfig::builder().size(0).build().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "size", .. }));

        let err = SimulationConfig::builder().nframes(0).build().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "nframes", .. }));

        let err = SimulationConfig::builder().molecules(0).build().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "molecules", .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_bad_ranges_rejected() {
        let err = SimulationConfig::builder()
            .photon_range(PhotonRange { min: 10, max: 10 })
            .build()
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "photon_range", .. }));

        let err = SimulationConfig::builder()
            .resolution_nm(-65.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("resolution_nm"));

        let err = SimulationConfig::builder()
            .background(BackgroundModel { low: 5.0, high: 1.0 })
            .build()
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "background", .. }));
    }

    #[test]
    fn test_invalid_matrix_fails_configuration() {
        let err = SimulationConfig::builder()
            .transition_matrix(TransitionMatrix([[0.5, 0.6, 0.0], [0.2, 0.8, 0.0], [0.0, 0.0, 1.0]]))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidTransitionModel { row: 0, .. }));
    }

    #[test]
    fn test_position_mode_parse() {
        assert_eq!("uniform".parse::<PositionMode>().unwrap(), PositionMode::Uniform);
        assert_eq!(" Normal ".parse::<PositionMode>().unwrap(), PositionMode::normal());
        let err = "gaussian".parse::<PositionMode>().unwrap_err();
        match err {
            SimulationError::InvalidParameter { name, value, .. } => {
                assert_eq!(name, "position_mode");
                assert_eq!(value, "gaussian");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_json_config() {
        let config = SimulationConfig::from_json_str(
            r#"{"size": 10, "molecules": 1, "nframes": 2, "resolution_nm": 65.0,
                "position_mode": {"mode": "normal", "mean": 0.5, "std_dev": 0.1}}"#,
        )
        .unwrap();
        assert_eq!(config.size, 10);
        assert_eq!(config.photon_sigma_nm, 70.0);
        assert_eq!(config.position_mode, PositionMode::Normal { mean: 0.5, std_dev: 0.1 });

        let err = SimulationConfig::from_json_str(r#"{"nframes": 0}"#).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "nframes", .. }));

        let err = SimulationConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }

    #[test]
    fn test_json_unknown_position_mode() {
        let err = SimulationConfig::from_json_str(r#"{"position_mode": {"mode": "gaussian"}}"#).unwrap_err();
        match err {
            SimulationError::InvalidParameter { name, value, .. } => {
                assert_eq!(name, "position_mode");
                assert_eq!(value, "gaussian");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let config = SimulationConfig::from_json_str(r#"{"position_mode": {"mode": "uniform"}}"#).unwrap();
        assert_eq!(config.position_mode, PositionMode::default());
    }

    #[test]
    fn test_background_width_must_be_finite() {
        let err = SimulationConfig::builder()
            .background(BackgroundModel {
                low: -f64::MAX,
                high: f64::MAX,
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "background", .. }));
    }
}
