//! Python bindings, built with the `python` feature

use crate::error::SimulationError;
use crate::simulation::{Simulation, SimulationOutput};
use crate::types::{PositionMode, SimulationConfig};
use pyo3::{
    Bound, PyErr, PyResult, Python, pyfunction, pymodule, types::PyModule, types::PyModuleMethods,
    wrap_pyfunction,
};
use pyo3_polars::PyDataFrame;
use std::path::PathBuf;

// --- Error Conversion for PyO3 ---
impl From<SimulationError> for PyErr {
    fn from(err: SimulationError) -> PyErr {
        match err {
            SimulationError::Io(_) | SimulationError::Tiff(_) => {
                pyo3::exceptions::PyOSError::new_err(err.to_string())
            }
            err if err.is_configuration_error() => pyo3::exceptions::PyValueError::new_err(err.to_string()),
            err => pyo3::exceptions::PyRuntimeError::new_err(err.to_string()),
        }
    }
}

fn run_and_export(
    py: Python<'_>,
    config: SimulationConfig,
    output_path: Option<PathBuf>,
) -> PyResult<(PyDataFrame, PyDataFrame)> {
    let simulation = Simulation::new(config)?;

    // Sampling is pure Rust, so other Python threads may run meanwhile
    let output: SimulationOutput = py.allow_threads(|| simulation.run())?;

    if let Some(path) = output_path {
        let path = if path.is_dir() {
            path.join(output.default_stack_file_name())
        } else {
            path
        };
        output.save_stack_as_tiff(&path)?;
    }

    Ok((PyDataFrame(output.emitter_table()?), PyDataFrame(output.frame_table()?)))
}

/// Simulates a blinking-emitter SMLM movie.
///
/// Args:
///     size (int): Detector width and height in pixels.
///     molecules (int | None): Number of emitters; None draws 10 to 14.
///     nframes (int): Number of frames.
///     resolution_nm (float): Pixel pitch in nanometers.
///     mode (str): Emitter placement, "uniform" or "normal".
///     photon_sigma_nm (float): Spread of photon landings around an emitter.
///     seed (int | None): Seed for reproducible runs.
///     output_path (str | None): TIFF file, or directory for the default name.
///
/// Returns:
///     tuple[polars.DataFrame, polars.DataFrame]: The emitter table and the
///     per-frame table.
///
/// Raises:
///     ValueError: If a parameter or the transition model is invalid.
///     OSError: If the TIFF stack cannot be written.
#[pyfunction]
#[pyo3(signature = (
    size = 1200,
    molecules = Some(1000),
    nframes = 500,
    resolution_nm = 65.0,
    mode = "uniform",
    photon_sigma_nm = 70.0,
    seed = None,
    output_path = None
))]
#[allow(clippy::too_many_arguments)]
fn simulate_molecules(
    py: Python<'_>,
    size: usize,
    molecules: Option<usize>,
    nframes: usize,
    resolution_nm: f64,
    mode: &str,
    photon_sigma_nm: f64,
    seed: Option<u64>,
    output_path: Option<PathBuf>,
) -> PyResult<(PyDataFrame, PyDataFrame)> {
    let position_mode: PositionMode = mode.parse()?;
    let config = SimulationConfig::builder()
        .size(size)
        .maybe_molecules(molecules)
        .nframes(nframes)
        .resolution_nm(resolution_nm)
        .position_mode(position_mode)
        .photon_sigma_nm(photon_sigma_nm)
        .maybe_seed(seed)
        .build()?;
    run_and_export(py, config, output_path)
}

/// Simulates a movie from a JSON configuration string.
///
/// Same return value and errors as `simulate_molecules`.
#[pyfunction]
#[pyo3(signature = (config_json, output_path = None))]
fn simulate_from_json(
    py: Python<'_>,
    config_json: &str,
    output_path: Option<PathBuf>,
) -> PyResult<(PyDataFrame, PyDataFrame)> {
    let config = SimulationConfig::from_json_str(config_json)?;
    run_and_export(py, config, output_path)
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_molecules, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_from_json, m)?)?;
    Ok(())
}
