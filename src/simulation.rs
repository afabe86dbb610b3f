use crate::error::Result;
use crate::processing::{BinEdges, FrameHistogrammer, StackCompositor};
use crate::sampler::{PhotonSampler, StateEvolver, initialize_emitters, resolve_molecule_count};
use crate::types::{EmitterPopulation, EmitterState, FrameImage, ImageStack, SimulationConfig, StateTrajectories};
use crate::utils::{
    default_stack_file_name, derive_frame_seeds, emitter_table, frame_table, run_seed, write_stack_tiff,
    write_table_parquet,
};
use itertools::Itertools;
use ndarray::{Array2, Array3, Axis};
use polars::prelude::DataFrame;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// A configured simulation: validated parameters plus the stage samplers
/// built from them.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    evolver: StateEvolver,
    sampler: PhotonSampler,
    histogrammer: FrameHistogrammer,
    compositor: StackCompositor,
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// Seed the run's master generator was created from
    pub seed: u64,
    pub population: EmitterPopulation,
    pub trajectories: StateTrajectories,
    /// Realized photon counts, `(emitters, frames)`
    pub photon_counts: Array2<u32>,
    /// Integer detector counts, `(frames, size, size)`
    pub histograms: Array3<u32>,
    pub stack: ImageStack,
}

impl Simulation {
    /// Validate the configuration and build every stage.
    ///
    /// Nothing is sampled until [`Simulation::run`].
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let evolver = StateEvolver::new(&config.transition_matrix)?;
        let sampler = PhotonSampler::from_config(&config)?;
        let histogrammer = FrameHistogrammer::new(BinEdges::new(config.size, config.resolution_nm)?);
        let compositor = StackCompositor::new(config.noise, config.background)?;
        Ok(Self {
            config,
            evolver,
            sampler,
            histogrammer,
            compositor,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run with the configured seed, or a fresh one when none is set
    pub fn run(&self) -> Result<SimulationOutput> {
        self.run_seeded(run_seed(self.config.seed))
    }

    pub fn run_seeded(&self, seed: u64) -> Result<SimulationOutput> {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = &self.config;

        let molecules = resolve_molecule_count(config, &mut rng);
        info!(
            seed,
            molecules,
            nframes = config.nframes,
            size = config.size,
            mode = config.position_mode.name(),
            "starting simulation"
        );

        let population = initialize_emitters(config, molecules, &mut rng)?;
        let trajectories = self
            .evolver
            .evolve(&population.initial_states, config.nframes, &mut rng);

        // Frames only depend on their own seed from here on
        let frame_seeds = derive_frame_seeds(config.nframes, &mut rng);
        let frames: Vec<(Vec<u32>, FrameImage)> = frame_seeds
            .par_iter()
            .enumerate()
            .map(|(frame, &frame_seed)| {
                let mut frame_rng = StdRng::seed_from_u64(frame_seed);
                let emission =
                    self.sampler
                        .sample_frame(&population.emitters, trajectories.frame(frame), &mut frame_rng);
                let image = self.histogrammer.histogram(&emission.landings);
                debug!(
                    frame,
                    on = trajectories.count_in_frame(frame, EmitterState::On),
                    emitted = emission.total_photons(),
                    detected = image.sum(),
                    "sampled frame"
                );
                (emission.photon_counts, image)
            })
            .collect();

        let mut photon_counts = Array2::<u32>::zeros((molecules, config.nframes));
        for (mut column, (counts, _)) in photon_counts.axis_iter_mut(Axis(1)).zip(&frames) {
            for (slot, &count) in column.iter_mut().zip(counts) {
                *slot = count;
            }
        }
        let images: Vec<FrameImage> = frames.into_iter().map(|(_, image)| image).collect();
        let histograms = StackCompositor::stack_frames(&images)?;
        let stack = self.compositor.composite(&histograms, &mut rng);

        info!(
            noise = stack.noise,
            background = stack.background,
            bleached = trajectories.count_in_frame(config.nframes - 1, EmitterState::Bleached),
            "simulation finished"
        );

        Ok(SimulationOutput {
            seed,
            population,
            trajectories,
            photon_counts,
            histograms,
            stack,
        })
    }
}

impl SimulationOutput {
    pub fn molecules(&self) -> usize {
        self.population.len()
    }

    pub fn nframes(&self) -> usize {
        self.trajectories.nframes()
    }

    /// Per-emitter positions, state codes and photon counts
    pub fn emitter_table(&self) -> Result<DataFrame> {
        Ok(emitter_table(&self.population, &self.trajectories, &self.photon_counts)?)
    }

    /// Per-frame activity and photon totals
    pub fn frame_table(&self) -> Result<DataFrame> {
        Ok(frame_table(&self.trajectories, &self.photon_counts, &self.histograms)?)
    }

    pub fn default_stack_file_name(&self) -> String {
        default_stack_file_name(self.molecules(), self.nframes())
    }

    pub fn save_stack_as_tiff(&self, path: impl AsRef<Path>) -> Result<()> {
        write_stack_tiff(&self.stack, path)
    }

    pub fn save_emitter_table_as_parquet(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut df = self.emitter_table()?;
        write_table_parquet(&mut df, path)
    }

    /// Human-readable description of the run
    pub fn get_summary(&self) -> String {
        let mut result = String::new();
        let (nframes, height, width) = self.stack.shape();

        result.push_str("Simulation:\n");
        result.push_str(&format!("  Seed: {}\n", self.seed));
        result.push_str(&format!("  Molecules: {}\n", self.molecules()));
        result.push_str(&format!("  Stack: {} frames of {}x{}\n", nframes, width, height));
        result.push_str(&format!("  Noise offset: {:.4}\n", self.stack.noise));
        result.push_str(&format!("  Background offset: {:.4}\n", self.stack.background));

        let emitted: u64 = self.photon_counts.iter().map(|&c| c as u64).sum();
        let detected: u64 = self.histograms.iter().map(|&c| c as u64).sum();
        result.push_str(&format!("  Photons emitted: {}\n", emitted));
        result.push_str(&format!("  Photons on detector: {}\n", detected));

        if let Some((min, max)) = self.stack.data.iter().copied().minmax().into_option() {
            result.push_str(&format!("  Pixel range: [{:.3}, {:.3}]\n", min, max));
        }

        let bleached = (0..self.molecules())
            .filter(|&i| self.trajectories.bleach_frame(i).is_some())
            .count();
        result.push_str(&format!("  Bleached by last frame: {}\n", bleached));
        result
    }
}
