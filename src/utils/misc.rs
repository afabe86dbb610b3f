use rand::{Rng, RngCore, thread_rng};

/// Seed for a run: the configured one, or a fresh one from the thread RNG
pub fn run_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| thread_rng().next_u64())
}

/// One independent seed per frame, drawn in frame order from the run's
/// generator so frame-parallel sampling stays reproducible.
pub fn derive_frame_seeds<R: Rng + ?Sized>(nframes: usize, rng: &mut R) -> Vec<u64> {
    (0..nframes).map(|_| rng.next_u64()).collect()
}

/// File name used for exported stacks, e.g. `1000_Molecules_500_Frames_Sim.tiff`
pub fn default_stack_file_name(molecules: usize, nframes: usize) -> String {
    format!("{}_Molecules_{}_Frames_Sim.tiff", molecules, nframes)
}
