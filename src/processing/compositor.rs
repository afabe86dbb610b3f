use crate::error::{Result, SimulationError};
use crate::types::{BackgroundModel, FrameImage, ImageStack, NoiseModel};
use ndarray::{Array3, ArrayView2, Axis, Zip};
use rand::Rng;
use rand::distributions::Uniform;
use rand_distr::{Distribution, Normal};

/// Stacks frames and adds one noise draw and one background draw to every
/// pixel.
#[derive(Debug, Clone, Copy)]
pub struct StackCompositor {
    noise: Normal<f64>,
    background: Uniform<f64>,
}

impl StackCompositor {
    pub fn new(noise: NoiseModel, background: BackgroundModel) -> Result<Self> {
        let noise_dist = Normal::new(noise.mean, noise.std_dev).map_err(|e| {
            SimulationError::invalid_parameter(
                "noise",
                format!("normal(mean = {}, std_dev = {})", noise.mean, noise.std_dev),
                e.to_string(),
            )
        })?;
        background.validate()?;
        Ok(Self {
            noise: noise_dist,
            background: Uniform::new(background.low, background.high),
        })
    }

    /// Stack frames in order into `(nframes, size, size)` counts
    pub fn stack_frames(frames: &[FrameImage]) -> Result<Array3<u32>> {
        let views: Vec<ArrayView2<'_, u32>> = frames.iter().map(|f| f.view()).collect();
        Ok(ndarray::stack(Axis(0), &views)?)
    }

    /// `(count + noise) + background` for every pixel, one draw of each term.
    pub fn composite<R: Rng + ?Sized>(&self, counts: &Array3<u32>, rng: &mut R) -> ImageStack {
        let noise = self.noise.sample(rng);
        let background = self.background.sample(rng);
        let data = Zip::from(counts).par_map_collect(|&count| (count as f64 + noise) + background);
        ImageStack {
            data,
            noise,
            background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn frames() -> Vec<FrameImage> {
        (0..3u32)
            .map(|f| Array2::from_shape_fn((4, 4), |(i, j)| f * 100 + (i * 4 + j) as u32))
            .collect()
    }

    #[test]
    fn test_stack_preserves_frame_order() {
        let counts = StackCompositor::stack_frames(&frames()).unwrap();
        assert_eq!(counts.dim(), (3, 4, 4));
        assert_eq!(counts[[0, 0, 1]], 1);
        assert_eq!(counts[[2, 3, 3]], 215);
    }

    #[test]
    fn test_mismatched_frames_rejected() {
        let frames = vec![Array2::<u32>::zeros((4, 4)), Array2::<u32>::zeros((5, 5))];
        let err = StackCompositor::stack_frames(&frames).unwrap_err();
        assert!(matches!(err, SimulationError::Shape(_)));
    }

    #[test]
    fn test_offsets_are_uniform_scalars() {
        let compositor = StackCompositor::new(NoiseModel::default(), BackgroundModel::default()).unwrap();
        let counts = StackCompositor::stack_frames(&frames()).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let stack = compositor.composite(&counts, &mut rng);

        assert_eq!(stack.shape(), (3, 4, 4));
        assert!((0.0..100.0).contains(&stack.background));
        let offset = stack.noise + stack.background;
        for (value, &count) in stack.data.iter().zip(counts.iter()) {
            assert_relative_eq!(value - count as f64, offset, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_noise_is_exact_background() {
        let compositor = StackCompositor::new(
            NoiseModel { mean: 0.0, std_dev: 0.0 },
            BackgroundModel { low: 10.0, high: 11.0 },
        )
        .unwrap();
        let counts = Array3::<u32>::zeros((2, 3, 3));
        let mut rng = StdRng::seed_from_u64(1);
        let stack = compositor.composite(&counts, &mut rng);
        assert_eq!(stack.noise, 0.0);
        assert!(stack.data.iter().all(|&v| v == stack.background));
        assert!((10.0..11.0).contains(&stack.background));
    }

    #[test]
    fn test_invalid_models_rejected() {
        let err = StackCompositor::new(
            NoiseModel { mean: 0.0, std_dev: -1.0 },
            BackgroundModel::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "noise", .. }));

        let err = StackCompositor::new(
            NoiseModel::default(),
            BackgroundModel { low: 1.0, high: 1.0 },
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "background", .. }));

        let err = StackCompositor::new(
            NoiseModel::default(),
            BackgroundModel {
                low: -f64::MAX,
                high: f64::MAX,
            },
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "background", .. }));
    }
}
