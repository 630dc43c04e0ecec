//! Supersampling kernel: an ordered list of sub-pixel offsets with
//! normalized weights.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

/// One sub-pixel sample position and its contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Offset in pixels from the pixel centre.
    pub offset: Vec2,
    /// Normalized weight; all weights of a kernel sum to 1.
    pub weight: f32,
}

/// Sample kernel ordered from the centre outwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleKernel {
    samples: Vec<Sample>,
}

fn gauss(x: f32, sigma: f32) -> f32 {
    (1.0 / ((2.0 * PI).sqrt() * sigma)) * (-(x * x) / (2.0 * sigma * sigma)).exp()
}

impl SampleKernel {
    /// Build a `grid × grid` kernel.
    ///
    /// Grid positions span `[-1, 1]` on both axes and are scaled by
    /// `size / 2` pixels. With `jitter` each position is perturbed randomly
    /// inside its cell; otherwise positions are evenly spaced with samples
    /// on the edges. `sigma <= 0` weights every sample equally (box filter),
    /// otherwise a Gaussian of that sigma is evaluated over
    /// `ceil(3 * sigma) + 1` pixels. A `grid` of 0 yields a single centred
    /// sample.
    pub fn generate<R: Rng + ?Sized>(
        grid: u32,
        jitter: bool,
        size: f32,
        sigma: f32,
        rng: &mut R,
    ) -> Self {
        if grid == 0 {
            return Self {
                samples: vec![Sample {
                    offset: Vec2::ZERO,
                    weight: 1.0,
                }],
            };
        }

        let n = grid as f32;
        let half_size = size * 0.5;
        let kernel_size = (3.0 * sigma).ceil() + 1.0;
        let axis = |i: u32, rng: &mut R| -> f32 {
            if jitter {
                (i as f32 + rng.random::<f32>()) / n * 2.0 - 1.0
            } else if grid == 1 {
                0.0
            } else {
                i as f32 / (n - 1.0) * 2.0 - 1.0
            }
        };

        let mut samples = Vec::with_capacity((grid * grid) as usize);
        for x in 0..grid {
            for y in 0..grid {
                let sx = axis(x, &mut *rng);
                let sy = axis(y, &mut *rng);
                let weight = if sigma <= 0.0 {
                    1.0
                } else {
                    gauss(sx * kernel_size, sigma) * gauss(sy * kernel_size, sigma)
                };
                samples.push(Sample {
                    offset: Vec2::new(sx, sy) * half_size,
                    weight,
                });
            }
        }

        let total: f32 = samples.iter().map(|s| s.weight).sum();
        if total > 0.0 && total.is_finite() {
            for s in &mut samples {
                s.weight /= total;
            }
        } else {
            // Gaussian underflowed everywhere; fall back to a box filter.
            log::warn!("kernel weights vanished for sigma {sigma}, using box filter");
            let uniform = 1.0 / samples.len() as f32;
            for s in &mut samples {
                s.weight = uniform;
            }
        }

        samples.sort_by(|a, b| a.offset.length().total_cmp(&b.offset.length()));
        Self { samples }
    }

    /// Samples, closest to the pixel centre first.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a generated kernel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const EPSILON: f32 = 1e-5;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn weight_sum(k: &SampleKernel) -> f32 {
        k.samples().iter().map(|s| s.weight).sum()
    }

    fn assert_sorted(k: &SampleKernel) {
        for pair in k.samples().windows(2) {
            assert!(pair[0].offset.length() <= pair[1].offset.length());
        }
    }

    #[test]
    fn box_grid_has_equal_weights() {
        let k = SampleKernel::generate(5, false, 2.0, 0.0, &mut rng());
        assert_eq!(k.len(), 25);
        assert!((weight_sum(&k) - 1.0).abs() < EPSILON);
        for s in k.samples() {
            assert!((s.weight - 1.0 / 25.0).abs() < EPSILON);
        }
        assert_eq!(k.samples()[0].offset, Vec2::ZERO);
        assert_sorted(&k);
    }

    #[test]
    fn offsets_span_half_the_kernel_size() {
        let k = SampleKernel::generate(3, false, 4.0, 0.0, &mut rng());
        let max = k
            .samples()
            .iter()
            .map(|s| s.offset.x.abs().max(s.offset.y.abs()))
            .fold(0.0_f32, f32::max);
        assert!((max - 2.0).abs() < EPSILON);
    }

    #[test]
    fn gaussian_weights_fall_off_from_centre() {
        let k = SampleKernel::generate(5, false, 2.0, 0.5, &mut rng());
        assert!((weight_sum(&k) - 1.0).abs() < EPSILON);
        assert_sorted(&k);
        let first = k.samples()[0].weight;
        let last = k.samples()[k.len() - 1].weight;
        assert!(first > last);
    }

    #[test]
    fn jittered_samples_stay_inside_kernel() {
        for grid in [1, 2, 4, 7] {
            let k = SampleKernel::generate(grid, true, 2.0, 0.0, &mut rng());
            assert_eq!(k.len(), (grid * grid) as usize);
            assert!((weight_sum(&k) - 1.0).abs() < EPSILON);
            assert_sorted(&k);
            for s in k.samples() {
                assert!(s.offset.x.abs() <= 1.0 && s.offset.y.abs() <= 1.0);
            }
        }
    }

    #[test]
    fn degenerate_grids() {
        let k = SampleKernel::generate(0, false, 2.0, 0.0, &mut rng());
        assert_eq!(k.samples(), &[Sample {
            offset: Vec2::ZERO,
            weight: 1.0
        }]);

        let k = SampleKernel::generate(1, false, 2.0, 1.0, &mut rng());
        assert_eq!(k.len(), 1);
        assert_eq!(k.samples()[0].offset, Vec2::ZERO);
        assert!((k.samples()[0].weight - 1.0).abs() < EPSILON);
    }

    #[test]
    fn vanishing_gaussian_falls_back_to_box() {
        let k = SampleKernel::generate(2, false, 2.0, 1e-3, &mut rng());
        assert!((weight_sum(&k) - 1.0).abs() < EPSILON);
        for s in k.samples() {
            assert!((s.weight - 0.25).abs() < EPSILON);
        }
    }
}
