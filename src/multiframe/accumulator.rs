//! Progressive supersampling by accumulating jittered frames.
//!
//! While the camera is still, each rendered frame is blended into a float
//! accumulation target with weight `w / (total + w)`, producing a running
//! weighted average over the sample kernel. Blending happens in linear
//! space (`source^gamma`) and the result is presented with `1 / gamma`.
//! Any camera movement restarts the sequence.

use glam::Vec2;
use rand::Rng;

use super::kernel::SampleKernel;
use crate::error::VistaError;
use crate::options::MultiframeOptions;

/// What a resolve pass reads from.
#[derive(Debug)]
pub enum Resolve<'a, S, T> {
    /// The freshly rendered frame.
    Source(&'a S),
    /// The accumulation target.
    Accumulated(&'a T),
}

/// Pixel operations the accumulator needs from a rendering backend.
///
/// `Source` is the frame the camera rendered, `Target` the accumulation
/// buffer, and `Output` whatever the result is presented to.
pub trait AccumulationBackend {
    /// Rendered frame.
    type Source;
    /// Accumulation buffer.
    type Target;
    /// Presentation destination.
    type Output: ?Sized;

    /// Pixel size of a rendered frame.
    fn source_size(&self, source: &Self::Source) -> (u32, u32);

    /// Pixel size of an accumulation buffer.
    fn target_size(&self, target: &Self::Target) -> (u32, u32);

    /// Allocate an accumulation buffer.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::TargetCreation`] if the buffer cannot be
    /// allocated.
    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Self::Target, VistaError>;

    /// `target = source^power * blend + target * (1 - blend)`.
    fn blend(
        &mut self,
        target: &mut Self::Target,
        source: &Self::Source,
        blend: f32,
        power: f32,
    );

    /// `output = input^power`.
    fn resolve(
        &mut self,
        input: Resolve<'_, Self::Source, Self::Target>,
        power: f32,
        output: &mut Self::Output,
    );
}

/// Largest supported `sample_count`; the kernel never exceeds 64 samples.
pub const MAX_SAMPLES_PER_AXIS: u32 = 8;

/// Projection jitter and texture LOD bias for the next render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JitterParams {
    /// Offset for the third projection column, already divided by the
    /// target size.
    pub offset: Vec2,
    /// Mip bias that sharpens textures while supersampling.
    pub texture_bias: f32,
}

/// Accumulation target plus the position in the sample sequence.
#[derive(Debug)]
pub struct AccumulationBuffer<T> {
    target: Option<T>,
    sample_id: usize,
    total_weight: f32,
}

impl<T> AccumulationBuffer<T> {
    fn new() -> Self {
        Self {
            target: None,
            sample_id: 0,
            total_weight: 0.0,
        }
    }

    fn restart(&mut self) {
        self.sample_id = 0;
        self.total_weight = 0.0;
    }
}

/// Multiframe accumulation renderer.
pub struct MultiframeAccumulator<B: AccumulationBackend> {
    backend: B,
    kernel: SampleKernel,
    buffer: AccumulationBuffer<B::Target>,
    enabled: bool,
    gamma: f32,
    texture_bias: f32,
}

impl<B: AccumulationBackend> MultiframeAccumulator<B> {
    /// Create an accumulator; the target is allocated on the first update.
    pub fn new(backend: B, options: &MultiframeOptions) -> Self {
        let mut accumulator = Self {
            backend,
            kernel: SampleKernel::generate(0, false, 0.0, 0.0, &mut rand::rng()),
            buffer: AccumulationBuffer::new(),
            enabled: options.enabled,
            gamma: options.gamma,
            texture_bias: 0.0,
        };
        accumulator.configure(options);
        accumulator
    }

    /// Regenerate the kernel and restart accumulation.
    pub fn configure(&mut self, options: &MultiframeOptions) {
        self.configure_with_rng(options, &mut rand::rng());
    }

    /// [`configure`](Self::configure) with a caller-supplied jitter source.
    pub fn configure_with_rng<R: Rng + ?Sized>(
        &mut self,
        options: &MultiframeOptions,
        rng: &mut R,
    ) {
        let grid = options.sample_count.min(MAX_SAMPLES_PER_AXIS);
        if grid != options.sample_count {
            log::warn!(
                "multiframe: sample_count {} clamped to {grid}",
                options.sample_count
            );
        }
        self.kernel = SampleKernel::generate(
            grid,
            options.jitter,
            options.kernel_size,
            options.sigma,
            rng,
        );
        self.texture_bias = if grid > 1 {
            -(grid as f32).log2()
        } else {
            0.0
        };
        self.enabled = options.enabled;
        self.gamma = if options.gamma > 0.0 { options.gamma } else { 1.0 };
        self.buffer.restart();
        log::debug!(
            "multiframe kernel: {} samples (jitter {}, size {}, sigma {})",
            self.kernel.len(),
            options.jitter,
            options.kernel_size,
            options.sigma
        );
    }

    /// The camera moved: restart accumulation on the next update.
    pub fn moved(&mut self) {
        self.buffer.restart();
    }

    /// Enable or disable accumulation. Disabled updates pass the source
    /// through unchanged.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            self.enabled = enabled;
            self.buffer.restart();
        }
    }

    /// Whether accumulation is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Index of the next sample to accumulate.
    #[must_use]
    pub fn sample_id(&self) -> usize {
        self.buffer.sample_id
    }

    /// Sum of the weights accumulated so far.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.buffer.total_weight
    }

    /// The active kernel.
    #[must_use]
    pub fn kernel(&self) -> &SampleKernel {
        &self.kernel
    }

    /// Whether more samples remain, so another frame should be rendered.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.enabled && self.buffer.sample_id < self.kernel.len()
    }

    /// The accumulation target, once allocated.
    #[must_use]
    pub fn target(&self) -> Option<&B::Target> {
        self.buffer.target.as_ref()
    }

    /// Rendering backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable rendering backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Jitter to apply to the projection before rendering the next frame.
    ///
    /// Zero while disabled, before the target exists, or once every sample
    /// has been accumulated. The first sample renders without texture bias
    /// because it is presented on its own.
    #[must_use]
    pub fn jitter(&self) -> JitterParams {
        let Some(target) = self.buffer.target.as_ref().filter(|_| self.enabled)
        else {
            return JitterParams::default();
        };
        let Some(sample) = self.kernel.get(self.buffer.sample_id) else {
            return JitterParams::default();
        };
        let (width, height) = self.backend.target_size(target);
        JitterParams {
            offset: sample.offset / Vec2::new(width as f32, height as f32),
            texture_bias: if self.buffer.sample_id == 0 {
                0.0
            } else {
                self.texture_bias
            },
        }
    }

    /// Accumulate one sample from `source` and present to `output`.
    ///
    /// Returns whether more samples remain.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::TargetCreation`] if the accumulation target
    /// has to be (re)allocated and allocation fails.
    pub fn update(
        &mut self,
        source: &B::Source,
        output: &mut B::Output,
    ) -> Result<bool, VistaError> {
        if !self.enabled {
            self.backend.resolve(Resolve::Source(source), 1.0, output);
            return Ok(false);
        }

        let (width, height) = self.backend.source_size(source);
        if width == 0 || height == 0 {
            log::debug!("multiframe: skipping zero-sized source");
            return Ok(false);
        }

        let target = match self.buffer.target.take() {
            Some(target) if self.backend.target_size(&target) == (width, height) => {
                target
            }
            previous => {
                if previous.is_some() {
                    log::debug!("multiframe: source resized to {width}x{height}");
                }
                drop(previous);
                let target = self.backend.create_target(width, height)?;
                log::info!("multiframe: accumulation target {width}x{height}");
                self.buffer.restart();
                target
            }
        };
        let target = self.buffer.target.insert(target);

        let count = self.kernel.len();
        if let Some(sample) = self.kernel.get(self.buffer.sample_id) {
            let weight = sample.weight;
            let blend = weight / (self.buffer.total_weight + weight);
            self.backend.blend(target, source, blend, self.gamma);
            self.buffer.total_weight += weight;
        }

        if self.buffer.sample_id == 0 {
            self.backend.resolve(Resolve::Source(source), 1.0, output);
        } else {
            self.backend
                .resolve(Resolve::Accumulated(target), 1.0 / self.gamma, output);
        }

        if self.buffer.sample_id < count {
            self.buffer.sample_id += 1;
        }
        Ok(self.buffer.sample_id < count)
    }

    /// Resolve the accumulated image into `output` (e.g. for a screenshot).
    ///
    /// Returns `false` when there is nothing accumulated yet.
    pub fn copy_to(&mut self, output: &mut B::Output) -> bool {
        let Some(target) = self.buffer.target.as_ref() else {
            return false;
        };
        self.backend
            .resolve(Resolve::Accumulated(target), 1.0 / self.gamma, output);
        true
    }

    /// Drop the accumulation target (device loss or teardown). It is
    /// recreated on the next update.
    pub fn release(&mut self) {
        if self.buffer.target.take().is_some() {
            log::debug!("multiframe: released accumulation target");
        }
        self.buffer.restart();
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::multiframe::image::{ColorImage, CpuAccumulator, FlakyBackend};

    const EPSILON: f32 = 1e-4;

    fn options(sample_count: u32) -> MultiframeOptions {
        MultiframeOptions {
            sample_count,
            ..MultiframeOptions::default()
        }
    }

    fn accumulator(sample_count: u32) -> MultiframeAccumulator<CpuAccumulator> {
        let mut acc = MultiframeAccumulator::new(CpuAccumulator, &options(sample_count));
        acc.configure_with_rng(&options(sample_count), &mut StdRng::seed_from_u64(1));
        acc
    }

    #[test]
    fn single_sample_presents_raw_source() {
        let mut acc = accumulator(1);
        let source = ColorImage::filled(4, 3, [0.25, 0.5, 0.75, 1.0]);
        let mut out = ColorImage::new(1, 1);
        let busy = acc.update(&source, &mut out).unwrap();
        assert!(!busy);
        assert_eq!(out, source);
        assert!((acc.total_weight() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn kernel_is_exhausted_after_n_squared_updates() {
        let mut acc = accumulator(3);
        let source = ColorImage::filled(2, 2, [0.5; 4]);
        let mut out = ColorImage::new(2, 2);
        for i in 0..9 {
            let busy = acc.update(&source, &mut out).unwrap();
            assert_eq!(busy, i < 8, "update {i}");
        }
        assert_eq!(acc.sample_id(), 9);
        assert!((acc.total_weight() - 1.0).abs() < EPSILON);
        // Further updates keep presenting without accumulating.
        assert!(!acc.update(&source, &mut out).unwrap());
        assert!((acc.total_weight() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn constant_source_converges_to_itself() {
        let mut acc = accumulator(2);
        let color = [0.2, 0.4, 0.6, 1.0];
        let source = ColorImage::filled(3, 3, color);
        let mut out = ColorImage::new(3, 3);
        while acc.update(&source, &mut out).unwrap() {}
        for (got, want) in out.pixel(1, 1).iter().zip(color) {
            assert!((got - want).abs() < EPSILON, "{got} vs {want}");
        }
    }

    #[test]
    fn accumulation_is_weighted_average_in_linear_space() {
        let mut acc = accumulator(2);
        let mut out = ColorImage::new(1, 1);
        let frames = [0.1_f32, 0.9, 0.3, 0.7];
        for v in frames {
            let _ = acc.update(&ColorImage::filled(1, 1, [v; 4]), &mut out).unwrap();
        }
        let gamma = MultiframeOptions::default().gamma;
        let linear: f32 = frames.iter().map(|v| v.powf(gamma)).sum::<f32>() / 4.0;
        let expected = linear.powf(1.0 / gamma);
        assert!((out.pixel(0, 0)[0] - expected).abs() < EPSILON);
    }

    #[test]
    fn moved_restarts_the_sequence() {
        let mut acc = accumulator(2);
        let source = ColorImage::filled(2, 2, [1.0; 4]);
        let mut out = ColorImage::new(2, 2);
        let _ = acc.update(&source, &mut out).unwrap();
        let _ = acc.update(&source, &mut out).unwrap();
        acc.moved();
        assert_eq!(acc.sample_id(), 0);
        assert_eq!(acc.total_weight(), 0.0);

        // After a move the raw frame is shown again.
        let fresh = ColorImage::filled(2, 2, [0.3; 4]);
        assert!(acc.update(&fresh, &mut out).unwrap());
        assert_eq!(out, fresh);
    }

    #[test]
    fn resize_recreates_target() {
        let mut acc = accumulator(2);
        let mut out = ColorImage::new(1, 1);
        let _ = acc.update(&ColorImage::filled(4, 4, [1.0; 4]), &mut out).unwrap();
        let _ = acc.update(&ColorImage::filled(4, 4, [1.0; 4]), &mut out).unwrap();
        let _ = acc.update(&ColorImage::filled(8, 2, [1.0; 4]), &mut out).unwrap();
        let target = acc.target().unwrap();
        assert_eq!((target.width(), target.height()), (8, 2));
        assert_eq!(acc.sample_id(), 1);
    }

    #[test]
    fn disabled_passes_source_through() {
        let mut acc = accumulator(3);
        acc.set_enabled(false);
        let source = ColorImage::filled(2, 2, [0.5, 0.1, 0.0, 1.0]);
        let mut out = ColorImage::new(2, 2);
        assert!(!acc.update(&source, &mut out).unwrap());
        assert_eq!(out, source);
        assert!(acc.target().is_none());
        assert!(!acc.is_busy());
        assert_eq!(acc.jitter(), JitterParams::default());
    }

    #[test]
    fn zero_sized_source_is_skipped() {
        let mut acc = accumulator(2);
        let mut out = ColorImage::new(1, 1);
        assert!(!acc.update(&ColorImage::new(0, 5), &mut out).unwrap());
        assert!(acc.target().is_none());
        assert_eq!(acc.sample_id(), 0);
    }

    #[test]
    fn jitter_scales_offset_by_target_size() {
        let mut acc = accumulator(3);
        let mut out = ColorImage::new(1, 1);
        assert_eq!(acc.jitter(), JitterParams::default());

        let _ = acc.update(&ColorImage::filled(10, 20, [0.0; 4]), &mut out).unwrap();
        let sample = *acc.kernel().get(1).unwrap();
        let jitter = acc.jitter();
        assert_eq!(jitter.offset, sample.offset / Vec2::new(10.0, 20.0));
        assert!((jitter.texture_bias + 3.0_f32.log2()).abs() < EPSILON);
    }

    #[test]
    fn copy_to_resolves_accumulation() {
        let mut acc = accumulator(1);
        let mut out = ColorImage::new(1, 1);
        assert!(!acc.copy_to(&mut out));
        let source = ColorImage::filled(2, 2, [0.5; 4]);
        let _ = acc.update(&source, &mut out).unwrap();
        let mut shot = ColorImage::new(1, 1);
        assert!(acc.copy_to(&mut shot));
        assert!((shot.pixel(0, 0)[0] - 0.5).abs() < EPSILON);

        acc.release();
        assert!(acc.target().is_none());
        assert!(!acc.copy_to(&mut shot));
    }

    #[test]
    fn failed_target_allocation_is_retried() {
        let mut acc = MultiframeAccumulator::new(FlakyBackend::refusing(), &options(2));
        acc.configure_with_rng(&options(2), &mut StdRng::seed_from_u64(1));
        let source = ColorImage::filled(8, 6, [0.5; 4]);
        let mut out = ColorImage::new(1, 1);

        let err = acc.update(&source, &mut out).unwrap_err();
        assert!(matches!(
            err,
            VistaError::TargetCreation {
                width: 8,
                height: 6,
                ..
            }
        ));
        assert!(acc.target().is_none());
        assert_eq!(acc.sample_id(), 0);

        acc.backend_mut().refuse = false;
        assert!(acc.update(&source, &mut out).unwrap());
        assert_eq!(acc.backend().attempts, 2);
        assert_eq!(acc.sample_id(), 1);
        assert!(acc.target().is_some());
        assert!((out.pixel(0, 0)[0] - 0.5).abs() < EPSILON);
    }

    #[test]
    fn oversized_sample_count_is_clamped() {
        let mut acc = accumulator(u32::MAX);
        assert_eq!(acc.kernel().len(), 64);
        let mut out = ColorImage::new(1, 1);
        assert!(acc.update(&ColorImage::filled(2, 2, [0.5; 4]), &mut out).unwrap());
        assert!((acc.jitter().texture_bias + 3.0).abs() < EPSILON);
    }

    #[test]
    fn zero_sample_count_uses_one_centered_sample() {
        let mut acc = accumulator(0);
        assert_eq!(acc.kernel().len(), 1);
        let mut out = ColorImage::new(1, 1);
        assert!(!acc.update(&ColorImage::filled(1, 1, [1.0; 4]), &mut out).unwrap());
    }
}
