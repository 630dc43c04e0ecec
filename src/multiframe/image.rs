//! CPU accumulation backend over linear RGBA float images.
//!
//! Used for headless rendering, offline supersampling and tests. It follows
//! the same blend and resolve arithmetic as the GPU passes.

use super::accumulator::{AccumulationBackend, Resolve};
use crate::error::VistaError;

/// Row-major RGBA float image.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl ColorImage {
    /// Transparent black image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0.0; 4])
    }

    /// Image with every pixel set to `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: [f32; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row by row.
    #[must_use]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Mutable pixels, row by row.
    pub fn pixels_mut(&mut self) -> &mut [[f32; 4]] {
        &mut self.pixels
    }

    /// Pixel at `(x, y)`; transparent black outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        if x >= self.width || y >= self.height {
            return [0.0; 4];
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Overwrite the pixel at `(x, y)`; ignored outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    fn reshape(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![[0.0; 4]; width as usize * height as usize];
        }
    }
}

fn raise(c: f32, power: f32) -> f32 {
    if power == 1.0 {
        c
    } else {
        c.max(0.0).powf(power)
    }
}

/// Accumulates [`ColorImage`] frames in CPU memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuAccumulator;

impl AccumulationBackend for CpuAccumulator {
    type Source = ColorImage;
    type Target = ColorImage;
    type Output = ColorImage;

    fn source_size(&self, source: &ColorImage) -> (u32, u32) {
        (source.width, source.height)
    }

    fn target_size(&self, target: &ColorImage) -> (u32, u32) {
        (target.width, target.height)
    }

    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<ColorImage, VistaError> {
        if width == 0 || height == 0 {
            return Err(VistaError::TargetCreation {
                width,
                height,
                reason: "zero-sized target".into(),
            });
        }
        Ok(ColorImage::new(width, height))
    }

    fn blend(
        &mut self,
        target: &mut ColorImage,
        source: &ColorImage,
        blend: f32,
        power: f32,
    ) {
        for (dst, src) in target.pixels.iter_mut().zip(&source.pixels) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = raise(*s, power) * blend + *d * (1.0 - blend);
            }
        }
    }

    fn resolve(
        &mut self,
        input: Resolve<'_, ColorImage, ColorImage>,
        power: f32,
        output: &mut ColorImage,
    ) {
        let input = match input {
            Resolve::Source(image) | Resolve::Accumulated(image) => image,
        };
        output.reshape(input.width, input.height);
        for (dst, src) in output.pixels.iter_mut().zip(&input.pixels) {
            *dst = src.map(|c| raise(c, power));
        }
    }
}

#[cfg(test)]
/// CPU backend whose allocations fail while `refuse` is set.
pub(crate) struct FlakyBackend {
    pub(crate) refuse: bool,
    pub(crate) attempts: usize,
}

#[cfg(test)]
impl FlakyBackend {
    pub(crate) fn refusing() -> Self {
        Self {
            refuse: true,
            attempts: 0,
        }
    }
}

#[cfg(test)]
impl AccumulationBackend for FlakyBackend {
    type Source = ColorImage;
    type Target = ColorImage;
    type Output = ColorImage;

    fn source_size(&self, source: &ColorImage) -> (u32, u32) {
        CpuAccumulator.source_size(source)
    }

    fn target_size(&self, target: &ColorImage) -> (u32, u32) {
        CpuAccumulator.target_size(target)
    }

    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<ColorImage, VistaError> {
        self.attempts += 1;
        if self.refuse {
            return Err(VistaError::TargetCreation {
                width,
                height,
                reason: "out of memory".into(),
            });
        }
        CpuAccumulator.create_target(width, height)
    }

    fn blend(
        &mut self,
        target: &mut ColorImage,
        source: &ColorImage,
        blend: f32,
        power: f32,
    ) {
        CpuAccumulator.blend(target, source, blend, power);
    }

    fn resolve(
        &mut self,
        input: Resolve<'_, ColorImage, ColorImage>,
        power: f32,
        output: &mut ColorImage,
    ) {
        CpuAccumulator.resolve(input, power, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reshapes_output() {
        let mut backend = CpuAccumulator;
        let input = ColorImage::filled(3, 2, [0.25; 4]);
        let mut out = ColorImage::new(1, 1);
        backend.resolve(Resolve::Source(&input), 0.5, &mut out);
        assert_eq!((out.width(), out.height()), (3, 2));
        assert!((out.pixel(2, 1)[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn blend_mixes_by_constant() {
        let mut backend = CpuAccumulator;
        let mut target = ColorImage::filled(1, 1, [1.0; 4]);
        let source = ColorImage::filled(1, 1, [0.0; 4]);
        backend.blend(&mut target, &source, 0.25, 1.0);
        assert!((target.pixel(0, 0)[0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut image = ColorImage::new(2, 2);
        image.set_pixel(5, 0, [1.0; 4]);
        assert_eq!(image.pixel(5, 0), [0.0; 4]);
        image.set_pixel(1, 1, [1.0; 4]);
        assert_eq!(image.pixels()[3], [1.0; 4]);
    }

    #[test]
    fn zero_sized_target_is_an_error() {
        let mut backend = CpuAccumulator;
        assert!(matches!(
            backend.create_target(0, 4),
            Err(VistaError::TargetCreation { width: 0, height: 4, .. })
        ));
    }
}
