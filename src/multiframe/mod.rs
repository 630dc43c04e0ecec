//! Multiframe supersampling.
//!
//! While the camera is still, successive frames are rendered with sub-pixel
//! projection jitter and averaged into a float accumulation target, so a
//! static view converges to an anti-aliased image over a few frames. Any
//! camera movement restarts accumulation and frames pass straight through.

/// Accumulation state machine and backend trait.
pub mod accumulator;
/// wgpu accumulation backend.
pub mod gpu;
/// CPU accumulation backend.
pub mod image;
/// Sample kernel generation.
pub mod kernel;

pub use accumulator::{
    AccumulationBackend, AccumulationBuffer, JitterParams, MultiframeAccumulator,
    Resolve, MAX_SAMPLES_PER_AXIS,
};
pub use gpu::GpuAccumulator;
pub use image::{ColorImage, CpuAccumulator};
pub use kernel::{Sample, SampleKernel};
