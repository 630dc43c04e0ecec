//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, render-target textures, and
//! the fullscreen-pass helpers shared by the multiframe resolve pipelines.

/// Shared wgpu boilerplate helpers for screen-space pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Framework-agnostic render-target texture abstraction.
pub mod texture;
