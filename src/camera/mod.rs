//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera with sub-pixel jitter support and an orbit
//! controller with clamped, inertially smoothed yaw/pitch/distance.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Orbit controller: targets, clamping, smoothing, pan and focus.
pub mod orbit;
/// Yaw/pitch angle conventions and decomposition helpers.
pub mod orientation;

pub use self::core::{Camera, CameraUniform, FovAxis};
pub use self::orbit::{ClampLimits, OrbitCamera, OrbitState, Viewpoint};
