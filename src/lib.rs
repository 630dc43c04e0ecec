// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (clippy default thresholds)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Orbit-camera scene viewer with multiframe supersampling, built on wgpu.
//!
//! Vista frames a scene hierarchy with an inertial orbit camera, turns mouse,
//! wheel, touch and keyboard input into camera gestures, and, while the view
//! is still, accumulates sub-pixel jittered frames into an anti-aliased
//! image. Rendering happens on demand: frames are only drawn when the camera
//! moved, the viewport changed, or accumulation still has samples left.
//!
//! # Key entry points
//!
//! - [`engine::ViewEngine`] - per-frame coordinator the host loop drives
//! - [`camera::OrbitCamera`] - yaw/pitch/distance orbit with clamping and
//!   inertia
//! - [`multiframe::MultiframeAccumulator`] - jittered accumulation over a
//!   pluggable [`multiframe::AccumulationBackend`]
//! - [`input::InputProcessor`] - raw events to [`input::Gesture`]s
//! - [`options::Options`] - runtime configuration (camera, input, render,
//!   multiframe, key bindings)
//! - [`scene::SceneTree`] - the hierarchy contract the camera frames
//!
//! # Frame flow
//!
//! Input gestures update the orbit targets. Each frame the engine ticks the
//! camera toward its targets; any movement restarts accumulation and
//! schedules a render. A render applies the next kernel sample's jitter to
//! the projection, draws the scene into an offscreen target, blends it into
//! the accumulation target and presents the running average.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod multiframe;
pub mod options;
pub mod renderer;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use camera::{Camera, OrbitCamera, Viewpoint};
pub use engine::ViewEngine;
pub use error::VistaError;
pub use input::{Gesture, InputEvent, InputProcessor};
pub use multiframe::{CpuAccumulator, GpuAccumulator, MultiframeAccumulator};
pub use options::Options;
pub use scene::{SceneGraph, SceneTree};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
