//! Scene rendering for the standalone viewer.
//!
//! Draws the world-space bounds of every mesh in a [`SceneGraph`] as shaded
//! boxes into an offscreen color target, which the multiframe accumulator
//! then resolves to the window.
//!
//! [`SceneGraph`]: crate::scene::SceneGraph

pub mod bounds;
pub(crate) mod pipeline_util;

pub use bounds::{box_mesh, BoundsRenderer, BoxVertex, SceneTargets};
