use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::ClampLimits;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and orbit parameters.
pub struct CameraOptions {
    /// Field of view in degrees (vertical, or horizontal on portrait
    /// viewports).
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fov: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Closest allowed orbit distance.
    #[schemars(title = "Min Distance", range(min = 0.0), extend("step" = 0.1))]
    pub distance_min: f32,
    /// Farthest allowed orbit distance (0 = unbounded).
    #[schemars(title = "Max Distance", range(min = 0.0), extend("step" = 1.0))]
    pub distance_max: f32,
    /// Lowest camera elevation in degrees.
    #[schemars(title = "Min Pitch", range(min = -90.0, max = 90.0), extend("step" = 1.0))]
    pub pitch_angle_min: f32,
    /// Highest camera elevation in degrees.
    #[schemars(title = "Max Pitch", range(min = -90.0, max = 90.0), extend("step" = 1.0))]
    pub pitch_angle_max: f32,
    /// Smoothing time constant in seconds (0 = no smoothing).
    #[schemars(title = "Inertia", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub inertia_factor: f32,
    /// Frame the whole scene when the viewer starts.
    #[schemars(skip)]
    pub frame_on_start: bool,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov: 45.0,
            znear: 0.1,
            zfar: 1000.0,
            distance_min: 0.0,
            distance_max: 0.0,
            pitch_angle_min: -90.0,
            pitch_angle_max: 90.0,
            inertia_factor: 0.0,
            frame_on_start: true,
        }
    }
}

impl CameraOptions {
    /// Orbit clamp limits.
    #[must_use]
    pub fn limits(&self) -> ClampLimits {
        ClampLimits {
            distance_min: self.distance_min,
            distance_max: self.distance_max,
            pitch_angle_min: self.pitch_angle_min,
            pitch_angle_max: self.pitch_angle_max,
        }
    }
}
