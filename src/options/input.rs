use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Input", inline)]
#[serde(default)]
/// Pointer and touch sensitivities.
pub struct InputOptions {
    /// Degrees of orbit per pixel of mouse drag.
    #[schemars(title = "Mouse Orbit Speed", range(min = 0.05, max = 2.0), extend("step" = 0.05))]
    pub mouse_orbit_sensitivity: f32,
    /// Zoom amount per wheel notch.
    #[schemars(title = "Mouse Zoom Speed", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub mouse_distance_sensitivity: f32,
    /// Degrees of orbit per pixel of touch drag.
    #[schemars(title = "Touch Orbit Speed", range(min = 0.05, max = 2.0), extend("step" = 0.05))]
    pub touch_orbit_sensitivity: f32,
    /// Zoom amount per pixel of pinch.
    #[schemars(title = "Touch Zoom Speed", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub touch_distance_sensitivity: f32,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            mouse_orbit_sensitivity: 0.3,
            mouse_distance_sensitivity: 0.15,
            touch_orbit_sensitivity: 0.4,
            touch_distance_sensitivity: 0.2,
        }
    }
}
