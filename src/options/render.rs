use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Render", inline)]
#[serde(default)]
/// Frame scheduling and presentation.
pub struct RenderOptions {
    /// Render every frame. When off, frames are only rendered on request
    /// (camera motion, accumulation, resize).
    #[schemars(title = "Continuous Rendering")]
    pub auto_render: bool,
    /// Background color (linear RGBA).
    #[schemars(skip)]
    pub clear_color: [f32; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            auto_render: true,
            clear_color: [0.12, 0.12, 0.14, 1.0],
        }
    }
}
