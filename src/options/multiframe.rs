use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Supersampling", inline)]
#[serde(default)]
/// Multiframe accumulation parameters.
pub struct MultiframeOptions {
    /// Accumulate jittered frames while the camera is still.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Samples per axis; the kernel holds `sample_count²` samples.
    #[schemars(title = "Samples per Axis", range(min = 1, max = 8))]
    pub sample_count: u32,
    /// Randomize sample positions inside their grid cells.
    #[schemars(title = "Jitter")]
    pub jitter: bool,
    /// Kernel footprint in pixels.
    #[schemars(title = "Kernel Size", range(min = 0.5, max = 4.0), extend("step" = 0.25))]
    pub kernel_size: f32,
    /// Gaussian sigma; 0 selects a box filter.
    #[schemars(title = "Sigma", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub sigma: f32,
    /// Gamma of the rendered frames; blending happens in linear space.
    #[schemars(skip)]
    pub gamma: f32,
}

impl Default for MultiframeOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_count: 5,
            jitter: false,
            kernel_size: 2.0,
            sigma: 0.0,
            gamma: 2.2,
        }
    }
}
