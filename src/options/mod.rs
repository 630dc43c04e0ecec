//! Centralized viewer options with TOML preset support.
//!
//! Camera, input, render scheduling, supersampling and key bindings are
//! consolidated here. Options serialize to/from TOML so view presets can be
//! stored as files and loaded at start-up.

mod camera;
mod input;
mod multiframe;
mod render;

use std::path::Path;

pub use camera::CameraOptions;
pub use input::InputOptions;
pub use multiframe::MultiframeOptions;
pub use render::RenderOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VistaError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Camera projection and orbit parameters.
    pub camera: CameraOptions,
    /// Pointer and touch sensitivities.
    pub input: InputOptions,
    /// Frame scheduling.
    pub render: RenderOptions,
    /// Multiframe supersampling.
    pub multiframe: MultiframeOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::Io`] if the file cannot be read and
    /// [`VistaError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, VistaError> {
        let content = std::fs::read_to_string(path).map_err(VistaError::Io)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::OptionsParse`] if serialization fails and
    /// [`VistaError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), VistaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VistaError::Io)?;
        }
        std::fs::write(path, content).map_err(VistaError::Io)
    }

    /// Copy of these options with one field replaced, addressed the way the
    /// JSON schema names it: `section` is a top-level key such as
    /// `"camera"`, `field` a key inside it.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::OptionsParse`] if the section does not exist or
    /// the value does not fit the field's type.
    pub fn with_field(
        &self,
        section: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<Self, VistaError> {
        let mut root = serde_json::to_value(self)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        let Some(entries) = root.get_mut(section).and_then(|s| s.as_object_mut())
        else {
            return Err(VistaError::OptionsParse(format!(
                "unknown options section '{section}'"
            )));
        };
        if !entries.contains_key(field) {
            return Err(VistaError::OptionsParse(format!(
                "unknown field '{section}.{field}'"
            )));
        }
        let _ = entries.insert(field.to_owned(), value);
        log::debug!("options: set {section}.{field}");
        serde_json::from_value(root).map_err(|e| VistaError::OptionsParse(e.to_string()))
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Gesture, InputProcessor, KeyAction};

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
inertia_factor = 0.25
distance_max = 50.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera.inertia_factor, 0.25);
        assert_eq!(opts.camera.limits().distance_max, 50.0);
        // Everything else should be default
        assert_eq!(opts.camera.pitch_angle_min, -90.0);
        assert_eq!(opts.input.mouse_orbit_sensitivity, 0.3);
        assert_eq!(opts.input.touch_distance_sensitivity, 0.2);
        assert_eq!(opts.multiframe.sample_count, 5);
        assert!(opts.render.auto_render);
    }

    #[test]
    fn keybindings_load_from_toml() {
        let toml_str = r#"
[keybindings.bindings]
KeyH = "reset_camera"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyH"),
            Some(KeyAction::ResetCamera)
        );
        let processor =
            InputProcessor::with_options(&opts.input, opts.keybindings.clone());
        assert_eq!(processor.handle_key_press("KeyH"), Some(Gesture::Reset));
    }

    #[test]
    fn save_then_load_preserves_options() {
        let dir = std::env::temp_dir().join(format!("vista-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.multiframe.jitter = true;
        opts.camera.fov = 60.0;
        opts.save(&dir.join("sharp.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::load(&dir.join("sharp.toml")).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), vec!["sharp".to_owned()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Options::load(Path::new("/nonexistent/vista.toml")).unwrap_err();
        assert!(matches!(err, VistaError::Io(_)));
    }

    #[test]
    fn single_field_update() {
        let opts = Options::default()
            .with_field("camera", "inertia_factor", serde_json::json!(0.4))
            .unwrap();
        assert_eq!(opts.camera.inertia_factor, 0.4);
        assert_eq!(opts.input, InputOptions::default());

        let bad_type = Options::default().with_field(
            "multiframe",
            "sample_count",
            serde_json::json!("many"),
        );
        assert!(matches!(bad_type, Err(VistaError::OptionsParse(_))));
        assert!(Options::default()
            .with_field("lighting", "x", serde_json::json!(1))
            .is_err());
        assert!(Options::default()
            .with_field("camera", "roll", serde_json::json!(1))
            .is_err());
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("input"));
        assert!(props.contains_key("render"));
        assert!(props.contains_key("multiframe"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fov").is_some());
        assert!(camera.get("inertia_factor").is_some());
        assert!(camera.get("znear").is_none());
        assert!(props["multiframe"]["properties"].get("gamma").is_none());
    }
}
