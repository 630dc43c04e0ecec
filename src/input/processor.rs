//! Converts raw platform events into camera gestures.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! held drag buttons, active touches) and the key-binding map. It is the
//! only thing that sits between raw window events and the engine's
//! [`apply_gesture`](crate::engine::ViewEngine::apply_gesture) method.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::InputEvent;
use super::gesture::Gesture;
use super::mouse::{MouseSensitivity, MouseTracker};
use super::touch::{TouchSensitivity, TouchTracker};
use crate::options::InputOptions;

/// Maps physical key strings to key-bound actions.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"Space"`, `"KeyF"`, `"Escape"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → action.
    bindings: HashMap<String, KeyAction>,
}

/// Discrete camera actions that can be bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Return to the viewpoint captured at start-up.
    ResetCamera,
}

impl KeyAction {
    fn to_gesture(self) -> Gesture {
        match self {
            Self::ResetCamera => Gesture::Reset,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([("Space".into(), KeyAction::ResetCamera)]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the action bound to a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding for the key.
    pub fn bind(&mut self, key: impl Into<String>, action: KeyAction) {
        let _ = self.bindings.insert(key.into(), action);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`Gesture`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// for gesture in input_processor.handle_event(event) {
///     engine.apply_gesture(gesture);
/// }
///
/// if let Some(gesture) = input_processor.handle_key_press("Space") {
///     engine.apply_gesture(gesture);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    mouse: MouseTracker,
    touch: TouchTracker,
    mouse_sensitivity: MouseSensitivity,
    touch_sensitivity: TouchSensitivity,
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a processor with default sensitivities and key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&InputOptions::default(), KeyBindings::default())
    }

    /// Create a processor from input options and key bindings.
    #[must_use]
    pub fn with_options(options: &InputOptions, key_bindings: KeyBindings) -> Self {
        let mut processor = Self {
            mouse: MouseTracker::new(),
            touch: TouchTracker::new(),
            mouse_sensitivity: MouseSensitivity {
                orbit: 0.0,
                distance: 0.0,
            },
            touch_sensitivity: TouchSensitivity {
                orbit: 0.0,
                distance: 0.0,
            },
            key_bindings,
        };
        processor.set_options(options);
        processor
    }

    /// Apply new sensitivities. Held buttons and touches are kept.
    pub fn set_options(&mut self, options: &InputOptions) {
        self.mouse_sensitivity = MouseSensitivity {
            orbit: options.mouse_orbit_sensitivity,
            distance: options.mouse_distance_sensitivity,
        };
        self.touch_sensitivity = TouchSensitivity {
            orbit: options.touch_orbit_sensitivity,
            distance: options.touch_distance_sensitivity,
        };
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse.position()
    }

    /// Whether a mouse drag (orbit or pan) is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.mouse.is_dragging()
    }

    /// Number of touches currently on the surface.
    #[must_use]
    pub fn active_touches(&self) -> usize {
        self.touch.active()
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Release held mouse buttons without producing a gesture.
    pub fn release_mouse_state(&mut self) {
        self.mouse.release_all();
    }

    /// Look up a key press and return the corresponding gesture, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<Gesture> {
        self.key_bindings.lookup(key).map(KeyAction::to_gesture)
    }

    /// Process a raw input event and return the gestures it produced.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Gesture> {
        match event {
            InputEvent::CursorMoved { x, y } => self
                .mouse
                .moved(Vec2::new(x, y), self.mouse_sensitivity)
                .into_iter()
                .collect(),
            InputEvent::MouseButton { button, pressed } => {
                self.mouse.button(button, pressed);
                Vec::new()
            }
            InputEvent::Scroll { delta } => {
                vec![self.mouse.wheel(delta, self.mouse_sensitivity)]
            }
            InputEvent::CursorLeft => {
                self.mouse.release_all();
                Vec::new()
            }
            InputEvent::Touch { id, phase, x, y } => {
                self.touch
                    .handle(id, phase, Vec2::new(x, y), self.touch_sensitivity)
            }
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}
