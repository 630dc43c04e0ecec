//! Input handling: event types, mouse and touch trackers, and the input
//! processor that converts raw window events into camera gestures.

/// Platform-agnostic input events.
pub mod event;
/// Camera gestures produced from input.
pub mod gesture;
/// Mouse drag and wheel tracking.
pub(crate) mod mouse;
/// Converts raw events into gestures.
pub mod processor;
/// Multi-touch orbit, pinch and pan tracking.
pub(crate) mod touch;

pub use event::{InputEvent, MouseButton, TouchPhase};
pub use gesture::Gesture;
pub use processor::{InputProcessor, KeyAction, KeyBindings};
