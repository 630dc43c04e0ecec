use glam::Vec2;

use super::event::MouseButton;
use super::gesture::Gesture;

/// Mouse sensitivities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MouseSensitivity {
    pub orbit: f32,
    pub distance: f32,
}

/// Tracks the cursor and which drag mode (orbit or pan) is held.
///
/// Left drags orbit; middle or right drags pan. The last cursor position is
/// updated on every move so the first drag step after a press is measured
/// from where the button went down.
#[derive(Debug, Clone, Default)]
pub(crate) struct MouseTracker {
    last_point: Vec2,
    look_down: bool,
    pan_down: bool,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec2 {
        self.last_point
    }

    pub fn is_dragging(&self) -> bool {
        self.look_down || self.pan_down
    }

    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.look_down = pressed,
            MouseButton::Middle | MouseButton::Right => self.pan_down = pressed,
        }
    }

    pub fn moved(&mut self, to: Vec2, sensitivity: MouseSensitivity) -> Option<Gesture> {
        let from = self.last_point;
        self.last_point = to;
        if self.look_down {
            Some(Gesture::orbit_from_drag(to - from, sensitivity.orbit))
        } else if self.pan_down {
            Some(Gesture::Pan { from, to })
        } else {
            None
        }
    }

    pub fn wheel(&self, delta: f32, sensitivity: MouseSensitivity) -> Gesture {
        Gesture::Zoom {
            amount: delta * sensitivity.distance,
        }
    }

    pub fn release_all(&mut self) {
        self.look_down = false;
        self.pan_down = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENS: MouseSensitivity = MouseSensitivity {
        orbit: 0.3,
        distance: 0.15,
    };

    #[test]
    fn hover_produces_nothing() {
        let mut m = MouseTracker::new();
        assert_eq!(m.moved(Vec2::new(5.0, 5.0), SENS), None);
        assert_eq!(m.position(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn left_drag_orbits_from_press_point() {
        let mut m = MouseTracker::new();
        let _ = m.moved(Vec2::new(10.0, 10.0), SENS);
        m.button(MouseButton::Left, true);
        match m.moved(Vec2::new(20.0, 10.0), SENS) {
            Some(Gesture::Orbit { yaw, pitch }) => {
                assert!((yaw + 3.0).abs() < 1e-5);
                assert!(pitch.abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn right_and_middle_pan() {
        for button in [MouseButton::Right, MouseButton::Middle] {
            let mut m = MouseTracker::new();
            m.button(button, true);
            let g = m.moved(Vec2::new(3.0, 4.0), SENS);
            assert_eq!(
                g,
                Some(Gesture::Pan {
                    from: Vec2::ZERO,
                    to: Vec2::new(3.0, 4.0)
                })
            );
        }
    }

    #[test]
    fn leaving_releases_buttons() {
        let mut m = MouseTracker::new();
        m.button(MouseButton::Left, true);
        m.button(MouseButton::Right, true);
        assert!(m.is_dragging());
        m.release_all();
        assert!(!m.is_dragging());
        assert_eq!(m.moved(Vec2::ONE, SENS), None);
    }
}
