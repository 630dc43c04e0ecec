use glam::Vec2;

use super::event::TouchPhase;
use super::gesture::Gesture;

/// Touch sensitivities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TouchSensitivity {
    pub orbit: f32,
    pub distance: f32,
}

/// Pinch distance is in pixels; scale it down to wheel-notch magnitude.
const PINCH_SCALE: f32 = 0.1;

/// Tracks active touch points.
///
/// One finger orbits. Two fingers pinch to zoom and drag their midpoint to
/// pan. Whenever the set of touches changes the reference points are
/// re-armed so the next move is measured from the new configuration.
#[derive(Debug, Clone, Default)]
pub(crate) struct TouchTracker {
    /// Active touches in the order they started.
    touches: Vec<(u64, Vec2)>,
    last_touch_point: Vec2,
    last_pinch_mid_point: Vec2,
    last_pinch_distance: f32,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> usize {
        self.touches.len()
    }

    pub fn handle(
        &mut self,
        id: u64,
        phase: TouchPhase,
        point: Vec2,
        sensitivity: TouchSensitivity,
    ) -> Vec<Gesture> {
        match phase {
            TouchPhase::Started => {
                self.touches.retain(|(t, _)| *t != id);
                self.touches.push((id, point));
                self.rearm();
                Vec::new()
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|(t, _)| *t != id);
                self.rearm();
                Vec::new()
            }
            TouchPhase::Moved => {
                let Some(entry) = self.touches.iter_mut().find(|(t, _)| *t == id)
                else {
                    return Vec::new();
                };
                entry.1 = point;
                self.moved(sensitivity)
            }
        }
    }

    fn rearm(&mut self) {
        match self.touches.as_slice() {
            [(_, a)] => self.last_touch_point = *a,
            [(_, a), (_, b), ..] => {
                self.last_pinch_distance = a.distance(*b);
                self.last_pinch_mid_point = (*a + *b) * 0.5;
            }
            [] => {}
        }
    }

    fn moved(&mut self, sensitivity: TouchSensitivity) -> Vec<Gesture> {
        match self.touches.as_slice() {
            [(_, a)] => {
                let delta = *a - self.last_touch_point;
                self.last_touch_point = *a;
                vec![Gesture::orbit_from_drag(delta, sensitivity.orbit)]
            }
            [(_, a), (_, b), ..] => {
                let distance = a.distance(*b);
                let diff = distance - self.last_pinch_distance;
                self.last_pinch_distance = distance;

                let mid = (*a + *b) * 0.5;
                let from = self.last_pinch_mid_point;
                self.last_pinch_mid_point = mid;

                vec![
                    Gesture::Zoom {
                        amount: diff * sensitivity.distance * PINCH_SCALE,
                    },
                    Gesture::Pan { from, to: mid },
                ]
            }
            [] => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENS: TouchSensitivity = TouchSensitivity {
        orbit: 0.4,
        distance: 0.2,
    };

    #[test]
    fn single_finger_orbits() {
        let mut t = TouchTracker::new();
        let _ = t.handle(1, TouchPhase::Started, Vec2::new(10.0, 10.0), SENS);
        let g = t.handle(1, TouchPhase::Moved, Vec2::new(10.0, 20.0), SENS);
        match g.as_slice() {
            [Gesture::Orbit { yaw, pitch }] => {
                assert!(yaw.abs() < 1e-6);
                assert!((pitch + 4.0).abs() < 1e-5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pinch_zooms_and_pans_midpoint() {
        let mut t = TouchTracker::new();
        let _ = t.handle(1, TouchPhase::Started, Vec2::new(0.0, 0.0), SENS);
        let _ = t.handle(2, TouchPhase::Started, Vec2::new(100.0, 0.0), SENS);
        assert_eq!(t.active(), 2);

        let g = t.handle(2, TouchPhase::Moved, Vec2::new(150.0, 0.0), SENS);
        match g.as_slice() {
            [Gesture::Zoom { amount }, Gesture::Pan { from, to }] => {
                // 50px spread * 0.2 * 0.1
                assert!((amount - 1.0).abs() < 1e-5);
                assert_eq!(*from, Vec2::new(50.0, 0.0));
                assert_eq!(*to, Vec2::new(75.0, 0.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn lifting_a_finger_rearms_single_touch() {
        let mut t = TouchTracker::new();
        let _ = t.handle(1, TouchPhase::Started, Vec2::ZERO, SENS);
        let _ = t.handle(2, TouchPhase::Started, Vec2::new(100.0, 0.0), SENS);
        let _ = t.handle(1, TouchPhase::Ended, Vec2::ZERO, SENS);
        assert_eq!(t.active(), 1);

        // Measured from the remaining finger, not the lifted one.
        let g = t.handle(2, TouchPhase::Moved, Vec2::new(100.0, 0.0), SENS);
        match g.as_slice() {
            [Gesture::Orbit { yaw, pitch }] => {
                assert!(yaw.abs() < 1e-6 && pitch.abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_touch_is_ignored() {
        let mut t = TouchTracker::new();
        assert!(t.handle(9, TouchPhase::Moved, Vec2::ONE, SENS).is_empty());
    }
}
