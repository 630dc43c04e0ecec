use glam::Vec2;

/// Fraction of the current distance one unit of zoom moves the camera.
pub const ZOOM_STEP: f32 = 0.1;

/// A camera manipulation recognized from raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Orbit around the pivot. Deltas are added to the target angles.
    Orbit {
        /// Yaw change in degrees.
        yaw: f32,
        /// Pitch change in degrees.
        pitch: f32,
    },
    /// Drag the pivot so the world point under `from` follows to `to`.
    Pan {
        /// Previous pointer position in physical pixels.
        from: Vec2,
        /// Current pointer position in physical pixels.
        to: Vec2,
    },
    /// Move toward (positive) or away from (negative) the pivot by
    /// `amount * ZOOM_STEP` of the target distance.
    Zoom {
        /// Sensitivity-scaled zoom amount.
        amount: f32,
    },
    /// Return to the starting viewpoint.
    Reset,
}

impl Gesture {
    /// Orbit gesture for a pointer drag of `delta` pixels.
    ///
    /// Dragging right turns the view left and dragging down tilts it up, so
    /// the scene appears to follow the pointer.
    #[must_use]
    pub fn orbit_from_drag(delta: Vec2, sensitivity: f32) -> Self {
        Self::Orbit {
            yaw: -delta.x * sensitivity,
            pitch: -delta.y * sensitivity,
        }
    }

    /// Distance change this gesture applies at the given target distance.
    #[must_use]
    pub fn zoom_delta(amount: f32, distance: f32) -> f32 {
        -amount * distance * ZOOM_STEP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_maps_to_negated_scaled_angles() {
        let g = Gesture::orbit_from_drag(Vec2::new(10.0, -4.0), 0.3);
        match g {
            Gesture::Orbit { yaw, pitch } => {
                assert!((yaw + 3.0).abs() < 1e-6);
                assert!((pitch - 1.2).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zoom_is_proportional_to_distance() {
        assert!((Gesture::zoom_delta(0.15, 10.0) + 0.15).abs() < 1e-6);
        assert!((Gesture::zoom_delta(-0.15, 100.0) - 1.5).abs() < 1e-5);
    }
}
