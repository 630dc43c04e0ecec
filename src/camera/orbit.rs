//! Orbit camera: yaw/pitch/distance around a pivot with clamped targets and
//! inertial smoothing.
//!
//! Every setter writes a *target*; [`OrbitCamera::tick`] moves the current
//! values toward their targets and rebuilds the camera transform. The pivot
//! is not smoothed.

use glam::{UVec2, Vec2, Vec3};

use super::core::Camera;
use super::orientation;
use crate::scene::{frame_subtree, Aabb, SceneTree};

const DISTANCE_EPSILON: f32 = 0.001;
const ANGLE_EPSILON: f32 = 0.01;
const PIVOT_EPSILON: f32 = 0.001;

/// Distance and pitch limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampLimits {
    /// Closest allowed orbit distance.
    pub distance_min: f32,
    /// Farthest allowed orbit distance; `0` means unbounded.
    pub distance_max: f32,
    /// Lowest camera elevation in degrees.
    pub pitch_angle_min: f32,
    /// Highest camera elevation in degrees.
    pub pitch_angle_max: f32,
}

impl Default for ClampLimits {
    fn default() -> Self {
        Self {
            distance_min: 0.0,
            distance_max: 0.0,
            pitch_angle_min: -90.0,
            pitch_angle_max: 90.0,
        }
    }
}

impl ClampLimits {
    /// Clamp an orbit distance. The minimum wins if the limits cross.
    #[must_use]
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        if self.distance_max > 0.0 {
            distance.min(self.distance_max).max(self.distance_min)
        } else {
            distance.max(self.distance_min)
        }
    }

    /// Clamp a pitch angle. The range is negated because the camera looks
    /// back at the pivot: elevating the camera tilts the view down.
    #[must_use]
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.min(-self.pitch_angle_min).max(-self.pitch_angle_max)
    }
}

/// Current and target orbit parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Current yaw in degrees.
    pub yaw: f32,
    /// Current pitch in degrees.
    pub pitch: f32,
    /// Current distance from the pivot.
    pub distance: f32,
    /// Yaw being approached.
    pub target_yaw: f32,
    /// Pitch being approached.
    pub target_pitch: f32,
    /// Distance being approached.
    pub target_distance: f32,
    /// World-space point the camera orbits and looks at.
    pub pivot: Vec3,
}

/// A complete orbit placement, used for presets and resets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Distance from the pivot.
    pub distance: f32,
    /// Orbit pivot.
    pub pivot: Vec3,
}

/// Camera controller orbiting a pivot point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    state: OrbitState,
    last_frame_pivot: Vec3,
    limits: ClampLimits,
    inertia_factor: f32,
    camera: Camera,
}

impl OrbitCamera {
    /// Create a controller seeded from the camera's placement, orbiting the
    /// world origin.
    #[must_use]
    pub fn new(camera: Camera, limits: ClampLimits, inertia_factor: f32) -> Self {
        let eye = camera.eye;
        let mut orbit = Self {
            state: OrbitState {
                yaw: 0.0,
                pitch: 0.0,
                distance: 0.0,
                target_yaw: 0.0,
                target_pitch: 0.0,
                target_distance: 0.0,
                pivot: Vec3::ZERO,
            },
            last_frame_pivot: Vec3::ZERO,
            limits,
            inertia_factor: inertia_factor.max(0.0),
            camera,
        };
        orbit.seed(eye, Vec3::ZERO);
        orbit
    }

    /// Seed the orbit from the current camera placement looking at the
    /// subtree's bounds centre, then either frame the subtree or keep the
    /// camera's distance to that centre.
    pub fn initialize<T: SceneTree + ?Sized>(
        &mut self,
        tree: &T,
        root: T::Node,
        frame_on_start: bool,
    ) {
        let aabb = frame_subtree(tree, root);
        self.seed(self.camera.eye, aabb.center());
        if frame_on_start {
            self.focus_bounds(&aabb);
        }
    }

    /// Derive yaw/pitch/distance from an eye looking at `pivot`, with no
    /// inertia.
    fn seed(&mut self, eye: Vec3, pivot: Vec3) {
        let rotation = orientation::look_rotation(eye, pivot);
        let yaw = orientation::yaw_of(rotation);
        let pitch = self.limits.clamp_pitch(orientation::pitch_of(rotation, yaw));
        let distance = self.limits.clamp_distance(eye.distance(pivot));
        self.state = OrbitState {
            yaw,
            pitch,
            distance,
            target_yaw: yaw,
            target_pitch: pitch,
            target_distance: distance,
            pivot,
        };
        self.last_frame_pivot = pivot;
        self.update_transform();
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Orbit state (current and target values).
    #[must_use]
    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    /// The camera positioned by the last transform update.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current clamp limits.
    #[must_use]
    pub fn limits(&self) -> ClampLimits {
        self.limits
    }

    /// Smoothing time constant in seconds (0 = instant).
    #[must_use]
    pub fn inertia_factor(&self) -> f32 {
        self.inertia_factor
    }

    /// Orbit pivot.
    #[must_use]
    pub fn pivot(&self) -> Vec3 {
        self.state.pivot
    }

    /// The placement the camera is heading toward.
    #[must_use]
    pub fn target_viewpoint(&self) -> Viewpoint {
        Viewpoint {
            yaw: self.state.target_yaw,
            pitch: self.state.target_pitch,
            distance: self.state.target_distance,
            pivot: self.state.pivot,
        }
    }

    // ── Targets ──────────────────────────────────────────────────────────

    /// Set the target distance, clamped to the distance limits.
    pub fn set_distance(&mut self, distance: f32) {
        self.state.target_distance = self.limits.clamp_distance(distance);
    }

    /// Set the target pitch, clamped to the pitch limits.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.state.target_pitch = self.limits.clamp_pitch(pitch);
    }

    /// Set the target yaw. The stored target is the equivalent angle
    /// reached from the current yaw by the shorter turn.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.state.target_yaw =
            self.state.yaw + orientation::shortest_yaw_delta(self.state.yaw, yaw);
    }

    /// Move the pivot directly (not smoothed).
    pub fn set_pivot(&mut self, pivot: Vec3) {
        self.state.pivot = pivot;
    }

    /// Replace the clamp limits. An axis whose limits changed re-clamps its
    /// current value and snaps its target to it; the other axis keeps
    /// animating.
    pub fn set_limits(&mut self, limits: ClampLimits) {
        let previous = self.limits;
        self.limits = limits;
        let mut changed = false;
        if (limits.distance_min, limits.distance_max)
            != (previous.distance_min, previous.distance_max)
        {
            self.state.distance = limits.clamp_distance(self.state.distance);
            self.state.target_distance = self.state.distance;
            changed = true;
        }
        if (limits.pitch_angle_min, limits.pitch_angle_max)
            != (previous.pitch_angle_min, previous.pitch_angle_max)
        {
            self.state.pitch = limits.clamp_pitch(self.state.pitch);
            self.state.target_pitch = self.state.pitch;
            changed = true;
        }
        if changed {
            self.update_transform();
        }
    }

    /// Set the smoothing time constant (negative values are treated as 0).
    pub fn set_inertia_factor(&mut self, inertia_factor: f32) {
        self.inertia_factor = inertia_factor.max(0.0);
    }

    /// Set the projection field of view (degrees) and clip planes.
    pub fn set_projection(&mut self, fov: f32, znear: f32, zfar: f32) {
        self.camera.fov = fov;
        self.camera.znear = znear;
        self.camera.zfar = zfar;
    }

    /// Update aspect ratio and FOV axis for a new viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.fit_viewport(width, height);
    }

    /// Set the sub-pixel projection jitter for the next render.
    pub fn set_jitter(&mut self, jitter: Vec2) {
        self.camera.jitter = jitter;
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Translate the pivot so the world point under `from` ends up under
    /// `to`. Both points are unprojected at the target orbit distance, so
    /// the same screen drag covers more world space when zoomed out.
    pub fn pan(&mut self, from: Vec2, to: Vec2, viewport: UVec2) {
        let distance = self.state.target_distance;
        let from_world = self.camera.screen_to_world(from, viewport, distance);
        let to_world = self.camera.screen_to_world(to, viewport, distance);
        self.state.pivot += from_world - to_world;
    }

    /// Frame every renderable mesh under `root`.
    pub fn focus<T: SceneTree + ?Sized>(&mut self, tree: &T, root: T::Node) {
        let aabb = frame_subtree(tree, root);
        self.focus_bounds(&aabb);
    }

    /// Frame a bounding volume: the distance fits its largest half extent
    /// in the field of view, the pivot moves to its centre, and the camera
    /// snaps there without inertia.
    pub fn focus_bounds(&mut self, aabb: &Aabb) {
        let extent = aabb.half_extents().max_element();
        let distance = extent / (0.5 * self.camera.fov.to_radians()).tan() * 2.0;
        self.set_distance(distance);
        self.remove_inertia();
        self.state.pivot = aabb.center();
        log::debug!(
            "focus: pivot {:?}, distance {}",
            self.state.pivot,
            self.state.distance
        );
        self.update_transform();
    }

    /// Cut to a placement: targets go through the clamping setters and the
    /// current values snap to them.
    pub fn reset_to(&mut self, yaw: f32, pitch: f32, distance: f32, pivot: Vec3) {
        self.set_pitch(pitch);
        self.set_yaw(yaw);
        self.set_distance(distance);
        self.remove_inertia();
        self.state.pivot = pivot;
        self.update_transform();
    }

    /// [`reset_to`](Self::reset_to) a saved viewpoint.
    pub fn reset_to_viewpoint(&mut self, viewpoint: &Viewpoint) {
        self.reset_to(
            viewpoint.yaw,
            viewpoint.pitch,
            viewpoint.distance,
            viewpoint.pivot,
        );
    }

    /// Cut to a camera at `eye` looking at `target`, which becomes the
    /// pivot.
    pub fn look_from(&mut self, eye: Vec3, target: Vec3) {
        self.state.pivot = target;
        self.set_distance(eye.distance(target));
        let rotation = orientation::look_rotation(eye, target);
        self.set_yaw(orientation::yaw_of(rotation));
        self.set_pitch(orientation::pitch_of(rotation, self.state.target_yaw));
        self.remove_inertia();
        self.update_transform();
    }

    /// Cut to a camera at `eye` looking at the bounds centre of a subtree.
    pub fn look_from_subtree<T: SceneTree + ?Sized>(
        &mut self,
        eye: Vec3,
        tree: &T,
        root: T::Node,
    ) {
        let center = frame_subtree(tree, root).center();
        self.look_from(eye, center);
    }

    /// Snap current values to their targets.
    pub fn remove_inertia(&mut self) {
        self.state.yaw = self.state.target_yaw;
        self.state.pitch = self.state.target_pitch;
        self.state.distance = self.state.target_distance;
    }

    /// Advance smoothing by `dt` seconds and rebuild the camera transform.
    ///
    /// Returns whether the camera was still moving at the start of this
    /// tick (targets not yet reached, or the pivot moved since the last
    /// tick).
    pub fn tick(&mut self, dt: f32) -> bool {
        let s = &mut self.state;
        let moved = (s.target_distance - s.distance).abs() > DISTANCE_EPSILON
            || (s.target_yaw - s.yaw).abs() > ANGLE_EPSILON
            || (s.target_pitch - s.pitch).abs() > ANGLE_EPSILON
            || s.pivot.distance(self.last_frame_pivot) > PIVOT_EPSILON;

        let t = if self.inertia_factor == 0.0 {
            1.0
        } else {
            (dt / self.inertia_factor).min(1.0)
        };
        s.distance += (s.target_distance - s.distance) * t;
        s.yaw += (s.target_yaw - s.yaw) * t;
        s.pitch += (s.target_pitch - s.pitch) * t;
        self.last_frame_pivot = s.pivot;

        self.update_transform();
        moved
    }

    /// Place the camera from the current yaw, pitch, distance and pivot.
    fn update_transform(&mut self) {
        let rotation = orientation::orbit_rotation(self.state.yaw, self.state.pitch);
        self.camera.orientation = rotation;
        self.camera.eye = self.state.pivot
            - orientation::forward(rotation) * self.state.distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;

    const EPSILON: f32 = 1e-3;

    fn orbit(limits: ClampLimits, inertia: f32) -> OrbitCamera {
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, 10.0),
            aspect: 1.0,
            fov: 60.0,
            ..Camera::default()
        };
        OrbitCamera::new(camera, limits, inertia)
    }

    #[test]
    fn seeds_from_camera_placement() {
        let o = orbit(ClampLimits::default(), 0.0);
        let s = o.state();
        assert!(s.yaw.abs() < EPSILON);
        assert!(s.pitch.abs() < EPSILON);
        assert!((s.distance - 10.0).abs() < EPSILON);
        assert_eq!(s.target_distance, s.distance);
    }

    #[test]
    fn set_yaw_takes_the_short_way_round() {
        let mut o = orbit(ClampLimits::default(), 0.0);
        o.reset_to(170.0, 0.0, 10.0, Vec3::ZERO);
        assert!((o.state().yaw - 170.0).abs() < EPSILON);

        o.set_yaw(-170.0);
        assert!((o.state().target_yaw - 190.0).abs() < EPSILON);
    }

    #[test]
    fn repeated_yaw_targets_converge_to_equivalent_angle() {
        let mut o = orbit(ClampLimits::default(), 0.0);
        for target in [350.0_f32, -725.0, 181.0, 0.5] {
            o.set_yaw(target);
            let delta = o.state().target_yaw - o.state().yaw;
            assert!(delta > -180.0 && delta <= 180.0);
            let _ = o.tick(0.016);
            let diff = (o.state().yaw - target).rem_euclid(360.0);
            assert!(diff < EPSILON || 360.0 - diff < EPSILON);
        }
    }

    #[test]
    fn distance_and_pitch_are_clamped() {
        let limits = ClampLimits {
            distance_min: 2.0,
            distance_max: 20.0,
            pitch_angle_min: -10.0,
            pitch_angle_max: 60.0,
        };
        let mut o = orbit(limits, 0.0);
        o.set_distance(100.0);
        assert_eq!(o.state().target_distance, 20.0);
        o.set_distance(0.5);
        assert_eq!(o.state().target_distance, 2.0);
        o.set_pitch(-89.0);
        assert_eq!(o.state().target_pitch, -60.0);
        o.set_pitch(45.0);
        assert_eq!(o.state().target_pitch, 10.0);
    }

    #[test]
    fn clamping_is_idempotent() {
        let limits = ClampLimits {
            distance_min: 1.0,
            distance_max: 0.0,
            pitch_angle_min: -45.0,
            pitch_angle_max: 80.0,
        };
        for v in [-1000.0_f32, -3.0, 0.0, 0.5, 7.0, 1e6] {
            let d = limits.clamp_distance(v);
            assert_eq!(limits.clamp_distance(d), d);
            let p = limits.clamp_pitch(v);
            assert_eq!(limits.clamp_pitch(p), p);
        }
        // Zero max means unbounded above.
        assert_eq!(limits.clamp_distance(1e6), 1e6);
    }

    #[test]
    fn zero_inertia_snaps_in_one_tick() {
        let mut o = orbit(ClampLimits::default(), 0.0);
        o.set_distance(42.0);
        assert!(o.tick(0.016));
        assert_eq!(o.state().distance, 42.0);
        assert!(!o.tick(0.016));
    }

    #[test]
    fn inertia_lerps_by_dt_over_factor() {
        let mut o = orbit(ClampLimits::default(), 0.5);
        o.set_distance(20.0);
        let _ = o.tick(0.1);
        // 10 + (20 - 10) * 0.2
        assert!((o.state().distance - 12.0).abs() < EPSILON);
        let _ = o.tick(10.0);
        assert!((o.state().distance - 20.0).abs() < EPSILON);
    }

    #[test]
    fn pivot_change_reports_movement_once() {
        let mut o = orbit(ClampLimits::default(), 0.0);
        o.set_pivot(Vec3::new(1.0, 0.0, 0.0));
        assert!(o.tick(0.016));
        assert!(!o.tick(0.016));
    }

    #[test]
    fn focus_frames_unit_box_at_sixty_degrees() {
        let mut o = orbit(ClampLimits::default(), 0.5);
        let mut scene = SceneGraph::new();
        let node = scene.add_node(scene.root(), "box", Vec3::ZERO);
        scene.add_mesh(
            node,
            Aabb::from_center_half_extents(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE),
        );

        o.focus(&scene, scene.root());
        let expected = 1.0 / 30.0_f32.to_radians().tan() * 2.0;
        assert!((o.state().distance - expected).abs() < EPSILON);
        assert!((expected - 3.464).abs() < EPSILON);
        assert_eq!(o.state().distance, o.state().target_distance);
        assert_eq!(o.pivot(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn camera_sits_behind_pivot_along_forward() {
        let mut o = orbit(ClampLimits::default(), 0.0);
        o.reset_to(90.0, -30.0, 4.0, Vec3::new(1.0, 2.0, 3.0));
        let cam = o.camera();
        assert!((cam.eye.distance(o.pivot()) - 4.0).abs() < EPSILON);
        let to_pivot = (o.pivot() - cam.eye).normalize();
        assert!((to_pivot - cam.forward()).length() < EPSILON);
        // Negative pitch puts the camera above the pivot.
        assert!(cam.eye.y > o.pivot().y);
    }

    #[test]
    fn look_from_recovers_orbit_parameters() {
        let mut o = orbit(ClampLimits::default(), 0.3);
        let target = Vec3::new(1.0, 0.0, -2.0);
        let eye = target + Vec3::new(0.0, 5.0, 5.0);
        o.look_from(eye, target);
        let s = o.state();
        assert!((s.distance - 50.0_f32.sqrt()).abs() < EPSILON);
        assert!((s.pitch + 45.0).abs() < EPSILON, "pitch {}", s.pitch);
        assert!((o.camera().eye - eye).length() < EPSILON);
    }

    #[test]
    fn changed_limits_apply_without_animation() {
        let mut o = orbit(ClampLimits::default(), 1.0);
        o.set_limits(ClampLimits {
            distance_max: 5.0,
            ..ClampLimits::default()
        });
        assert_eq!(o.state().distance, 5.0);
        assert_eq!(o.state().target_distance, 5.0);
        assert!(!o.tick(0.016));
    }

    #[test]
    fn distance_limits_leave_pitch_animation_alone() {
        let mut o = orbit(ClampLimits::default(), 1.0);
        o.set_pitch(-45.0);
        let _ = o.tick(0.1);
        let pitch = o.state().pitch;
        o.set_limits(ClampLimits {
            distance_max: 50.0,
            ..ClampLimits::default()
        });
        assert_eq!(o.state().target_pitch, -45.0);
        assert_eq!(o.state().pitch, pitch);
        assert!(o.tick(0.1));

        o.set_distance(30.0);
        o.set_limits(ClampLimits {
            distance_max: 50.0,
            pitch_angle_max: 30.0,
            ..ClampLimits::default()
        });
        assert_eq!(o.state().target_distance, 30.0);
        assert!(o.state().target_pitch >= -30.0);
    }

    #[test]
    fn pan_moves_pivot_against_the_drag() {
        let mut o = orbit(ClampLimits::default(), 0.0);
        let viewport = UVec2::new(200, 200);
        o.pan(Vec2::new(100.0, 100.0), Vec2::new(150.0, 100.0), viewport);
        // Dragging right slides the scene right: the pivot moves left.
        assert!(o.pivot().x < 0.0);
        assert!(o.pivot().y.abs() < EPSILON);
    }

    #[test]
    fn pan_covers_more_world_when_zoomed_out() {
        let viewport = UVec2::new(200, 200);
        let drag = (Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0));

        let mut near = orbit(ClampLimits::default(), 0.0);
        near.pan(drag.0, drag.1, viewport);
        let mut far = orbit(ClampLimits::default(), 0.0);
        far.reset_to(0.0, 0.0, 40.0, Vec3::ZERO);
        far.pan(drag.0, drag.1, viewport);

        let ratio = far.pivot().length() / near.pivot().length();
        assert!((ratio - 4.0).abs() < 0.05, "ratio {ratio}");
    }
}
