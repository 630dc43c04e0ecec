//! Frame coordination: camera, input, supersampling and render scheduling.
//!
//! [`ViewEngine`] is driven by the host loop once per frame:
//!
//! ```ignore
//! for gesture in engine.input_mut().handle_event(event) {
//!     engine.apply_gesture(gesture);
//! }
//! let _ = engine.tick(dt);
//! if engine.begin_frame() {
//!     let uniform = engine.prepare_render();
//!     // render the scene with `uniform` into `scene_target`
//!     engine.post_render(&scene_target, &mut surface_view)?;
//! }
//! engine.frame_end();
//! ```

/// Frame delta timing.
pub mod frame_clock;
/// Render-on-demand scheduling.
pub mod scheduler;

use glam::{UVec2, Vec3};

pub use self::frame_clock::FrameClock;
pub use self::scheduler::RenderScheduler;
use crate::camera::{Camera, CameraUniform, OrbitCamera, Viewpoint};
use crate::error::VistaError;
use crate::input::{Gesture, InputEvent, InputProcessor};
use crate::multiframe::{AccumulationBackend, JitterParams, MultiframeAccumulator};
use crate::options::Options;
use crate::scene::SceneTree;

/// Owns the orbit camera, the input processor, the optional multiframe
/// accumulator and the render scheduler, and wires them together.
pub struct ViewEngine<B: AccumulationBackend> {
    orbit: OrbitCamera,
    input: InputProcessor,
    multiframe: Option<MultiframeAccumulator<B>>,
    multiframe_busy: bool,
    scheduler: RenderScheduler,
    home: Viewpoint,
    viewport: UVec2,
    options: Options,
}

impl<B: AccumulationBackend> ViewEngine<B> {
    /// Create an engine for a camera placed in the world. `backend` enables
    /// multiframe supersampling when given.
    pub fn new(
        options: Options,
        camera: Camera,
        (width, height): (u32, u32),
        backend: Option<B>,
    ) -> Self {
        let mut orbit = OrbitCamera::new(
            camera,
            options.camera.limits(),
            options.camera.inertia_factor,
        );
        orbit.set_projection(options.camera.fov, options.camera.znear, options.camera.zfar);
        orbit.set_viewport(width, height);

        let input =
            InputProcessor::with_options(&options.input, options.keybindings.clone());
        let multiframe =
            backend.map(|backend| MultiframeAccumulator::new(backend, &options.multiframe));

        Self {
            home: orbit.target_viewpoint(),
            orbit,
            input,
            multiframe,
            multiframe_busy: false,
            scheduler: RenderScheduler::new(options.render.auto_render),
            viewport: UVec2::new(width, height),
            options,
        }
    }

    /// Seed the orbit from the scene under `root` (framing it when
    /// `frame_on_start` is set) and remember the result as the reset
    /// viewpoint.
    pub fn initialize<T: SceneTree + ?Sized>(&mut self, tree: &T, root: T::Node) {
        self.orbit
            .initialize(tree, root, self.options.camera.frame_on_start);
        self.home = self.orbit.target_viewpoint();
        log::info!(
            "camera initialized: yaw {:.1}, pitch {:.1}, distance {:.3}",
            self.home.yaw,
            self.home.pitch,
            self.home.distance
        );
        self.invalidate();
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// The orbit controller.
    #[must_use]
    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    /// The camera as placed by the last tick.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        self.orbit.camera()
    }

    /// Input processor.
    #[must_use]
    pub fn input(&self) -> &InputProcessor {
        &self.input
    }

    /// Mutable input processor (key rebinding, manual release).
    pub fn input_mut(&mut self) -> &mut InputProcessor {
        &mut self.input
    }

    /// The multiframe accumulator, if supersampling is available.
    #[must_use]
    pub fn multiframe(&self) -> Option<&MultiframeAccumulator<B>> {
        self.multiframe.as_ref()
    }

    /// Mutable multiframe accumulator.
    pub fn multiframe_mut(&mut self) -> Option<&mut MultiframeAccumulator<B>> {
        self.multiframe.as_mut()
    }

    /// Render scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// The viewpoint a reset returns to.
    #[must_use]
    pub fn home(&self) -> Viewpoint {
        self.home
    }

    /// Replace the viewpoint a reset returns to.
    pub fn set_home(&mut self, home: Viewpoint) {
        self.home = home;
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Feed a raw input event through the processor and apply the
    /// resulting gestures.
    pub fn handle_event(&mut self, event: InputEvent) {
        for gesture in self.input.handle_event(event) {
            self.apply_gesture(gesture);
        }
    }

    /// Apply the gesture bound to `key`, if any. Returns whether one was.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        let Some(gesture) = self.input.handle_key_press(key) else {
            return false;
        };
        self.apply_gesture(gesture);
        true
    }

    /// Apply a camera gesture. Orbit and zoom adjust the targets relative
    /// to their current targets so successive events accumulate. Every
    /// gesture schedules a frame so the next tick sees the new targets.
    pub fn apply_gesture(&mut self, gesture: Gesture) {
        self.scheduler.request_render();
        let state = *self.orbit.state();
        match gesture {
            Gesture::Orbit { yaw, pitch } => {
                self.orbit.set_pitch(state.target_pitch + pitch);
                self.orbit.set_yaw(state.target_yaw + yaw);
            }
            Gesture::Pan { from, to } => self.orbit.pan(from, to, self.viewport),
            Gesture::Zoom { amount } => self.orbit.set_distance(
                state.target_distance + Gesture::zoom_delta(amount, state.target_distance),
            ),
            Gesture::Reset => {
                let home = self.home;
                self.orbit.reset_to_viewpoint(&home);
                self.invalidate();
            }
        }
    }

    // ── Camera cuts ──────────────────────────────────────────────────────

    /// Frame everything under `root`.
    pub fn focus<T: SceneTree + ?Sized>(&mut self, tree: &T, root: T::Node) {
        self.orbit.focus(tree, root);
        self.invalidate();
    }

    /// Switch the focus subtree: frame it when `frame_on_start` is set,
    /// otherwise keep the camera where it is and look at its centre.
    pub fn set_focus_subtree<T: SceneTree + ?Sized>(&mut self, tree: &T, root: T::Node) {
        if self.options.camera.frame_on_start {
            self.orbit.focus(tree, root);
        } else {
            let eye = self.orbit.camera().eye;
            self.orbit.look_from_subtree(eye, tree, root);
        }
        self.invalidate();
    }

    /// Cut to a camera at `eye` looking at `target`.
    pub fn look_from(&mut self, eye: Vec3, target: Vec3) {
        self.orbit.look_from(eye, target);
        self.invalidate();
    }

    /// Cut to a camera at `eye` looking at the centre of a subtree.
    pub fn look_from_subtree<T: SceneTree + ?Sized>(
        &mut self,
        eye: Vec3,
        tree: &T,
        root: T::Node,
    ) {
        self.orbit.look_from_subtree(eye, tree, root);
        self.invalidate();
    }

    /// Cut to a viewpoint without animation.
    pub fn reset_to(&mut self, viewpoint: &Viewpoint) {
        self.orbit.reset_to_viewpoint(viewpoint);
        self.invalidate();
    }

    /// Schedule a render without restarting accumulation.
    pub fn request_render(&mut self) {
        self.scheduler.request_render();
    }

    /// The image is stale: restart accumulation and schedule a render.
    fn invalidate(&mut self) {
        if let Some(multiframe) = &mut self.multiframe {
            multiframe.moved();
        }
        self.scheduler.request_render();
    }

    // ── Frame ────────────────────────────────────────────────────────────

    /// Advance camera smoothing. Returns whether the camera moved, in which
    /// case accumulation restarts and a render is scheduled.
    pub fn tick(&mut self, dt: f32) -> bool {
        let moved = self.orbit.tick(dt);
        if moved {
            self.invalidate();
        }
        moved
    }

    /// Whether this frame should render; consumes the pending request.
    pub fn begin_frame(&mut self) -> bool {
        self.scheduler.begin_frame()
    }

    /// Jitter for the upcoming render.
    #[must_use]
    pub fn jitter(&self) -> JitterParams {
        self.multiframe
            .as_ref()
            .map_or_else(JitterParams::default, MultiframeAccumulator::jitter)
    }

    /// Apply the current sample's jitter to the camera and build the
    /// uniform to render with.
    pub fn prepare_render(&mut self) -> CameraUniform {
        let jitter = self.jitter();
        self.orbit.set_jitter(jitter.offset);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(self.orbit.camera(), jitter.texture_bias);
        uniform
    }

    /// Accumulate the frame just rendered into `source` and present it to
    /// `output`. Without a multiframe backend this does nothing; the host
    /// renders straight to its output.
    ///
    /// # Errors
    ///
    /// Propagates [`VistaError::TargetCreation`] from the accumulator.
    pub fn post_render(
        &mut self,
        source: &B::Source,
        output: &mut B::Output,
    ) -> Result<(), VistaError> {
        self.multiframe_busy = match &mut self.multiframe {
            Some(multiframe) => multiframe.update(source, output)?,
            None => false,
        };
        Ok(())
    }

    /// Finish the frame and schedule follow-up renders.
    pub fn frame_end(&mut self) {
        self.scheduler.frame_end(self.multiframe_busy);
    }

    /// Resolve the accumulated image into `output`. Returns `false` when
    /// nothing has been accumulated.
    pub fn capture(&mut self, output: &mut B::Output) -> bool {
        self.multiframe
            .as_mut()
            .is_some_and(|multiframe| multiframe.copy_to(output))
    }

    /// Drop GPU-side accumulation state (device loss, teardown).
    pub fn release(&mut self) {
        if let Some(multiframe) = &mut self.multiframe {
            multiframe.release();
        }
        self.multiframe_busy = false;
    }

    // ── Configuration ────────────────────────────────────────────────────

    /// Handle a viewport resize. Zero sizes (minimized windows) are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {width}x{height}");
            return;
        }
        self.viewport = UVec2::new(width, height);
        self.orbit.set_viewport(width, height);
        log::debug!(
            "viewport {width}x{height}, fov axis {:?}",
            self.orbit.camera().fov_axis
        );
        self.invalidate();
    }

    /// Switch continuous rendering on or off.
    pub fn set_auto_render(&mut self, auto_render: bool) {
        self.options.render.auto_render = auto_render;
        self.scheduler.set_auto_render(auto_render);
    }

    /// Apply new options. Limits re-clamp immediately; the kernel is only
    /// regenerated when supersampling settings changed.
    pub fn set_options(&mut self, options: Options) {
        let camera = &options.camera;
        self.orbit.set_limits(camera.limits());
        self.orbit.set_inertia_factor(camera.inertia_factor);
        self.orbit.set_projection(camera.fov, camera.znear, camera.zfar);
        self.input.set_options(&options.input);
        *self.input.key_bindings_mut() = options.keybindings.clone();

        if options.multiframe != self.options.multiframe {
            if let Some(multiframe) = &mut self.multiframe {
                multiframe.configure(&options.multiframe);
            }
        }
        if options.render.auto_render != self.scheduler.auto_render() {
            self.scheduler.set_auto_render(options.render.auto_render);
        }

        self.options = options;
        self.invalidate();
    }
}
