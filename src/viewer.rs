//! Standalone visualization window backed by winit.
//!
//! Renders a [`SceneGraph`] as shaded boxes, drives the orbit camera from
//! mouse, wheel, touch and keyboard input, and accumulates still frames
//! with multiframe supersampling. The window only redraws while the
//! [`ViewEngine`] has a render scheduled.
//!
//! ```no_run
//! # use vista::Viewer;
//! Viewer::builder()
//!     .with_title("Boxes")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    camera::Camera,
    engine::{FrameClock, ViewEngine},
    error::VistaError,
    gpu::render_context::RenderContext,
    input::InputEvent,
    multiframe::GpuAccumulator,
    options::Options,
    renderer::{BoundsRenderer, SceneTargets},
    scene::{Aabb, SceneGraph},
};

/// Where the camera starts before the scene is framed.
const START_EYE: Vec3 = Vec3::new(6.0, 4.0, 10.0);

/// A small scene of boxes around the origin.
#[must_use]
pub fn demo_scene() -> SceneGraph {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let ground = scene.add_node(root, "ground", Vec3::new(0.0, -0.6, 0.0));
    scene.add_mesh(
        ground,
        Aabb::from_center_half_extents(
            Vec3::new(0.0, -0.6, 0.0),
            Vec3::new(4.0, 0.1, 4.0),
        ),
    );
    let cluster = scene.add_node(root, "cluster", Vec3::ZERO);
    for (i, (x, z, h)) in [
        (-2.0, -2.0, 1.5),
        (0.0, -1.5, 0.8),
        (2.0, -2.0, 2.2),
        (-1.5, 1.5, 0.6),
        (1.5, 1.0, 1.1),
    ]
    .into_iter()
    .enumerate()
    {
        let center = Vec3::new(x, h * 0.5 - 0.5, z);
        let node = scene.add_node(cluster, format!("box{i}"), center);
        scene.add_mesh(
            node,
            Aabb::from_center_half_extents(center, Vec3::new(0.5, h * 0.5, 0.5)),
        );
    }
    scene
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    scene: Option<SceneGraph>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            scene: None,
            options: None,
            title: "Vista".into(),
        }
    }

    /// Scene to display. Defaults to [`demo_scene`].
    #[must_use]
    pub fn with_scene(mut self, scene: SceneGraph) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            scene: self.scene.unwrap_or_else(demo_scene),
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays a scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    scene: SceneGraph,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), VistaError> {
        let event_loop =
            EventLoop::new().map_err(|e| VistaError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            gpu: None,
            clock: FrameClock::new(),
            scene: self.scene,
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| VistaError::Viewer(e.to_string()))
    }
}

// ── GPU state ────────────────────────────────────────────────────────────

/// Everything that lives as long as the window surface.
struct ViewerGpu {
    context: RenderContext,
    engine: ViewEngine<GpuAccumulator>,
    renderer: BoundsRenderer,
    targets: SceneTargets,
}

impl ViewerGpu {
    fn new(
        window: Arc<Window>,
        size: (u32, u32),
        options: &Options,
        scene: &SceneGraph,
    ) -> Result<Self, VistaError> {
        let context = pollster::block_on(RenderContext::new(window, size))?;
        let backend = GpuAccumulator::new(&context, context.format());

        let camera = Camera {
            eye: START_EYE,
            ..Camera::default()
        };
        let mut engine =
            ViewEngine::new(options.clone(), camera, size, Some(backend));
        engine.initialize(scene, scene.root());

        let mut renderer = BoundsRenderer::new(&context, options.render.clear_color);
        renderer.upload(&context.device, scene);
        let targets = SceneTargets::new(&context.device, size)?;

        Ok(Self {
            context,
            engine,
            renderer,
            targets,
        })
    }

    fn resize(&mut self, (width, height): (u32, u32)) {
        if self.context.resize(width, height) {
            match SceneTargets::new(&self.context.device, (width, height)) {
                Ok(targets) => self.targets = targets,
                Err(e) => log::error!("failed to resize scene targets: {e}"),
            }
        }
        self.engine.resize(width, height);
    }

    fn redraw(&mut self, dt: f32) -> Result<(), wgpu::SurfaceError> {
        let _ = self.engine.tick(dt);
        if self.engine.begin_frame() {
            let uniform = self.engine.prepare_render();
            self.renderer
                .render(&self.context, &self.targets, &uniform);

            let frame = self.context.get_next_frame()?;
            let mut view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            if let Err(e) = self.engine.post_render(&self.targets.color, &mut view) {
                log::error!("multiframe: {e}");
                self.engine.release();
            }
            frame.present();
        }
        self.engine.frame_end();
        Ok(())
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<ViewerGpu>,
    clock: FrameClock,
    scene: SceneGraph,
    options: Options,
    title: String,
}

/// Surface size for a window: never zero.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    /// Ask for a redraw if the engine has a render scheduled.
    fn schedule_redraw(&self) {
        if let (Some(window), Some(gpu)) = (&self.window, &self.gpu) {
            if gpu.engine.scheduler().should_render() {
                window.request_redraw();
            }
        }
    }

    fn input(&mut self, event: InputEvent) {
        if let Some(gpu) = &mut self.gpu {
            gpu.engine.handle_event(event);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        match ViewerGpu::new(window.clone(), size, &self.options, &self.scene) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                event_loop.exit();
                return;
            }
        }

        self.clock = FrameClock::new();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(gpu) = &mut self.gpu {
                gpu.engine.release();
            }
            event_loop.exit();
            return;
        }

        let Some(window) = self.window.clone() else {
            return;
        };
        if self.gpu.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(viewport_size(size));
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(viewport_size(window.inner_size()));
                }
            }

            WindowEvent::RedrawRequested => {
                let dt = self.clock.tick();
                if let Some(gpu) = &mut self.gpu {
                    match gpu.redraw(dt) {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => {
                            gpu.resize(viewport_size(window.inner_size()));
                        }
                        Err(e) => {
                            log::error!("render error: {e:?}");
                            gpu.engine.request_render();
                        }
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.input(InputEvent::MouseButton {
                    button: button.into(),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::CursorLeft { .. } => self.input(InputEvent::CursorLeft),

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.input(InputEvent::Scroll { delta });
            }

            WindowEvent::Touch(touch) => {
                self.input(InputEvent::Touch {
                    id: touch.id,
                    phase: touch.phase.into(),
                    x: touch.location.x as f32,
                    y: touch.location.y as f32,
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key = format!("{code:?}");
                if let Some(gpu) = &mut self.gpu {
                    if !gpu.engine.handle_key_press(&key) {
                        log::trace!("unbound key {key}");
                    }
                }
            }

            _ => return,
        }

        self.schedule_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::frame_subtree;

    #[test]
    fn demo_scene_is_framed_around_origin() {
        let scene = demo_scene();
        assert_eq!(scene.meshes().count(), 6);
        let bounds = frame_subtree(&scene, scene.root());
        assert!(bounds.contains(Vec3::ZERO));
        let cluster = scene.find("cluster").unwrap();
        let inner = frame_subtree(&scene, cluster);
        assert!(inner.half_extents().x < bounds.half_extents().x);
    }
}
