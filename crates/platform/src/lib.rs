//! Platform layer: windowing, event loop and orbit input.
//!
//! - Loads every configured model once the window exists.
//! - Left-drag orbits the camera, mouse wheel zooms, Escape quits.
//! - Redraws continuously; the light circles its rest position.

use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::Result;
use asset::Aabb;
use corelib::{
    Mat4, Vec3,
    camera::{OrbitCamera, ROTATE_SENSITIVITY, ZOOM_SPEED},
    light::PointLight,
    scene::{Renderable, Scene},
    transform::Transform,
};
use renderer::GpuState;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

/// Pixels of trackpad scroll per wheel "line".
const PIXELS_PER_LINE: f32 = 40.0;

/// One model placed in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSpec {
    pub path: PathBuf,
    pub position: Vec3,
    pub angle_y: f32,
    pub scale: Vec3,
    pub color: Vec3,
}

impl ModelSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            position: Vec3::ZERO,
            angle_y: 0.0,
            scale: Vec3::ONE,
            color: Vec3::new(0.8, 0.8, 0.8),
        }
    }

    fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Everything the viewer needs to start.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub models: Vec<ModelSpec>,
    pub light: PointLight,
}

/// Open the viewer window and run until it is closed.
pub fn run(config: RunConfig) -> Result<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| anyhow::anyhow!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Pointer state for orbit dragging.
#[derive(Default)]
struct DragState {
    active: bool,
    last: Option<PhysicalPosition<f64>>,
}

impl DragState {
    /// Returns the cursor delta while dragging.
    fn moved_to(&mut self, pos: PhysicalPosition<f64>) -> Option<(f32, f32)> {
        let prev = self.last.replace(pos)?;
        self.active
            .then(|| ((pos.x - prev.x) as f32, (pos.y - prev.y) as f32))
    }
}

struct FpsCounter {
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            log::info!("FPS: {:.1}", self.frames as f32 / elapsed);
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

struct ViewerApp {
    config: RunConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Scene,
    camera: OrbitCamera,
    drag: DragState,
    fps: Option<FpsCounter>,
    start: Instant,
    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(config: RunConfig) -> Self {
        let fps = config.show_fps.then(|| FpsCounter {
            frames: 0,
            since: Instant::now(),
        });
        Self {
            config,
            window: None,
            gpu: None,
            scene: Scene::new(),
            camera: OrbitCamera::default(),
            drag: DragState::default(),
            fps,
            start: Instant::now(),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Mesh Viewer")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let mut gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends))?;

        let mut placed = Vec::new();
        for spec in &self.config.models {
            let mesh = asset::obj::load_obj_or_empty(&spec.path);
            let name = spec.name();
            let handle = gpu.upload_mesh(&name, &mesh)?;
            let transform = Transform::trs(spec.position, spec.angle_y, spec.scale);
            if let Some(bounds) = mesh.bounds() {
                placed.push((transform.matrix(), bounds));
            }
            self.scene.spawn(
                name,
                transform,
                Some(Renderable {
                    mesh: handle,
                    color: spec.color,
                }),
            );
        }
        if let Some((center, radius)) = bounding_sphere(&placed) {
            self.camera.frame(center, radius);
        }
        log::info!(
            "Scene ready: {} object(s), camera distance {:.2}",
            self.scene.len(),
            self.camera.distance
        );

        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let light = self
            .config
            .light
            .orbiting(self.start.elapsed().as_secs_f32());

        match gpu.render(&self.scene, &self.camera, &light) {
            Ok(()) => {
                if let Some(fps) = self.fps.as_mut() {
                    fps.tick();
                }
            }
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost/outdated; reconfiguring");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout; skipping frame"),
            Err(err) => {
                log::error!("Render error: {err}; exiting");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.drag.active = state == ElementState::Pressed,
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((dx, dy)) = self.drag.moved_to(position) {
                    self.camera.rotate(dx, dy, ROTATE_SENSITIVITY);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.camera.zoom(steps, ZOOM_SPEED);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

/// Sphere around the world-space boxes of all placed meshes.
fn bounding_sphere(placed: &[(Mat4, Aabb)]) -> Option<(Vec3, f32)> {
    let mut corners = placed.iter().flat_map(|(model, b)| {
        (0..8).map(move |i| {
            let pick = |bit: usize, axis: usize| {
                if i & bit == 0 { b.min[axis] } else { b.max[axis] }
            };
            model.transform_point3(Vec3::new(pick(1, 0), pick(2, 1), pick(4, 2)))
        })
    });
    let first = corners.next()?;
    let (min, max) = corners.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some((0.5 * (min + max), 0.5 * (max - min).length()))
}
