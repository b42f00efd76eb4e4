//! Host loop
//!
//! Owns the window, the GL backend, the shader program and one drone. Each
//! frame: time, input, controller, camera, clear, view/projection, draw, swap.

use drone_engine::config::ConfigError;
use drone_engine::core::config::ApplicationConfig;
use drone_engine::drone::{DroneController, DroneModel, DroneView, RollUpdate};
use drone_engine::foundation::time::Timer;
use drone_engine::render::backends::OpenGlBackend;
use drone_engine::render::{
    uniforms, CameraRig, GeometryProvider, GeometrySettings, GraphicsBackend, RenderError, ShaderHandle,
    WindowError, WindowHandle,
};
use thiserror::Error;

use crate::input::{apply_input, KeySnapshot};

const VERTEX_SHADER: &str = include_str!("../../resources/shaders/drone.vert");
const FRAGMENT_SHADER: &str = include_str!("../../resources/shaders/drone.frag");

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or was invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Window or context creation failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// GPU resources could not be created
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

#[allow(clippy::cast_precision_loss)]
fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Interactive drone viewer
///
/// Field order matters: the backend (and the GL objects it owns) must be
/// dropped while the window's context is still alive.
pub struct DroneApp {
    backend: OpenGlBackend,
    window: WindowHandle,
    config: ApplicationConfig,
    geometry: GeometryProvider,
    shader: ShaderHandle,
    model: DroneModel,
    controller: DroneController,
    view: DroneView,
    camera: CameraRig,
    timer: Timer,
}

impl DroneApp {
    /// Create the window, load GL, compile the shader and upload geometry
    pub fn new(config: ApplicationConfig) -> Result<Self, AppError> {
        log::info!("Creating drone viewer...");
        let mut window = WindowHandle::new(&config.window)?;

        let mut backend = OpenGlBackend::new(|name| window.get_proc_address(name));
        backend.enable_depth_test();

        let (width, height) = window.framebuffer_size();
        backend.set_viewport(width, height);

        let shader = backend.create_shader_program(VERTEX_SHADER, FRAGMENT_SHADER);

        let drone = &config.drone;
        let mut geometry = GeometryProvider::new(GeometrySettings {
            bevel: drone.bevel,
            sphere_stacks: drone.sphere_stacks,
            sphere_slices: drone.sphere_slices,
        });
        geometry.initialize(&mut backend)?;

        let settings = drone.controller_settings();
        let model = DroneModel::from_defaults(&settings.home);
        let controller = DroneController::new(settings);
        let view = DroneView::new(drone.layout, drone.body_shape);
        let camera = CameraRig::new(config.camera.clone(), aspect_ratio(width, height));

        log::info!("Drone viewer ready: {:?} layout, {:?} camera", view.layout(), camera.mode());

        Ok(Self {
            backend,
            window,
            config,
            geometry,
            shader,
            model,
            controller,
            view,
            camera,
            timer: Timer::new(),
        })
    }

    /// Run until the window closes, then release GPU resources
    pub fn run(&mut self) {
        while !self.window.should_close() {
            self.frame();
        }

        log::info!(
            "Window closed after {} frames ({:.1} fps average)",
            self.timer.frame_count(),
            self.timer.average_fps()
        );
        self.shutdown();
    }

    fn frame(&mut self) {
        let dt = self.timer.update();

        let keys = KeySnapshot::capture(&self.window);
        let outcome = apply_input(&keys, &self.config.controls, &mut self.controller, &mut self.model, dt);
        if outcome.quit {
            self.window.set_should_close(true);
        }
        if let Some(mode) = outcome.camera {
            self.camera.set_mode(mode);
        }

        if self.controller.update(&mut self.model, dt) == RollUpdate::Completed {
            log::debug!("Roll finished at frame {}", self.timer.frame_count());
        }
        self.camera.update(dt);

        self.backend.clear(self.config.window.clear_color);
        self.backend.use_shader(self.shader);
        let view_matrix = self.camera.view_matrix(&self.model);
        let projection = self.camera.projection_matrix();
        self.backend.set_uniform_mat4(self.shader, uniforms::VIEW, &view_matrix);
        self.backend.set_uniform_mat4(self.shader, uniforms::PROJECTION, &projection);

        self.view.render(&mut self.backend, &self.geometry, &self.model, self.shader);

        self.window.swap_buffers();
        if let Some((width, height)) = self.window.poll_events() {
            self.backend.set_viewport(width, height);
            self.camera.set_aspect_ratio(aspect_ratio(width, height));
        }
    }

    fn shutdown(&mut self) {
        self.geometry.release(&mut self.backend);
        self.backend.delete_shader_program(self.shader);
        self.shader = ShaderHandle::INVALID;
    }
}
