//! Window management using GLFW
//!
//! Creates a window with an OpenGL 3.3 core context, makes it current, and
//! exposes the little the host loop needs: held-key queries, framebuffer
//! size changes, buffer swaps and the GL proc address lookup.

use std::ffi::c_void;

use glfw::Context;
use thiserror::Error;

use crate::core::config::WindowConfig;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// `glfwInit` failed
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The window or its context could not be created
    #[error("Window creation failed ({width}x{height})")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window with a current OpenGL context
pub struct WindowHandle {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl WindowHandle {
    /// Create the window described by `config` and make its context current
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{:?}", e)))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed {
                width: config.width,
                height: config.height,
            })?;

        window.make_current();
        window.set_key_polling(true);
        window.set_framebuffer_size_polling(true);
        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

        log::info!("Window created: {}x{} \"{}\"", config.width, config.height, config.title);

        Ok(Self { glfw, window, events })
    }

    /// Whether the user (or the host) asked the window to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Request the window to close at the end of the frame
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Whether `key` is currently held
    pub fn is_key_pressed(&self, key: glfw::Key) -> bool {
        matches!(self.window.get_key(key), glfw::Action::Press | glfw::Action::Repeat)
    }

    /// Current framebuffer size in pixels
    #[allow(clippy::cast_sign_loss)]
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// Poll events and return the latest framebuffer size if it changed
    #[allow(clippy::cast_sign_loss)]
    pub fn poll_events(&mut self) -> Option<(u32, u32)> {
        self.glfw.poll_events();

        let mut resized = None;
        for (_, event) in glfw::flush_messages(&self.events) {
            if let glfw::WindowEvent::FramebufferSize(width, height) = event {
                resized = Some((width.max(0) as u32, height.max(0) as u32));
            }
        }
        resized
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Look up an OpenGL entry point of this window's context
    pub fn get_proc_address(&mut self, name: &str) -> *const c_void {
        self.window.get_proc_address(name) as *const c_void
    }
}
