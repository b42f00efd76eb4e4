//! Backend implementations for the render module
//!
//! `opengl` drives a real context through `glow`; `recording` captures calls
//! for tests and headless runs.

/// OpenGL 3.3 core backend
#[allow(unsafe_code)]
pub mod opengl;

/// In-memory backend that records every call
pub mod recording;

pub use opengl::OpenGlBackend;
pub use recording::{RecordedCommand, RecordingBackend, ResolvedDraw};
