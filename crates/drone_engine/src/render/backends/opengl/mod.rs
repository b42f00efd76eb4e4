//! OpenGL 3.3 core backend
//!
//! Implements the render seam with `glow`. Meshes live in vertex array
//! objects keyed by slotmap handles; the shader utility compiles the drone's
//! GLSL sources at startup.

mod backend;
pub mod shader;

pub use backend::OpenGlBackend;
pub use shader::{create_shader_program, try_create_shader_program};
