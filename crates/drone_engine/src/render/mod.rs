//! # Rendering System
//!
//! Everything between the drone's pose and the GPU.
//!
//! ## Architecture
//!
//! - **Backend seam**: [`GraphicsBackend`] is the only way the core reaches the GPU
//! - **Meshes**: CPU-side shape data ([`ShapeMesh`]) for the cube, beveled cube and sphere
//! - **Geometry Provider**: uploads each shape once and draws it by reference
//! - **Camera**: view/projection matrices and the three-vantage [`CameraRig`]
//! - **Backends**: `opengl` (glow) for the viewer, `recording` for tests
//! - **Window**: GLFW window with an OpenGL 3.3 core context

pub mod backend;
pub mod mesh;
pub mod geometry;
pub mod camera;

/// Graphics backend implementations
pub mod backends;

pub mod window;

pub use backend::{BackendResult, GraphicsBackend, MeshHandle, RenderError, ShaderHandle, Topology};
pub use camera::{Camera, CameraMode, CameraRig};
pub use geometry::{GeometryProvider, GeometrySettings};
pub use mesh::{Shape, ShapeMesh};
pub use window::{WindowError, WindowHandle};

/// Uniform names of the drone shader program
pub mod uniforms {
    /// Per-part model matrix (vertex stage)
    pub const MODEL: &str = "model";
    /// Camera view matrix (vertex stage)
    pub const VIEW: &str = "view";
    /// Projection matrix (vertex stage)
    pub const PROJECTION: &str = "projection";
    /// Flat part colour (fragment stage)
    pub const OBJECT_COLOR: &str = "objectColor";
}
