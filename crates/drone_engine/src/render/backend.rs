//! Backend abstraction traits for the rendering system
//!
//! The geometry provider and drone renderer only talk to the GPU through
//! [`GraphicsBackend`]. The OpenGL implementation lives in
//! `backends::opengl`; tests use `backends::recording`.

use crate::foundation::math::Mat4;
use crate::render::mesh::ShapeMesh;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

slotmap::new_key_type! {
    /// Handle to a mesh resource stored in the backend
    pub struct MeshHandle;
}

/// Handle to a linked shader program
///
/// `ShaderHandle::INVALID` (0) is never a real program. Uniform writes against it
/// are silently dropped, the same way the driver ignores uniform location -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderHandle(pub u32);

impl ShaderHandle {
    /// The "no program" handle
    pub const INVALID: Self = Self(0);

    /// Whether this handle can refer to a program at all
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Primitive assembly mode for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Independent triangles, three vertices each
    Triangles,
    /// One connected strip
    TriangleStrip,
}

/// Rendering errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// No graphics context is current on this thread
    #[error("No current graphics context: {0}")]
    ContextUnavailable(String),

    /// A GPU object could not be created
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),

    /// Shader compilation or linking failed
    #[error("Shader error: {0}")]
    Shader(String),
}

/// Main rendering backend trait
///
/// Mirrors the handful of calls the drone needs: upload a mesh once, select a
/// program, write the `model` / `objectColor` uniforms, and draw.
pub trait GraphicsBackend {
    /// Upload a mesh to GPU-resident buffers and return an opaque handle
    fn upload_mesh(&mut self, mesh: &ShapeMesh) -> BackendResult<MeshHandle>;

    /// Free the buffers behind a handle; unknown handles are ignored
    fn release_mesh(&mut self, handle: MeshHandle);

    /// Make a program current
    fn use_shader(&mut self, shader: ShaderHandle);

    /// Write a 4x4 matrix uniform; missing uniforms are a no-op
    fn set_uniform_mat4(&mut self, shader: ShaderHandle, name: &str, value: &Mat4);

    /// Write a 3-component uniform; missing uniforms are a no-op
    fn set_uniform_vec3(&mut self, shader: ShaderHandle, name: &str, value: [f32; 3]);

    /// Issue one draw of `count` vertices (or indices when `indexed`)
    ///
    /// Leaves the mesh's vertex array bound state undefined afterwards.
    fn draw_mesh(&mut self, handle: MeshHandle, topology: Topology, count: u32, indexed: bool);
}
