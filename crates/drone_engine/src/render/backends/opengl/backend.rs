//! OpenGL implementation of [`GraphicsBackend`]

use std::ffi::c_void;

use glow::HasContext;
use slotmap::SlotMap;

use super::shader;
use crate::foundation::math::Mat4;
use crate::render::backend::{BackendResult, GraphicsBackend, MeshHandle, RenderError, ShaderHandle, Topology};
use crate::render::mesh::ShapeMesh;

/// Vertex array plus its buffers
#[derive(Debug)]
struct GlMesh {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
    ebo: Option<glow::NativeBuffer>,
}

/// Attribute slot of the vertex position (`layout(location = 0) in vec3 aPos`)
const POSITION_ATTRIBUTE: u32 = 0;

/// `glow`-backed renderer for an OpenGL 3.3 core context
///
/// Owns the loaded function table. All calls must happen on the thread whose
/// context was current when the backend was created.
pub struct OpenGlBackend {
    gl: glow::Context,
    meshes: SlotMap<MeshHandle, GlMesh>,
}

impl OpenGlBackend {
    /// Load GL entry points through `loader` (typically the window's proc address lookup)
    ///
    /// The context the loader belongs to must be current on this thread.
    pub fn new<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        // SAFETY: the loader resolves symbols of the context current on this thread
        let gl = unsafe { glow::Context::from_loader_function(loader) };

        // SAFETY: plain state query on the freshly loaded context
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        log::info!("OpenGL context loaded: {}", version);

        Self {
            gl,
            meshes: SlotMap::with_key(),
        }
    }

    /// Enable depth testing; the drone's parts overlap
    pub fn enable_depth_test(&mut self) {
        // SAFETY: state change on the owned context
        unsafe { self.gl.enable(glow::DEPTH_TEST) };
    }

    /// Resize the viewport to the framebuffer
    #[allow(clippy::cast_possible_wrap)]
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        log::debug!("Viewport resized to {}x{}", width, height);
        // SAFETY: state change on the owned context
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
    }

    /// Clear colour and depth
    pub fn clear(&mut self, color: [f32; 3]) {
        // SAFETY: state change and clear on the owned context
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    /// Compile and link a program; failures are logged and yield [`ShaderHandle::INVALID`]
    pub fn create_shader_program(&mut self, vertex_src: &str, fragment_src: &str) -> ShaderHandle {
        shader::create_shader_program(&self.gl, vertex_src, fragment_src)
    }

    /// Delete a program created by `create_shader_program`
    pub fn delete_shader_program(&mut self, shader: ShaderHandle) {
        if let Some(program) = shader::native_program(shader) {
            // SAFETY: the program was created on this context
            unsafe { self.gl.delete_program(program) };
            log::debug!("Shader program {} deleted", shader.0);
        }
    }

    fn uniform_location(&self, shader: ShaderHandle, name: &str) -> Option<glow::NativeUniformLocation> {
        let program = shader::native_program(shader)?;
        // SAFETY: location lookup on a program of this context
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_buffers(&self, mesh: &ShapeMesh) -> Result<GlMesh, String> {
        // SAFETY: buffer creation and upload on the owned context; the vertex
        // array stays bound while the element buffer is attached to it
        unsafe {
            let vao = self.gl.create_vertex_array()?;
            self.gl.bind_vertex_array(Some(vao));

            let vbo = match self.gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    self.gl.bind_vertex_array(None);
                    self.gl.delete_vertex_array(vao);
                    return Err(e);
                }
            };
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.positions),
                glow::STATIC_DRAW,
            );

            let ebo = match &mesh.indices {
                Some(indices) => match self.gl.create_buffer() {
                    Ok(ebo) => {
                        self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                        self.gl.buffer_data_u8_slice(
                            glow::ELEMENT_ARRAY_BUFFER,
                            bytemuck::cast_slice(indices),
                            glow::STATIC_DRAW,
                        );
                        Some(ebo)
                    }
                    Err(e) => {
                        self.gl.bind_vertex_array(None);
                        self.gl.delete_buffer(vbo);
                        self.gl.delete_vertex_array(vao);
                        return Err(e);
                    }
                },
                None => None,
            };

            #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
            let stride = std::mem::size_of::<[f32; 3]>() as i32;
            self.gl.vertex_attrib_pointer_f32(POSITION_ATTRIBUTE, 3, glow::FLOAT, false, stride, 0);
            self.gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);

            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(GlMesh { vao, vbo, ebo })
        }
    }

    fn delete_buffers(&self, mesh: GlMesh) {
        // SAFETY: the objects were created on this context and are no longer referenced
        unsafe {
            self.gl.delete_vertex_array(mesh.vao);
            self.gl.delete_buffer(mesh.vbo);
            if let Some(ebo) = mesh.ebo {
                self.gl.delete_buffer(ebo);
            }
        }
    }
}

impl GraphicsBackend for OpenGlBackend {
    fn upload_mesh(&mut self, mesh: &ShapeMesh) -> BackendResult<MeshHandle> {
        let buffers = self.create_buffers(mesh).map_err(|e| {
            RenderError::ContextUnavailable(format!("vertex buffer creation failed: {}", e))
        })?;
        Ok(self.meshes.insert(buffers))
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.remove(handle) {
            self.delete_buffers(mesh);
        }
    }

    fn use_shader(&mut self, shader: ShaderHandle) {
        // SAFETY: binding a program of this context, or none
        unsafe { self.gl.use_program(shader::native_program(shader)) };
    }

    fn set_uniform_mat4(&mut self, shader: ShaderHandle, name: &str, value: &Mat4) {
        if let Some(location) = self.uniform_location(shader, name) {
            // nalgebra stores column-major, as GL expects without transposing
            // SAFETY: uniform write on the program bound by `use_shader`
            unsafe { self.gl.uniform_matrix_4_f32_slice(Some(&location), false, value.as_slice()) };
        }
    }

    fn set_uniform_vec3(&mut self, shader: ShaderHandle, name: &str, value: [f32; 3]) {
        if let Some(location) = self.uniform_location(shader, name) {
            // SAFETY: uniform write on the program bound by `use_shader`
            unsafe { self.gl.uniform_3_f32(Some(&location), value[0], value[1], value[2]) };
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn draw_mesh(&mut self, handle: MeshHandle, topology: Topology, count: u32, indexed: bool) {
        let Some(mesh) = self.meshes.get(handle) else {
            log::trace!("draw_mesh with released handle {:?}", handle);
            return;
        };

        let mode = match topology {
            Topology::Triangles => glow::TRIANGLES,
            Topology::TriangleStrip => glow::TRIANGLE_STRIP,
        };

        // SAFETY: the vertex array belongs to this context and `count` never
        // exceeds the uploaded data
        unsafe {
            self.gl.bind_vertex_array(Some(mesh.vao));
            if indexed {
                self.gl.draw_elements(mode, count as i32, glow::UNSIGNED_INT, 0);
            } else {
                self.gl.draw_arrays(mode, 0, count as i32);
            }
        }
    }
}

impl Drop for OpenGlBackend {
    fn drop(&mut self) {
        if !self.meshes.is_empty() {
            log::warn!("OpenGlBackend dropped with {} live meshes", self.meshes.len());
            let meshes: Vec<_> = self.meshes.drain().map(|(_, mesh)| mesh).collect();
            for mesh in meshes {
                self.delete_buffers(mesh);
            }
        }
    }
}
