//! Recording backend
//!
//! A [`GraphicsBackend`] that keeps every call in order instead of talking to
//! a GPU. Uniform writes are also tracked as current state, so each draw can
//! be resolved to the `model` matrix and `objectColor` it would have used.
//! Used by the engine's tests.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::foundation::math::Mat4;
use crate::render::backend::{BackendResult, GraphicsBackend, MeshHandle, RenderError, ShaderHandle, Topology};
use crate::render::mesh::ShapeMesh;
use crate::render::uniforms;

/// One backend call, as issued
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// `upload_mesh`
    Upload {
        /// Handle returned to the caller
        handle: MeshHandle,
        /// Number of vertex positions uploaded
        vertices: usize,
        /// Whether an index buffer was uploaded
        indexed: bool,
    },
    /// `release_mesh`
    Release(MeshHandle),
    /// `use_shader`
    UseShader(ShaderHandle),
    /// `set_uniform_mat4`
    UniformMat4 {
        /// Target program
        shader: ShaderHandle,
        /// Uniform name
        name: String,
        /// Written value
        value: Mat4,
    },
    /// `set_uniform_vec3`
    UniformVec3 {
        /// Target program
        shader: ShaderHandle,
        /// Uniform name
        name: String,
        /// Written value
        value: [f32; 3],
    },
    /// `draw_mesh`
    Draw {
        /// Mesh drawn
        handle: MeshHandle,
        /// Primitive assembly
        topology: Topology,
        /// Vertex or index count
        count: u32,
        /// Indexed draw
        indexed: bool,
    },
}

/// A draw resolved against the uniform state current when it was issued
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDraw {
    /// Mesh drawn
    pub handle: MeshHandle,
    /// Vertex or index count
    pub count: u32,
    /// `model` uniform at draw time
    pub model: Option<Mat4>,
    /// `objectColor` uniform at draw time
    pub color: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Copy)]
struct StoredMesh {
    draw_count: u32,
}

/// Backend that records instead of rendering
#[derive(Debug, Default)]
pub struct RecordingBackend {
    meshes: SlotMap<MeshHandle, StoredMesh>,
    commands: Vec<RecordedCommand>,
    current_shader: ShaderHandle,
    mat4_uniforms: HashMap<(ShaderHandle, String), Mat4>,
    vec3_uniforms: HashMap<(ShaderHandle, String), [f32; 3]>,
    resolved: Vec<ResolvedDraw>,
    uploads: usize,
    upload_budget: Option<usize>,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload after the first `successful` ones fail
    pub fn fail_uploads_after(&mut self, successful: usize) {
        self.upload_budget = Some(successful);
    }

    /// All commands since creation or the last `clear_commands`
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Draws since creation or the last `clear_commands`, with their uniforms
    pub fn resolved_draws(&self) -> &[ResolvedDraw] {
        &self.resolved
    }

    /// Forget recorded commands and draws; meshes and uniform state are kept
    pub fn clear_commands(&mut self) {
        self.commands.clear();
        self.resolved.clear();
    }

    /// Number of successful uploads so far
    pub const fn uploads(&self) -> usize {
        self.uploads
    }

    /// Number of meshes uploaded and not yet released
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Program most recently passed to `use_shader`
    pub const fn current_shader(&self) -> ShaderHandle {
        self.current_shader
    }

    /// Number of `objectColor` writes recorded
    pub fn color_writes(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RecordedCommand::UniformVec3 { name, .. } if name == uniforms::OBJECT_COLOR))
            .count()
    }

    /// Current value of a vec3 uniform, if written
    pub fn vec3_uniform(&self, shader: ShaderHandle, name: &str) -> Option<[f32; 3]> {
        self.vec3_uniforms.get(&(shader, name.to_string())).copied()
    }

    /// Current value of a mat4 uniform, if written
    pub fn mat4_uniform(&self, shader: ShaderHandle, name: &str) -> Option<Mat4> {
        self.mat4_uniforms.get(&(shader, name.to_string())).copied()
    }
}

impl GraphicsBackend for RecordingBackend {
    fn upload_mesh(&mut self, mesh: &ShapeMesh) -> BackendResult<MeshHandle> {
        if let Some(budget) = self.upload_budget {
            if self.uploads >= budget {
                return Err(RenderError::ContextUnavailable("recording backend upload budget exhausted".to_string()));
            }
        }

        let handle = self.meshes.insert(StoredMesh { draw_count: mesh.draw_count() });
        self.uploads += 1;
        self.commands.push(RecordedCommand::Upload {
            handle,
            vertices: mesh.positions.len(),
            indexed: mesh.is_indexed(),
        });
        Ok(handle)
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if self.meshes.remove(handle).is_some() {
            self.commands.push(RecordedCommand::Release(handle));
        }
    }

    fn use_shader(&mut self, shader: ShaderHandle) {
        self.current_shader = shader;
        self.commands.push(RecordedCommand::UseShader(shader));
    }

    fn set_uniform_mat4(&mut self, shader: ShaderHandle, name: &str, value: &Mat4) {
        self.mat4_uniforms.insert((shader, name.to_string()), *value);
        self.commands.push(RecordedCommand::UniformMat4 {
            shader,
            name: name.to_string(),
            value: *value,
        });
    }

    fn set_uniform_vec3(&mut self, shader: ShaderHandle, name: &str, value: [f32; 3]) {
        self.vec3_uniforms.insert((shader, name.to_string()), value);
        self.commands.push(RecordedCommand::UniformVec3 {
            shader,
            name: name.to_string(),
            value,
        });
    }

    fn draw_mesh(&mut self, handle: MeshHandle, topology: Topology, count: u32, indexed: bool) {
        if let Some(stored) = self.meshes.get(handle) {
            debug_assert!(count <= stored.draw_count, "draw count exceeds uploaded data");
        }

        let shader = self.current_shader;
        self.resolved.push(ResolvedDraw {
            handle,
            count,
            model: self.mat4_uniform(shader, uniforms::MODEL),
            color: self.vec3_uniform(shader, uniforms::OBJECT_COLOR),
        });
        self.commands.push(RecordedCommand::Draw { handle, topology, count, indexed });
    }
}
