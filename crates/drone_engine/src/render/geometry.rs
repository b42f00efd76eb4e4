//! Geometry provider
//!
//! Owns the GPU copies of the static shape meshes. Shapes are uploaded once by
//! [`GeometryProvider::initialize`] and drawn by reference afterwards.

use std::collections::HashMap;

use crate::foundation::math::Mat4;
use crate::render::backend::{BackendResult, GraphicsBackend, MeshHandle, ShaderHandle, Topology};
use crate::render::mesh::{Shape, ShapeMesh};
use crate::render::uniforms;

/// Mesh generation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySettings {
    /// Ridge height of the beveled cube
    pub bevel: f32,
    /// Sphere latitude bands
    pub sphere_stacks: u32,
    /// Sphere longitude segments
    pub sphere_slices: u32,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            bevel: 0.1,
            sphere_stacks: 12,
            sphere_slices: 12,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct UploadedShape {
    handle: MeshHandle,
    topology: Topology,
    count: u32,
    indexed: bool,
}

/// GPU-resident shapes with an explicit initialize / release lifecycle
#[derive(Debug, Default)]
pub struct GeometryProvider {
    settings: GeometrySettings,
    shapes: HashMap<Shape, UploadedShape>,
    initialized: bool,
}

impl GeometryProvider {
    /// Create an empty provider; nothing is uploaded until `initialize`
    pub fn new(settings: GeometrySettings) -> Self {
        Self {
            settings,
            shapes: HashMap::new(),
            initialized: false,
        }
    }

    /// Upload every shape exactly once
    ///
    /// Subsequent calls are no-ops. If any upload fails the shapes uploaded so
    /// far are released again and the error is returned; a failure here means
    /// the host did not make its context current.
    pub fn initialize(&mut self, backend: &mut dyn GraphicsBackend) -> BackendResult<()> {
        if self.initialized {
            log::trace!("Geometry already initialised, skipping upload");
            return Ok(());
        }

        for shape in Shape::ALL {
            let mesh = ShapeMesh::for_shape(
                shape,
                self.settings.bevel,
                self.settings.sphere_stacks,
                self.settings.sphere_slices,
            );

            match backend.upload_mesh(&mesh) {
                Ok(handle) => {
                    log::debug!("Uploaded {:?}: {} vertices, draw count {}", shape, mesh.positions.len(), mesh.draw_count());
                    self.shapes.insert(shape, UploadedShape {
                        handle,
                        topology: mesh.topology,
                        count: mesh.draw_count(),
                        indexed: mesh.is_indexed(),
                    });
                }
                Err(e) => {
                    log::error!("Failed to upload {:?} geometry: {}", shape, e);
                    self.release(backend);
                    return Err(e);
                }
            }
        }

        self.initialized = true;
        log::info!("Drone geometry initialised ({} shapes)", self.shapes.len());
        Ok(())
    }

    /// Whether `initialize` has completed since the last `release`
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Vertex (or index) count a draw of `shape` issues, if uploaded
    pub fn draw_count(&self, shape: Shape) -> Option<u32> {
        self.shapes.get(&shape).map(|uploaded| uploaded.count)
    }

    /// Upload `model` to the shader's `model` uniform and draw the shape
    ///
    /// Drawing before `initialize` (or after `release`) draws nothing.
    pub fn draw_shape(&self, backend: &mut dyn GraphicsBackend, shape: Shape, model: &Mat4, shader: ShaderHandle) {
        let Some(uploaded) = self.shapes.get(&shape) else {
            log::trace!("draw_shape({:?}) before geometry initialisation", shape);
            return;
        };

        backend.set_uniform_mat4(shader, uniforms::MODEL, model);
        backend.draw_mesh(uploaded.handle, uploaded.topology, uploaded.count, uploaded.indexed);
    }

    /// Free all GPU buffers; safe to call repeatedly
    pub fn release(&mut self, backend: &mut dyn GraphicsBackend) {
        if self.shapes.is_empty() && !self.initialized {
            return;
        }

        for (shape, uploaded) in self.shapes.drain() {
            log::trace!("Releasing {:?} geometry", shape);
            backend.release_mesh(uploaded.handle);
        }
        self.initialized = false;
        log::info!("Drone geometry released");
    }
}
