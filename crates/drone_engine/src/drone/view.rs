//! Drone renderer
//!
//! Reads a [`DroneModel`] and draws every part of its layout through the
//! geometry provider. Never writes the model.
//!
//! ## Transform composition
//!
//! ```text
//! world = T(position) * R_y(yaw) * R_x(pitch) * R_z(roll) * S(layout scale) * T(0, 0.2, 0)
//! part  = world * T(offset) * [R_y(propeller) * R_y(blade) * T(0, 0, reach)] * S(scale)
//! ```
//!
//! Translate, yaw, pitch, roll is a fixed order; swapping any two changes the picture.

use crate::drone::layout::{DroneLayout, PartSpec};
use crate::drone::model::DroneModel;
use crate::foundation::math::{axes, Mat4, Mat4Ext, Vec3};
use crate::render::backend::{GraphicsBackend, ShaderHandle};
use crate::render::geometry::GeometryProvider;
use crate::render::mesh::Shape;
use crate::render::uniforms;

/// Renders one layout of the drone
#[derive(Debug, Clone)]
pub struct DroneView {
    layout: DroneLayout,
    parts: Vec<PartSpec>,
}

impl Default for DroneView {
    fn default() -> Self {
        Self::new(DroneLayout::default(), Shape::Cube)
    }
}

impl DroneView {
    /// Build the part list for `layout` with the fuselage drawn as `body_shape`
    pub fn new(layout: DroneLayout, body_shape: Shape) -> Self {
        let parts = layout.parts(body_shape);
        log::debug!("DroneView {:?}: {} parts, body {:?}", layout, parts.len(), body_shape);
        Self { layout, parts }
    }

    /// Layout being drawn
    pub const fn layout(&self) -> DroneLayout {
        self.layout
    }

    /// Parts in draw order
    pub fn parts(&self) -> &[PartSpec] {
        &self.parts
    }

    /// World transform of the drone for the current pose
    pub fn world_transform(&self, model: &DroneModel) -> Mat4 {
        let scale = self.layout.world_scale();
        Mat4::identity()
            .then_translate(&model.position())
            .then_rotate_deg(&axes::up(), model.yaw())
            .then_rotate_deg(&axes::right(), model.pitch())
            .then_rotate_deg(&axes::forward(), model.roll_angle())
            .then_scale(&Vec3::repeat(scale))
            .then_translate(&self.layout.world_offset())
    }

    /// Model matrix of one part on top of `world`
    pub fn part_transform(world: &Mat4, part: &PartSpec, propeller_angle: f32) -> Mat4 {
        let mut transform = world.then_translate(&part.offset);
        if let Some(spin) = part.spin {
            transform = transform
                .then_rotate_deg(&axes::up(), propeller_angle)
                .then_rotate_deg(&axes::up(), spin.blade_angle_deg)
                .then_translate(&Vec3::new(0.0, 0.0, spin.reach));
        }
        transform.then_scale(&part.scale)
    }

    /// Draw every part of the drone in its current pose
    ///
    /// The host uploads `view` and `projection` first. The colour uniform is
    /// written only when it changes between consecutive parts and is left at
    /// the last part's colour.
    pub fn render(
        &self,
        backend: &mut dyn GraphicsBackend,
        geometry: &GeometryProvider,
        model: &DroneModel,
        shader: ShaderHandle,
    ) {
        let world = self.world_transform(model);
        backend.use_shader(shader);

        let mut current_color = None;
        for part in &self.parts {
            if current_color != Some(part.color) {
                backend.set_uniform_vec3(shader, uniforms::OBJECT_COLOR, part.color);
                current_color = Some(part.color);
            }

            let transform = Self::part_transform(&world, part, model.propeller_angle());
            geometry.draw_shape(backend, part.shape, &transform, shader);
        }
    }
}
