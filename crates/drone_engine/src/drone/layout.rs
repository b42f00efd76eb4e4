//! Declarative part lists
//!
//! A drone is a fixed list of rigid parts, each drawn as
//! `world * T(offset) * [spin] * S(scale)`. Adding or moving a part is a change
//! to the tables below, never to the renderer.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::Shape;

/// Part list variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneLayout {
    /// Four arms and propellers around a pink body with a sphere nose
    #[default]
    Quad,
    /// Two side arms and propellers, single colour, scaled up by 1.2
    Twin,
}

/// Propeller spin placement between the part offset and its scale
///
/// Expands to `R_y(propeller_angle) * R_y(blade_angle_deg) * T(0, 0, reach)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRecipe {
    /// Fixed angular offset of this blade around the hub, degrees
    pub blade_angle_deg: f32,
    /// Distance from the hub along the local forward axis
    pub reach: f32,
}

impl SpinRecipe {
    /// The hub itself: spins in place
    pub const HUB: Self = Self {
        blade_angle_deg: 0.0,
        reach: 0.0,
    };
}

/// One rigid part of the drone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartSpec {
    /// Part name, for logs and tests
    pub name: &'static str,
    /// Mesh drawn for this part
    pub shape: Shape,
    /// Translation from the drone's origin, applied first
    pub offset: Vec3,
    /// Propeller spin, if this part turns with the propellers
    pub spin: Option<SpinRecipe>,
    /// Scale of the unit shape, applied last
    pub scale: Vec3,
    /// Flat colour
    pub color: [f32; 3],
}

/// Body colour of the quad layout
pub const PINK: [f32; 3] = [1.0, 0.4, 0.7];
/// Nose colour of the quad layout
pub const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
/// Arm and leg colour of the quad layout
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
/// Propeller colour of the quad layout
pub const RED: [f32; 3] = [1.0, 0.0, 0.0];
/// Every part of the twin layout
pub const LIGHT_GREY: [f32; 3] = [0.85, 0.85, 0.85];

const BLADES_PER_PROPELLER: u16 = 4;

const fn part(name: &'static str, shape: Shape, offset: Vec3, scale: Vec3, color: [f32; 3]) -> PartSpec {
    PartSpec {
        name,
        shape,
        offset,
        spin: None,
        scale,
        color,
    }
}

/// Hub followed by its blades, all sharing `center`
fn propeller(
    parts: &mut Vec<PartSpec>,
    center: Vec3,
    blade_reach: f32,
    blade_scale: Vec3,
    color: [f32; 3],
) {
    parts.push(PartSpec {
        name: "hub",
        shape: Shape::Cube,
        offset: center,
        spin: Some(SpinRecipe::HUB),
        scale: Vec3::repeat(0.1),
        color,
    });

    for i in 0..BLADES_PER_PROPELLER {
        parts.push(PartSpec {
            name: "blade",
            shape: Shape::Cube,
            offset: center,
            spin: Some(SpinRecipe {
                blade_angle_deg: 90.0 * f32::from(i),
                reach: blade_reach,
            }),
            scale: blade_scale,
            color,
        });
    }
}

impl DroneLayout {
    /// Uniform scale applied after the pose rotations
    pub const fn world_scale(self) -> f32 {
        match self {
            Self::Quad => 1.0,
            Self::Twin => 1.2,
        }
    }

    /// Small vertical centring offset applied after the world scale
    pub fn world_offset(self) -> Vec3 {
        Vec3::new(0.0, 0.2, 0.0)
    }

    /// The part list, in draw order, with the fuselage drawn as `body_shape`
    pub fn parts(self, body_shape: Shape) -> Vec<PartSpec> {
        match self {
            Self::Quad => quad_parts(body_shape),
            Self::Twin => twin_parts(body_shape),
        }
    }
}

fn quad_parts(body_shape: Shape) -> Vec<PartSpec> {
    const CORNERS: [(f32, f32); 4] = [(-0.9, 0.5), (0.9, 0.5), (-0.9, -0.5), (0.9, -0.5)];
    const LEGS: [(f32, f32); 4] = [(-0.5, 0.3), (0.5, 0.3), (-0.5, -0.3), (0.5, -0.3)];

    let mut parts = vec![
        part("body", body_shape, Vec3::zeros(), Vec3::new(1.6, 0.5, 1.0), PINK),
        part("nose", Shape::Sphere, Vec3::new(0.0, 0.0, 0.7), Vec3::repeat(0.2), YELLOW),
    ];

    for (x, z) in CORNERS {
        parts.push(part("arm", Shape::Cube, Vec3::new(x, 0.0, z), Vec3::new(0.7, 0.1, 0.1), WHITE));
    }

    // Propellers sit past the arm tips, on the outer side
    for (x, z) in CORNERS {
        let prop_x = x + 0.45_f32.copysign(x);
        propeller(&mut parts, Vec3::new(prop_x, 0.1, z), 0.2, Vec3::new(0.05, 0.02, 0.35), RED);
    }

    for (x, z) in LEGS {
        parts.push(part("leg", Shape::Cube, Vec3::new(x, -0.3, z), Vec3::new(0.1, 0.4, 0.1), WHITE));
    }

    parts
}

fn twin_parts(body_shape: Shape) -> Vec<PartSpec> {
    let mut parts = vec![
        part("body", body_shape, Vec3::zeros(), Vec3::new(1.5, 0.4, 0.6), LIGHT_GREY),
        part("nose", Shape::Cube, Vec3::new(0.0, 0.0, 0.6), Vec3::new(0.4, 0.3, 0.4), LIGHT_GREY),
    ];

    for x in [-1.2, 1.2] {
        parts.push(part("arm", Shape::Cube, Vec3::new(x, 0.0, 0.0), Vec3::new(0.3, 0.15, 0.8), LIGHT_GREY));
    }
    for x in [-1.2, 1.2] {
        propeller(&mut parts, Vec3::new(x, 0.3, 0.0), 0.2, Vec3::new(0.05, 0.02, 0.4), LIGHT_GREY);
    }
    for x in [-0.5, 0.5] {
        parts.push(part("leg", Shape::Cube, Vec3::new(x, -0.3, 0.0), Vec3::new(0.1, 0.4, 0.1), LIGHT_GREY));
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn count(parts: &[PartSpec], name: &str) -> usize {
        parts.iter().filter(|p| p.name == name).count()
    }

    #[test]
    fn test_quad_part_counts() {
        let parts = DroneLayout::Quad.parts(Shape::Cube);
        assert_eq!(parts.len(), 30);
        assert_eq!(count(&parts, "arm"), 4);
        assert_eq!(count(&parts, "hub"), 4);
        assert_eq!(count(&parts, "blade"), 16);
        assert_eq!(count(&parts, "leg"), 4);
        assert_eq!(parts[1].shape, Shape::Sphere);
    }

    #[test]
    fn test_twin_part_counts() {
        let parts = DroneLayout::Twin.parts(Shape::Cube);
        assert_eq!(parts.len(), 16);
        assert_eq!(count(&parts, "hub"), 2);
        assert_eq!(count(&parts, "blade"), 8);
        assert!(parts.iter().all(|p| p.color == LIGHT_GREY));
    }

    #[test]
    fn test_body_shape_is_substituted() {
        let parts = DroneLayout::Quad.parts(Shape::BeveledCube);
        assert_eq!(parts[0].name, "body");
        assert_eq!(parts[0].shape, Shape::BeveledCube);
        assert_eq!(count(&parts, "arm"), 4);
        assert!(parts[2..].iter().all(|p| p.shape == Shape::Cube));
    }

    #[test]
    fn test_quad_propellers_sit_outside_arms() {
        let parts = DroneLayout::Quad.parts(Shape::Cube);
        let hubs: Vec<_> = parts.iter().filter(|p| p.name == "hub").collect();
        for (hub, expected_x) in hubs.iter().zip([-1.35_f32, 1.35, -1.35, 1.35]) {
            assert_relative_eq!(hub.offset.x, expected_x, epsilon = 1e-6);
            assert_relative_eq!(hub.offset.y, 0.1);
        }
    }

    #[test]
    fn test_blades_are_quarter_turns_apart() {
        let parts = DroneLayout::Quad.parts(Shape::Cube);
        let angles: Vec<f32> = parts
            .iter()
            .filter_map(|p| p.spin)
            .take(5)
            .map(|spin| spin.blade_angle_deg)
            .collect();
        assert_eq!(angles, vec![0.0, 0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_layout_scale() {
        assert_eq!(DroneLayout::Quad.world_scale(), 1.0);
        assert_eq!(DroneLayout::Twin.world_scale(), 1.2);
    }
}
