//! Math utilities and types
//!
//! Provides the nalgebra aliases used for poses and part transforms, plus a
//! small extension trait that post-multiplies translate / rotate / scale steps
//! so that a composition reads in the same order it is applied.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Unit-length axis used for rotations
pub type Axis = Unit<Vector3<f32>>;

/// Canonical axes of the drone's frame (Y-up, right-handed, nose along +Z)
pub mod axes {
    use super::{Axis, Vec3};

    /// Vertical axis, used for yaw and propeller spin
    pub fn up() -> Axis {
        Vec3::y_axis()
    }

    /// Horizontal axis, used for pitch
    pub fn right() -> Axis {
        Vec3::x_axis()
    }

    /// Forward axis, used for roll
    pub fn forward() -> Axis {
        Vec3::z_axis()
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees in a full turn
    pub const FULL_TURN_DEG: f32 = 360.0;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Wrap an angle in degrees into `[0, 360)` using true modulo
    ///
    /// `rem_euclid` can round up to exactly 360.0 for tiny negative inputs,
    /// which is folded back to 0.
    pub fn wrap_degrees(degrees: f32) -> f32 {
        let wrapped = degrees.rem_euclid(constants::FULL_TURN_DEG);
        if wrapped >= constants::FULL_TURN_DEG {
            0.0
        } else {
            wrapped
        }
    }
}

/// Extension trait for Mat4 with composition helpers
///
/// Every `then_*` method post-multiplies, matching the usual
/// `m = translate(m, ..); m = rotate(m, ..)` style of building a model matrix.
pub trait Mat4Ext {
    /// `self * T(offset)`
    fn then_translate(&self, offset: &Vec3) -> Mat4;

    /// `self * R(axis, degrees)`
    fn then_rotate_deg(&self, axis: &Axis, degrees: f32) -> Mat4;

    /// `self * S(scale)`
    fn then_scale(&self, scale: &Vec3) -> Mat4;

    /// Create an OpenGL perspective projection matrix (clip z in [-1, 1])
    fn perspective_gl(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn then_translate(&self, offset: &Vec3) -> Mat4 {
        self * Mat4::new_translation(offset)
    }

    fn then_rotate_deg(&self, axis: &Axis, degrees: f32) -> Mat4 {
        self * Mat4::from_axis_angle(axis, utils::deg_to_rad(degrees))
    }

    fn then_scale(&self, scale: &Vec3) -> Mat4 {
        self * Mat4::new_nonuniform_scaling(scale)
    }

    fn perspective_gl(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, utils::deg_to_rad(fov_y_deg), near, far)
    }

    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }
}

/// Rotate a direction by yaw about the vertical axis, then by pitch about the horizontal axis
///
/// Computes `R_y(yaw) * R_x(pitch) * v`, the same composition the renderer
/// applies to the drone body, so the result always points where the nose does.
pub fn rotate_yaw_pitch(direction: &Vec3, yaw_deg: f32, pitch_deg: f32) -> Vec3 {
    let rotation = Mat4::identity()
        .then_rotate_deg(&axes::up(), yaw_deg)
        .then_rotate_deg(&axes::right(), pitch_deg);
    rotation.transform_vector(direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_degrees_range() {
        for angle in [-720.5_f32, -360.0, -1e-8, 0.0, 359.999, 360.0, 725.0, 1.0e6] {
            let wrapped = utils::wrap_degrees(angle);
            assert!((0.0..360.0).contains(&wrapped), "{} wrapped to {}", angle, wrapped);
        }
        assert_relative_eq!(utils::wrap_degrees(450.0), 90.0);
        assert_relative_eq!(utils::wrap_degrees(-90.0), 270.0);
    }

    #[test]
    fn test_composition_is_post_multiplied() {
        // Translate then scale: the scale must not affect the translation
        let m = Mat4::identity()
            .then_translate(&Vec3::new(1.0, 2.0, 3.0))
            .then_scale(&Vec3::new(2.0, 2.0, 2.0));
        let origin = m.transform_point(&Point3::origin());
        assert_relative_eq!(origin.coords, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-6);

        let corner = m.transform_point(&Point3::new(0.5, 0.5, 0.5));
        assert_relative_eq!(corner.coords, Vec3::new(2.0, 3.0, 4.0), epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_rotates_forward_towards_positive_x() {
        let facing = rotate_yaw_pitch(&Vec3::z(), 90.0, 0.0);
        assert_relative_eq!(facing, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_positive_pitch_tilts_forward_down() {
        let facing = rotate_yaw_pitch(&Vec3::z(), 0.0, 90.0);
        assert_relative_eq!(facing, Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_then_pitch_order_matters() {
        let yaw_then_pitch = rotate_yaw_pitch(&Vec3::z(), 90.0, 45.0);
        let pitch_then_yaw = Mat4::identity()
            .then_rotate_deg(&axes::right(), 45.0)
            .then_rotate_deg(&axes::up(), 90.0)
            .transform_vector(&Vec3::z());

        assert!((yaw_then_pitch - pitch_then_yaw).norm() > 0.1);
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(yaw_then_pitch, Vec3::new(s, -s, 0.0), epsilon = 1e-6);
    }
}
