//! Pose model
//!
//! The five animation parameters of one drone. Plain storage: setters do no
//! validation, wraparound and range policy belong to the controller.

use crate::foundation::math::{self, utils, Vec3};

/// Fixed pose a drone starts in and returns to on reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseDefaults {
    /// World position
    pub position: Vec3,
    /// Yaw in degrees
    pub yaw: f32,
    /// Pitch in degrees
    pub pitch: f32,
}

impl Default for PoseDefaults {
    /// Centre of the scene, one unit above ground, turned 45 degrees
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 0.0),
            yaw: 45.0,
            pitch: 0.0,
        }
    }
}

/// Pose of one drone instance
#[derive(Debug, Clone, PartialEq)]
pub struct DroneModel {
    propeller_angle: f32,
    roll_angle: f32,
    yaw: f32,
    pitch: f32,
    position: Vec3,
}

impl Default for DroneModel {
    fn default() -> Self {
        Self::from_defaults(&PoseDefaults::default())
    }
}

impl DroneModel {
    /// Pose at `defaults` with propellers and roll at rest
    pub fn from_defaults(defaults: &PoseDefaults) -> Self {
        Self {
            propeller_angle: 0.0,
            roll_angle: 0.0,
            yaw: defaults.yaw,
            pitch: defaults.pitch,
            position: defaults.position,
        }
    }

    /// Propeller angle in degrees
    pub const fn propeller_angle(&self) -> f32 {
        self.propeller_angle
    }

    /// Set the propeller angle in degrees
    pub fn set_propeller_angle(&mut self, degrees: f32) {
        self.propeller_angle = degrees;
    }

    /// Roll angle in degrees; 0 unless a roll is in progress
    pub const fn roll_angle(&self) -> f32 {
        self.roll_angle
    }

    /// Set the roll angle in degrees
    pub fn set_roll_angle(&mut self, degrees: f32) {
        self.roll_angle = degrees;
    }

    /// Yaw in degrees, unbounded
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Set the yaw in degrees
    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
    }

    /// Pitch in degrees, unbounded
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set the pitch in degrees
    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch = degrees;
    }

    /// World position
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Set the world position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Yaw folded into `[0, 360)` for display
    pub fn yaw_wrapped(&self) -> f32 {
        utils::wrap_degrees(self.yaw)
    }

    /// Pitch folded into `[0, 360)` for display
    pub fn pitch_wrapped(&self) -> f32 {
        utils::wrap_degrees(self.pitch)
    }

    /// Unit facing vector: +Z rotated by yaw about Y, then by pitch about X
    ///
    /// Yaw +90 faces +X; positive pitch tilts the nose down. The product is
    /// `R_y(yaw) * R_x(pitch)`: pitch is about the drone's own (already yawed)
    /// X axis, the same order the renderer uses, so it must not become `R_x * R_y`.
    pub fn facing(&self) -> Vec3 {
        math::rotate_yaw_pitch(&Vec3::z(), self.yaw, self.pitch).normalize()
    }

    /// The drone's up direction ignoring roll
    pub fn up_vector(&self) -> Vec3 {
        math::rotate_yaw_pitch(&Vec3::y(), self.yaw, self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_pose() {
        let model = DroneModel::default();
        assert_eq!(model.position(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(model.yaw(), 45.0);
        assert_eq!(model.pitch(), 0.0);
        assert_eq!(model.propeller_angle(), 0.0);
        assert_eq!(model.roll_angle(), 0.0);
    }

    #[test]
    fn test_setters_store_without_validation() {
        let mut model = DroneModel::default();
        model.set_propeller_angle(725.0);
        model.set_yaw(-400.0);
        model.set_pitch(1000.0);

        assert_eq!(model.propeller_angle(), 725.0);
        assert_eq!(model.yaw(), -400.0);
        assert_eq!(model.pitch(), 1000.0);
        assert_relative_eq!(model.yaw_wrapped(), 320.0, epsilon = 1e-4);
        assert_relative_eq!(model.pitch_wrapped(), 280.0, epsilon = 1e-4);
    }

    #[test]
    fn test_facing_is_unit_length() {
        let mut model = DroneModel::default();
        for (yaw, pitch) in [(0.0, 0.0), (45.0, 30.0), (-170.0, 80.0), (720.0, -45.0)] {
            model.set_yaw(yaw);
            model.set_pitch(pitch);
            assert_relative_eq!(model.facing().norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(model.facing().dot(&model.up_vector()), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_facing_at_zero_is_forward() {
        let mut model = DroneModel::default();
        model.set_yaw(0.0);
        assert_relative_eq!(model.facing(), Vec3::z(), epsilon = 1e-6);
        assert_relative_eq!(model.up_vector(), Vec3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_applies_inside_yaw() {
        let mut model = DroneModel::default();
        model.set_yaw(90.0);
        model.set_pitch(45.0);

        // Pitch tilts the yawed nose (+X) downward; R_x * R_y would leave it on +X
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(model.facing(), Vec3::new(half, -half, 0.0), epsilon = 1e-6);
    }
}
