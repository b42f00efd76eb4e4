//! # 3D Camera System
//!
//! A look-at [`Camera`] producing OpenGL view and projection matrices, and the
//! [`CameraRig`] that positions it from one of three vantages:
//!
//! - **Angled**: fixed eye looking at a fixed target
//! - **Chopper**: eye orbiting the origin at a fixed height
//! - **First person**: eye just ahead of the drone's nose, looking along its facing vector
//!
//! ## Coordinate System
//! Right-handed, Y-up. The drone's nose points along +Z at zero yaw and pitch.

use serde::{Deserialize, Serialize};

use crate::core::config::CameraConfig;
use crate::drone::DroneModel;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// 3D perspective camera
///
/// Matrices are computed on demand from the public fields.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in degrees
    pub fov_deg: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// The target starts at the origin.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov_deg: fov_degrees,
            aspect,
            near,
            far,
        }
    }

    /// Point the camera from `position` at `target` with the given up vector
    pub fn look_from(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.target = target;
        self.up = up;
        log::trace!("Camera look_from {:?} -> {:?}, up {:?}", position, target, up);
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only logs when the ratio changes noticeably, so resize drags stay quiet.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Generate view matrix for world-to-camera space transformation
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(&self.position, &self.target, &self.up)
    }

    /// Generate perspective projection matrix (OpenGL clip space)
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_gl(self.fov_deg, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(6.0, 3.0, 6.0), 45.0, 4.0 / 3.0, 0.1, 100.0)
    }
}

/// Which vantage the rig places the camera at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Fixed eye above and to the side of the drone's start point
    #[default]
    Angled,
    /// Overhead orbit around the origin
    Chopper,
    /// From the drone's nose, ignoring roll
    FirstPerson,
}

/// Camera with three switchable vantages
///
/// The chopper orbit angle advances on every [`CameraRig::update`], whether or
/// not the chopper vantage is active, so switching to it picks up mid-orbit.
#[derive(Debug, Clone)]
pub struct CameraRig {
    camera: Camera,
    mode: CameraMode,
    chopper_angle: f32,
    settings: CameraConfig,
}

impl CameraRig {
    /// Build a rig from camera configuration
    ///
    /// # Arguments
    /// * `settings` - Projection and vantage parameters
    /// * `aspect` - Initial framebuffer aspect ratio
    pub fn new(settings: CameraConfig, aspect: f32) -> Self {
        let camera = Camera::perspective(
            Vec3::from(settings.angled_eye),
            settings.fov_deg,
            aspect,
            settings.near,
            settings.far,
        );

        Self {
            camera,
            mode: settings.initial_mode,
            chopper_angle: 0.0,
            settings,
        }
    }

    /// Active vantage
    pub const fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switch vantage; switching to the active one does nothing
    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.mode != mode {
            log::info!("Camera switched: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Current chopper orbit angle in degrees, in `[0, 360)`
    pub const fn chopper_angle(&self) -> f32 {
        self.chopper_angle
    }

    /// Advance the chopper orbit by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.chopper_angle = utils::wrap_degrees(self.chopper_angle + self.settings.chopper_speed * dt);
    }

    /// Track a framebuffer resize
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.camera.set_aspect_ratio(aspect);
    }

    /// Place the camera for the active vantage and return its view matrix
    pub fn view_matrix(&mut self, drone: &DroneModel) -> Mat4 {
        let (eye, target, up) = match self.mode {
            CameraMode::Angled => (
                Vec3::from(self.settings.angled_eye),
                Vec3::from(self.settings.angled_target),
                Vec3::y(),
            ),
            CameraMode::Chopper => {
                let angle = utils::deg_to_rad(self.chopper_angle);
                let eye = Vec3::new(
                    self.settings.chopper_radius * angle.cos(),
                    self.settings.chopper_height,
                    self.settings.chopper_radius * angle.sin(),
                );
                (eye, Vec3::zeros(), Vec3::y())
            }
            CameraMode::FirstPerson => {
                let forward = drone.facing();
                let eye = drone.position() + forward * self.settings.first_person_offset;
                (eye, eye + forward, drone.up_vector())
            }
        };

        self.camera.look_from(eye, target, up);
        self.camera.get_view_matrix()
    }

    /// Projection matrix for the current aspect ratio
    pub fn projection_matrix(&self) -> Mat4 {
        self.camera.get_projection_matrix()
    }

    /// The underlying camera as last placed
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    fn rig() -> CameraRig {
        CameraRig::new(CameraConfig::default(), 800.0 / 600.0)
    }

    #[test]
    fn test_angled_view_looks_at_target() {
        let mut rig = rig();
        let view = rig.view_matrix(&DroneModel::default());

        // The target lands on the negative view-space Z axis
        let target = view.transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-5);
        assert!(target.z < 0.0);
        assert_relative_eq!(rig.camera().position, Vec3::new(6.0, 3.0, 6.0));
    }

    #[test]
    fn test_chopper_angle_advances_while_inactive() {
        let mut rig = rig();
        assert_eq!(rig.mode(), CameraMode::Angled);

        rig.update(2.0);
        assert_relative_eq!(rig.chopper_angle(), 60.0, epsilon = 1e-4);

        // 12 more seconds at 30 deg/s wraps past a full turn
        rig.update(12.0);
        assert_relative_eq!(rig.chopper_angle(), 60.0, epsilon = 1e-3);
        assert!(rig.chopper_angle() < 360.0);
    }

    #[test]
    fn test_chopper_orbit_position() {
        let mut rig = rig();
        rig.set_mode(CameraMode::Chopper);
        rig.update(3.0); // 90 degrees

        rig.view_matrix(&DroneModel::default());
        assert_relative_eq!(rig.camera().position, Vec3::new(0.0, 8.0, 10.0), epsilon = 1e-4);
        assert_relative_eq!(rig.camera().target, Vec3::zeros());
    }

    #[test]
    fn test_first_person_sits_ahead_of_nose() {
        let mut rig = rig();
        rig.set_mode(CameraMode::FirstPerson);

        let mut drone = DroneModel::default();
        drone.set_position(Vec3::new(1.0, 2.0, 3.0));
        drone.set_yaw(90.0);
        drone.set_pitch(0.0);
        drone.set_roll_angle(45.0);

        rig.view_matrix(&drone);
        let camera = rig.camera();
        assert_relative_eq!(camera.position, Vec3::new(1.3, 2.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(camera.target, Vec3::new(2.3, 2.0, 3.0), epsilon = 1e-5);
        // Roll is ignored
        assert_relative_eq!(camera.up, Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_projection_tracks_aspect() {
        let mut rig = rig();
        let before = rig.projection_matrix();
        rig.set_aspect_ratio(2.0);
        let after = rig.projection_matrix();

        assert_relative_eq!(before[(1, 1)], after[(1, 1)]);
        assert_relative_eq!(after[(0, 0)] * 2.0, after[(1, 1)], epsilon = 1e-5);
    }

    #[test]
    fn test_camera_mode_parses_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: CameraMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"first_person\"").expect("parses");
        assert_eq!(parsed.mode, CameraMode::FirstPerson);
    }
}
