//! # Unified Configuration System
//!
//! All tunables of the viewer in one place: window, drone defaults, controls
//! and cameras. Every section derives serde and carries `#[serde(default)]`,
//! so a configuration file only needs to list the values it changes.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging
//! - **Window Config**: size, title, clear colour
//! - **Drone Config**: start pose, animation speeds, part layout, mesh resolution
//! - **Control Config**: rates applied to held keys
//! - **Camera Config**: projection and the three camera vantages

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};
use crate::drone::{ControllerSettings, PoseDefaults};
use crate::drone::layout::DroneLayout;
use crate::foundation::math::Vec3;
use crate::render::mesh::MAX_SPHERE_RESOLUTION;
use crate::render::{CameraMode, Shape};

/// # Engine Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial client width in pixels
    pub width: u32,
    /// Initial client height in pixels
    pub height: u32,
    /// Title bar text
    pub title: String,
    /// Background colour used to clear each frame
    pub clear_color: [f32; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Drone Viewer".to_string(),
            clear_color: [0.12, 0.12, 0.2],
        }
    }
}

/// # Drone Configuration
///
/// Start pose, animation speeds and what the drone is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    /// World position the drone starts at and returns to on reset
    pub start_position: [f32; 3],
    /// Yaw in degrees at startup and after reset
    pub start_yaw: f32,
    /// Pitch in degrees at startup and after reset
    pub start_pitch: f32,
    /// Default propeller speed in degrees per second
    pub propeller_speed: f32,
    /// Roll speed in degrees per second
    pub roll_speed: f32,
    /// Which part list to render
    pub layout: DroneLayout,
    /// Shape used for the fuselage
    pub body_shape: Shape,
    /// Bevel height of the beveled cube, as a fraction of the unit edge
    pub bevel: f32,
    /// Sphere latitude bands
    pub sphere_stacks: u32,
    /// Sphere longitude segments
    pub sphere_slices: u32,
}

impl Default for DroneConfig {
    fn default() -> Self {
        let home = PoseDefaults::default();
        let settings = ControllerSettings::default();
        Self {
            start_position: home.position.into(),
            start_yaw: home.yaw,
            start_pitch: home.pitch,
            propeller_speed: settings.default_propeller_speed,
            roll_speed: settings.roll_speed,
            layout: DroneLayout::Quad,
            body_shape: Shape::Cube,
            bevel: 0.1,
            sphere_stacks: 12,
            sphere_slices: 12,
        }
    }
}

impl DroneConfig {
    /// Pose the drone starts in and is reset to
    pub fn pose_defaults(&self) -> PoseDefaults {
        PoseDefaults {
            position: Vec3::from(self.start_position),
            yaw: self.start_yaw,
            pitch: self.start_pitch,
        }
    }

    /// Animation controller settings derived from this configuration
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            default_propeller_speed: self.propeller_speed,
            roll_speed: self.roll_speed,
            home: self.pose_defaults(),
        }
    }

    /// Validate the drone configuration
    ///
    /// Comparisons are written so NaN fails them.
    pub fn validate(&self) -> Result<(), String> {
        if !self.start_position.iter().all(|c| c.is_finite()) {
            return Err(format!("Start position must be finite, got {:?}", self.start_position));
        }
        if !(self.start_yaw.is_finite() && self.start_pitch.is_finite()) {
            return Err(format!(
                "Start yaw and pitch must be finite, got {} / {}",
                self.start_yaw, self.start_pitch
            ));
        }
        if !(self.propeller_speed >= 0.0 && self.propeller_speed.is_finite()) {
            return Err(format!("Propeller speed must be finite and not negative, got {}", self.propeller_speed));
        }
        if !(self.roll_speed > 0.0 && self.roll_speed.is_finite()) {
            return Err(format!("Roll speed must be positive and finite, got {}", self.roll_speed));
        }
        if !(2..=MAX_SPHERE_RESOLUTION).contains(&self.sphere_stacks)
            || !(3..=MAX_SPHERE_RESOLUTION).contains(&self.sphere_slices)
        {
            return Err(format!(
                "Sphere needs 2..={max} stacks and 3..={max} slices, got {}x{}",
                self.sphere_stacks,
                self.sphere_slices,
                max = MAX_SPHERE_RESOLUTION
            ));
        }
        if !(0.0..0.5).contains(&self.bevel) {
            return Err(format!("Bevel must be in [0, 0.5), got {}", self.bevel));
        }
        Ok(())
    }
}

/// # Control Configuration
///
/// Rates applied while keys are held; all are scaled by the frame delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Propeller speed change in degrees per second, per second
    pub propeller_accel: f32,
    /// Yaw / pitch rate in degrees per second
    pub turn_rate: f32,
    /// Distance travelled per degree of propeller speed per second
    pub move_factor: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            propeller_accel: 50.0,
            turn_rate: 90.0,
            move_factor: 0.01,
        }
    }
}

/// # Camera Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera active at startup
    pub initial_mode: CameraMode,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
    /// Eye position of the angled vantage
    pub angled_eye: [f32; 3],
    /// Look-at target of the angled vantage
    pub angled_target: [f32; 3],
    /// Orbit radius of the chopper camera
    pub chopper_radius: f32,
    /// Height of the chopper camera
    pub chopper_height: f32,
    /// Orbit speed of the chopper camera in degrees per second
    pub chopper_speed: f32,
    /// Distance ahead of the drone centre for the first-person eye
    pub first_person_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_mode: CameraMode::Angled,
            fov_deg: 45.0,
            near: 0.1,
            far: 100.0,
            angled_eye: [6.0, 3.0, 6.0],
            angled_target: [0.0, 1.0, 0.0],
            chopper_radius: 10.0,
            chopper_height: 8.0,
            chopper_speed: 30.0,
            first_person_offset: 0.3,
        }
    }
}

impl CameraConfig {
    /// Validate the camera configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(format!("Field of view must be in (0, 180), got {}", self.fov_deg));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(format!("Clip planes must satisfy 0 < near < far, got {} / {}", self.near, self.far));
        }
        Ok(())
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Window configuration
    pub window: WindowConfig,
    /// Drone configuration
    pub drone: DroneConfig,
    /// Input rates
    pub controls: ControlConfig,
    /// Camera configuration
    pub camera: CameraConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let controls = &self.controls;
        if ![controls.propeller_accel, controls.turn_rate, controls.move_factor]
            .iter()
            .all(|rate| *rate >= 0.0 && rate.is_finite())
        {
            return Err(ConfigError::Invalid("Control rates must be finite and not negative".to_string()));
        }
        self.drone.validate().map_err(ConfigError::Invalid)?;
        self.camera.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drone.start_position, [0.0, 1.0, 0.0]);
        assert_eq!(config.drone.start_yaw, 45.0);
        assert_eq!(config.drone.propeller_speed, 180.0);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let text = r#"
            [drone]
            propeller_speed = 240.0
            layout = "twin"

            [camera]
            initial_mode = "chopper"
        "#;
        let config: ApplicationConfig = toml::from_str(text).expect("partial config parses");

        assert_eq!(config.drone.propeller_speed, 240.0);
        assert_eq!(config.drone.layout, DroneLayout::Twin);
        assert_eq!(config.drone.roll_speed, 180.0);
        assert_eq!(config.camera.initial_mode, CameraMode::Chopper);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ApplicationConfig::default();
        config.drone.roll_speed = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.drone.sphere_slices = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_nan() {
        let text = r#"
            [drone]
            roll_speed = nan
        "#;
        let config: ApplicationConfig = toml::from_str(text).expect("nan parses");
        assert!(config.drone.roll_speed.is_nan());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.camera.near = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.drone.propeller_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.drone.start_position[1] = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.drone.start_pitch = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.controls.turn_rate = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_sphere_resolution() {
        let mut config = ApplicationConfig::default();
        config.drone.sphere_stacks = 70_000;
        config.drone.sphere_slices = 70_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.drone.sphere_stacks = MAX_SPHERE_RESOLUTION;
        config.drone.sphere_slices = MAX_SPHERE_RESOLUTION;
        assert!(config.validate().is_ok());

        config.drone.sphere_slices = MAX_SPHERE_RESOLUTION + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_controller_settings_follow_config() {
        let mut config = DroneConfig::default();
        config.start_position = [1.0, 2.0, 3.0];
        config.start_yaw = -45.0;
        config.roll_speed = 90.0;

        let settings = config.controller_settings();
        assert_eq!(settings.home.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(settings.home.yaw, -45.0);
        assert_eq!(settings.roll_speed, 90.0);
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../resources/config/drone.toml");
        let config = ApplicationConfig::load_from_file(path).expect("sample config loads");
        assert_eq!(config, ApplicationConfig::default());
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("drone_engine_config_{}.ron", std::process::id()));
        let mut config = ApplicationConfig::default();
        config.window.title = "Roundtrip".to_string();
        config.save_to_file(&path).expect("save ron");

        let loaded = ApplicationConfig::load_from_file(&path).expect("load ron");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
