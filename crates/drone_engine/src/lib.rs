//! # Drone Engine
//!
//! Pose, animation and rendering core for a small hand-authored 3D drone.
//!
//! ## Features
//!
//! - **Pose Model**: five animation parameters as the single source of truth
//! - **Animation Controller**: propeller spin, one-shot roll, turning, movement, reset
//! - **Drone Renderer**: declarative part list composed onto the world transform
//! - **Geometry Provider**: unit cube, beveled cube and sphere uploaded once
//! - **OpenGL Backend**: `glow` implementation of the backend seam plus a GLFW window
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drone_engine::prelude::*;
//!
//! let mut model = DroneModel::default();
//! let mut controller = DroneController::new(ControllerSettings::default());
//!
//! controller.start_roll(&mut model);
//! controller.update(&mut model, 0.016);
//! assert!(controller.is_rolling());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod render;
pub mod drone;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, CameraConfig, ControlConfig, DroneConfig, WindowConfig},
        config::{Config, ConfigError},
        drone::{
            DroneController, DroneModel, DroneView, ControllerSettings, RollState, RollUpdate,
            layout::{DroneLayout, PartSpec},
        },
        foundation::{
            math::{Vec3, Mat4, Mat4Ext},
            time::Timer,
        },
        render::{
            Camera, CameraMode, CameraRig, GeometryProvider, GraphicsBackend, MeshHandle, RenderError,
            Shape, ShapeMesh, ShaderHandle, Topology,
        },
    };
}
