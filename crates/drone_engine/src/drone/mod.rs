//! # Drone
//!
//! Model / View / Controller split of one drone instance:
//!
//! - [`DroneModel`]: the five pose parameters, plain data
//! - [`DroneController`]: the only writer, advancing the model over time
//! - [`DroneView`]: the only reader, drawing the layout's parts

pub mod model;
pub mod controller;
pub mod layout;
pub mod view;

#[cfg(test)]
mod tests;

pub use controller::{ControllerSettings, DroneController, RollState, RollUpdate};
pub use layout::{DroneLayout, PartSpec, SpinRecipe};
pub use model::{DroneModel, PoseDefaults};
pub use view::DroneView;
