//! Animation controller
//!
//! The only writer of a [`DroneModel`]. Owns the propeller speed and the roll
//! state machine; every operation takes the model it mutates, so one
//! controller per drone instance and no shared state.

use crate::drone::model::{DroneModel, PoseDefaults};
use crate::foundation::math::{constants::FULL_TURN_DEG, utils};

/// Speeds and the home pose a controller resets to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Propeller speed at startup and after reset, degrees per second
    pub default_propeller_speed: f32,
    /// Roll speed, degrees per second
    pub roll_speed: f32,
    /// Pose restored by `reset`
    pub home: PoseDefaults,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default_propeller_speed: 180.0,
            roll_speed: 180.0,
            home: PoseDefaults::default(),
        }
    }
}

/// Roll state machine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RollState {
    /// No roll in progress; the model's roll angle reads 0
    #[default]
    Idle,
    /// Rolling, with the degrees turned so far
    Rolling {
        /// Degrees accumulated since the roll started
        elapsed: f32,
    },
}

/// Outcome of one `update_roll` tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollUpdate {
    /// Nothing to do
    Idle,
    /// Still rolling after this tick
    InProgress,
    /// The roll finished on this tick and the angle snapped back to 0
    Completed,
}

/// Drives a [`DroneModel`] over time
#[derive(Debug, Clone)]
pub struct DroneController {
    settings: ControllerSettings,
    propeller_speed: f32,
    roll: RollState,
}

impl Default for DroneController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

impl DroneController {
    /// Create a controller at the default propeller speed, not rolling
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            propeller_speed: settings.default_propeller_speed.max(0.0),
            roll: RollState::Idle,
            settings,
        }
    }

    /// Settings this controller was built with
    pub const fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Current propeller speed in degrees per second
    pub const fn propeller_speed(&self) -> f32 {
        self.propeller_speed
    }

    /// Roll speed in degrees per second
    pub const fn roll_speed(&self) -> f32 {
        self.settings.roll_speed
    }

    /// Current roll state
    pub const fn roll_state(&self) -> RollState {
        self.roll
    }

    /// Whether a roll is in progress
    pub const fn is_rolling(&self) -> bool {
        matches!(self.roll, RollState::Rolling { .. })
    }

    /// Speed the propellers up by `delta` degrees per second
    pub fn increase_propeller_speed(&mut self, delta: f32) {
        self.set_propeller_speed(self.propeller_speed + delta);
    }

    /// Slow the propellers down by `delta`; speed never drops below 0
    pub fn decrease_propeller_speed(&mut self, delta: f32) {
        self.set_propeller_speed(self.propeller_speed - delta);
    }

    fn set_propeller_speed(&mut self, speed: f32) {
        let clamped = speed.max(0.0);
        if clamped != self.propeller_speed {
            log::debug!("Propeller speed {:.1} -> {:.1} deg/s", self.propeller_speed, clamped);
        }
        self.propeller_speed = clamped;
    }

    /// Spin the propellers for `dt` seconds; the angle stays in `[0, 360)`
    pub fn update_propeller_angle(&self, model: &mut DroneModel, dt: f32) {
        let angle = model.propeller_angle() + self.propeller_speed * dt;
        model.set_propeller_angle(utils::wrap_degrees(angle));
    }

    /// Begin a 360 degree roll; does nothing while one is already running
    pub fn start_roll(&mut self, model: &mut DroneModel) {
        if self.is_rolling() {
            log::trace!("start_roll ignored, already rolling");
            return;
        }

        self.roll = RollState::Rolling { elapsed: 0.0 };
        model.set_roll_angle(0.0);
        log::info!("Roll started at {:.0} deg/s", self.settings.roll_speed);
    }

    /// Advance an active roll by `dt` seconds
    pub fn update_roll(&mut self, model: &mut DroneModel, dt: f32) -> RollUpdate {
        let RollState::Rolling { elapsed } = self.roll else {
            return RollUpdate::Idle;
        };

        let step = self.settings.roll_speed * dt;
        let elapsed = elapsed + step;

        if elapsed >= FULL_TURN_DEG {
            self.roll = RollState::Idle;
            model.set_roll_angle(0.0);
            log::info!("Roll completed");
            RollUpdate::Completed
        } else {
            self.roll = RollState::Rolling { elapsed };
            model.set_roll_angle(model.roll_angle() + step);
            RollUpdate::InProgress
        }
    }

    /// Turn about the vertical axis; unbounded
    pub fn turn_yaw(&self, model: &mut DroneModel, degrees: f32) {
        model.set_yaw(model.yaw() + degrees);
    }

    /// Tilt the nose; unbounded, positive tilts down
    pub fn turn_pitch(&self, model: &mut DroneModel, degrees: f32) {
        model.set_pitch(model.pitch() + degrees);
    }

    /// Translate along the facing vector
    pub fn move_forward(&self, model: &mut DroneModel, distance: f32) {
        let position = model.position() + model.facing() * distance;
        model.set_position(position);
    }

    /// Translate against the facing vector
    pub fn move_backward(&self, model: &mut DroneModel, distance: f32) {
        let position = model.position() - model.facing() * distance;
        model.set_position(position);
    }

    /// Restore the home pose, stop any roll and restore the default propeller speed
    pub fn reset(&mut self, model: &mut DroneModel) {
        *model = DroneModel::from_defaults(&self.settings.home);
        self.roll = RollState::Idle;
        self.propeller_speed = self.settings.default_propeller_speed.max(0.0);
        log::info!("Drone reset to {:?}", self.settings.home.position);
    }

    /// Per-frame advance: propellers, then roll
    pub fn update(&mut self, model: &mut DroneModel, dt: f32) -> RollUpdate {
        self.update_propeller_angle(model, dt);
        self.update_roll(model, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn setup() -> (DroneController, DroneModel) {
        (DroneController::default(), DroneModel::default())
    }

    #[test]
    fn test_propeller_speed_never_negative() {
        let (mut controller, _) = setup();
        controller.decrease_propeller_speed(500.0);
        assert_eq!(controller.propeller_speed(), 0.0);

        controller.increase_propeller_speed(25.0);
        assert_eq!(controller.propeller_speed(), 25.0);

        controller.increase_propeller_speed(-100.0);
        assert_eq!(controller.propeller_speed(), 0.0);
    }

    #[test]
    fn test_propeller_angle_wraps_with_true_modulo() {
        let (mut controller, mut model) = setup();
        controller.increase_propeller_speed(10_000.0);

        for dt in [0.0, 0.016, 0.5, 3.7, 100.0] {
            controller.update_propeller_angle(&mut model, dt);
            let angle = model.propeller_angle();
            assert!((0.0..360.0).contains(&angle), "angle {} after dt {}", angle, dt);
        }
    }

    #[test]
    fn test_propeller_angle_closes_after_full_turns() {
        let (controller, mut model) = setup();
        model.set_propeller_angle(30.0);

        // 180 deg/s for 4 s is exactly two turns
        for _ in 0..8 {
            controller.update_propeller_angle(&mut model, 0.5);
        }
        assert_relative_eq!(model.propeller_angle(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_roll_state_machine() {
        let (mut controller, mut model) = setup();
        assert_eq!(controller.update_roll(&mut model, 0.1), RollUpdate::Idle);

        controller.start_roll(&mut model);
        assert_eq!(controller.roll_state(), RollState::Rolling { elapsed: 0.0 });

        assert_eq!(controller.update_roll(&mut model, 1.0), RollUpdate::InProgress);
        assert_relative_eq!(model.roll_angle(), 180.0);

        // Overshooting the boundary snaps to 0 on that tick
        assert_eq!(controller.update_roll(&mut model, 1.01), RollUpdate::Completed);
        assert_eq!(model.roll_angle(), 0.0);
        assert!(!controller.is_rolling());
    }

    #[test]
    fn test_start_roll_while_rolling_keeps_progress() {
        let (mut controller, mut model) = setup();
        controller.start_roll(&mut model);
        controller.update_roll(&mut model, 0.5);

        controller.start_roll(&mut model);
        assert_eq!(controller.roll_state(), RollState::Rolling { elapsed: 90.0 });
        assert_relative_eq!(model.roll_angle(), 90.0);
    }

    #[test]
    fn test_turns_are_unbounded() {
        let (controller, mut model) = setup();
        for _ in 0..10 {
            controller.turn_yaw(&mut model, 100.0);
            controller.turn_pitch(&mut model, -50.0);
        }
        assert_relative_eq!(model.yaw(), 1045.0);
        assert_relative_eq!(model.pitch(), -500.0);
    }

    #[test]
    fn test_move_forward_follows_yaw_then_pitch() {
        let (controller, mut model) = setup();
        model.set_position(Vec3::zeros());
        model.set_yaw(0.0);
        model.set_pitch(90.0);

        controller.move_forward(&mut model, 2.0);
        assert_relative_eq!(model.position(), Vec3::new(0.0, -2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (mut controller, mut model) = setup();
        controller.increase_propeller_speed(90.0);
        controller.start_roll(&mut model);
        controller.update(&mut model, 0.3);
        controller.turn_yaw(&mut model, 33.0);
        controller.move_forward(&mut model, 4.0);

        controller.reset(&mut model);
        assert_eq!(model, DroneModel::default());
        assert_eq!(controller.roll_state(), RollState::Idle);
        assert_eq!(controller.propeller_speed(), 180.0);
    }

    #[test]
    fn test_update_advances_propellers_then_roll() {
        let (mut controller, mut model) = setup();
        controller.start_roll(&mut model);

        assert_eq!(controller.update(&mut model, 0.5), RollUpdate::InProgress);
        assert_relative_eq!(model.propeller_angle(), 90.0);
        assert_relative_eq!(model.roll_angle(), 90.0);
    }
}
