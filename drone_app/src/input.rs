//! Keyboard mapping
//!
//! Keys are polled once per frame into a [`KeySnapshot`]; [`apply_input`]
//! turns a snapshot into controller calls. The mapping itself never touches
//! the window, so it is tested with hand-built snapshots.
//!
//! | Key        | Action                                     |
//! |------------|--------------------------------------------|
//! | F / D      | propeller speed up / down                  |
//! | S          | start a roll                               |
//! | = / -      | move forward / backward                    |
//! | Left/Right | yaw - / +                                  |
//! | Up/Down    | pitch + / -                                |
//! | R          | reset                                      |
//! | 1 / 2 / 3  | angled / chopper / first-person camera     |
//! | Escape     | quit                                       |

use drone_engine::core::config::ControlConfig;
use drone_engine::drone::{DroneController, DroneModel};
use drone_engine::render::{CameraMode, WindowHandle};
use glfw::Key;

/// Held state of every key the viewer reacts to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeySnapshot {
    pub escape: bool,
    pub speed_up: bool,
    pub speed_down: bool,
    pub roll: bool,
    pub forward: bool,
    pub backward: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub reset: bool,
    pub camera_angled: bool,
    pub camera_chopper: bool,
    pub camera_first_person: bool,
}

impl KeySnapshot {
    /// Poll the window for the current key state
    pub fn capture(window: &WindowHandle) -> Self {
        let held = |key| window.is_key_pressed(key);
        Self {
            escape: held(Key::Escape),
            speed_up: held(Key::F),
            speed_down: held(Key::D),
            roll: held(Key::S),
            forward: held(Key::Equal),
            backward: held(Key::Minus),
            yaw_left: held(Key::Left),
            yaw_right: held(Key::Right),
            pitch_up: held(Key::Up),
            pitch_down: held(Key::Down),
            reset: held(Key::R),
            camera_angled: held(Key::Num1),
            camera_chopper: held(Key::Num2),
            camera_first_person: held(Key::Num3),
        }
    }
}

/// What the host has to do after input was applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// Close the window at the end of this frame
    pub quit: bool,
    /// Switch to this camera
    pub camera: Option<CameraMode>,
}

/// Apply one frame of held keys to the drone
///
/// Rates are scaled by `dt`. Movement distance uses the propeller speed after
/// this frame's speed change, `speed * move_factor * dt`.
pub fn apply_input(
    keys: &KeySnapshot,
    controls: &ControlConfig,
    controller: &mut DroneController,
    model: &mut DroneModel,
    dt: f32,
) -> InputOutcome {
    if keys.speed_up {
        controller.increase_propeller_speed(controls.propeller_accel * dt);
    }
    if keys.speed_down {
        controller.decrease_propeller_speed(controls.propeller_accel * dt);
    }

    if keys.roll {
        controller.start_roll(model);
    }

    let distance = controller.propeller_speed() * controls.move_factor * dt;
    if keys.forward {
        controller.move_forward(model, distance);
    }
    if keys.backward {
        controller.move_backward(model, distance);
    }

    let turn = controls.turn_rate * dt;
    if keys.yaw_left {
        controller.turn_yaw(model, -turn);
    }
    if keys.yaw_right {
        controller.turn_yaw(model, turn);
    }
    if keys.pitch_up {
        controller.turn_pitch(model, turn);
    }
    if keys.pitch_down {
        controller.turn_pitch(model, -turn);
    }

    if keys.reset {
        controller.reset(model);
    }

    // Highest number wins when several are held
    let camera = if keys.camera_first_person {
        Some(CameraMode::FirstPerson)
    } else if keys.camera_chopper {
        Some(CameraMode::Chopper)
    } else if keys.camera_angled {
        Some(CameraMode::Angled)
    } else {
        None
    };

    InputOutcome {
        quit: keys.escape,
        camera,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use drone_engine::foundation::math::Vec3;

    fn setup() -> (ControlConfig, DroneController, DroneModel) {
        (ControlConfig::default(), DroneController::default(), DroneModel::default())
    }

    #[test]
    fn test_no_keys_changes_nothing() {
        let (controls, mut controller, mut model) = setup();
        let outcome = apply_input(&KeySnapshot::default(), &controls, &mut controller, &mut model, 0.1);

        assert_eq!(outcome, InputOutcome::default());
        assert_eq!(model, DroneModel::default());
        assert_eq!(controller.propeller_speed(), 180.0);
    }

    #[test]
    fn test_speed_keys_scale_with_dt() {
        let (controls, mut controller, mut model) = setup();
        let keys = KeySnapshot { speed_up: true, ..KeySnapshot::default() };
        apply_input(&keys, &controls, &mut controller, &mut model, 0.5);
        assert_relative_eq!(controller.propeller_speed(), 205.0);

        let keys = KeySnapshot { speed_down: true, ..KeySnapshot::default() };
        for _ in 0..20 {
            apply_input(&keys, &controls, &mut controller, &mut model, 1.0);
        }
        assert_eq!(controller.propeller_speed(), 0.0);
    }

    #[test]
    fn test_arrow_keys_turn() {
        let (controls, mut controller, mut model) = setup();
        let keys = KeySnapshot { yaw_left: true, pitch_up: true, ..KeySnapshot::default() };
        apply_input(&keys, &controls, &mut controller, &mut model, 0.5);

        assert_relative_eq!(model.yaw(), 0.0);
        assert_relative_eq!(model.pitch(), 45.0);
    }

    #[test]
    fn test_forward_distance_follows_propeller_speed() {
        let (controls, mut controller, mut model) = setup();
        model.set_yaw(0.0);
        let keys = KeySnapshot { forward: true, ..KeySnapshot::default() };

        // 180 deg/s * 0.01 * 1 s
        apply_input(&keys, &controls, &mut controller, &mut model, 1.0);
        assert_relative_eq!(model.position(), Vec3::new(0.0, 1.0, 1.8), epsilon = 1e-5);

        // Stopped propellers do not move the drone
        controller.decrease_propeller_speed(1000.0);
        apply_input(&keys, &controls, &mut controller, &mut model, 1.0);
        assert_relative_eq!(model.position(), Vec3::new(0.0, 1.0, 1.8), epsilon = 1e-5);
    }

    #[test]
    fn test_roll_key_held_does_not_restart() {
        let (controls, mut controller, mut model) = setup();
        let keys = KeySnapshot { roll: true, ..KeySnapshot::default() };

        apply_input(&keys, &controls, &mut controller, &mut model, 0.1);
        controller.update_roll(&mut model, 0.5);
        apply_input(&keys, &controls, &mut controller, &mut model, 0.1);

        assert!(controller.is_rolling());
        assert_relative_eq!(model.roll_angle(), 90.0);
    }

    #[test]
    fn test_reset_and_camera_and_quit() {
        let (controls, mut controller, mut model) = setup();
        model.set_position(Vec3::new(5.0, 5.0, 5.0));

        let keys = KeySnapshot {
            reset: true,
            camera_chopper: true,
            escape: true,
            ..KeySnapshot::default()
        };
        let outcome = apply_input(&keys, &controls, &mut controller, &mut model, 0.016);

        assert_eq!(model, DroneModel::default());
        assert_eq!(outcome.camera, Some(CameraMode::Chopper));
        assert!(outcome.quit);
    }
}
