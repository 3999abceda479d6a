//! Gamepad support via gilrs.
//!
//! Sticks feed the tick input (left = move, right = look); face buttons
//! fire one-shot actions the app consumes. A machine without a gamepad
//! backend just reports no pads.

use bean_core::BeanInput;
use gilrs::{Axis, Button, Event, EventType, Gilrs};

/// Stick deflection below this is treated as centered.
const STICK_DEADZONE: f32 = 0.25;

/// Right-stick look rate, in equivalent pointer pixels per second.
const STICK_LOOK_RATE: f32 = 600.0;

/// One-shot actions bound to gamepad buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadAction {
    /// Left trigger: first-person camera.
    FirstPerson,
    /// Right trigger: third-person camera.
    ThirdPerson,
    /// Right thumb: roll a new color.
    Recolor,
    /// Left thumb: (re)connect to the server.
    Connect,
}

pub struct GamepadHandler {
    gilrs: Option<Gilrs>,
    left_stick: (f32, f32),
    right_stick: (f32, f32),
}

impl GamepadHandler {
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(err) => {
                tracing::warn!("gamepad support unavailable: {err}");
                None
            }
        };
        Self {
            gilrs,
            left_stick: (0.0, 0.0),
            right_stick: (0.0, 0.0),
        }
    }

    /// Any pad currently connected? Chooses which controls-help text shows.
    pub fn active(&self) -> bool {
        self.gilrs
            .as_ref()
            .map(|g| g.gamepads().next().is_some())
            .unwrap_or(false)
    }

    /// Drain pending events, returning the one-shot actions they produced.
    pub fn poll(&mut self) -> Vec<GamepadAction> {
        let mut actions = Vec::new();
        let Some(gilrs) = self.gilrs.as_mut() else {
            return actions;
        };

        while let Some(Event { event, .. }) = gilrs.next_event() {
            match event {
                EventType::ButtonPressed(button, _) => match button {
                    Button::LeftTrigger2 => actions.push(GamepadAction::FirstPerson),
                    Button::RightTrigger2 => actions.push(GamepadAction::ThirdPerson),
                    Button::RightThumb => actions.push(GamepadAction::Recolor),
                    Button::LeftThumb => actions.push(GamepadAction::Connect),
                    _ => {}
                },
                EventType::AxisChanged(axis, value, _) => match axis {
                    Axis::LeftStickX => self.left_stick.0 = value,
                    Axis::LeftStickY => self.left_stick.1 = value,
                    Axis::RightStickX => self.right_stick.0 = value,
                    Axis::RightStickY => self.right_stick.1 = value,
                    _ => {}
                },
                EventType::Disconnected => {
                    self.left_stick = (0.0, 0.0);
                    self.right_stick = (0.0, 0.0);
                }
                _ => {}
            }
        }

        actions
    }

    /// Fold stick state into this tick's input.
    pub fn apply_to_input(&self, input: &mut BeanInput, dt: f32) {
        apply_sticks(self.left_stick, self.right_stick, input, dt);
    }
}

impl Default for GamepadHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Stick mapping, split out so it can be tested without a pad.
fn apply_sticks(left: (f32, f32), right: (f32, f32), input: &mut BeanInput, dt: f32) {
    if left.1 > STICK_DEADZONE {
        input.set(BeanInput::FORWARD, true);
    } else if left.1 < -STICK_DEADZONE {
        input.set(BeanInput::BACKWARD, true);
    }
    if left.0 > STICK_DEADZONE {
        input.set(BeanInput::RIGHT, true);
    } else if left.0 < -STICK_DEADZONE {
        input.set(BeanInput::LEFT, true);
    }

    // Right stick: analog look, expressed as pointer-pixel deltas.
    // Stick +Y is up, pointer +Y is down.
    let look_x = if right.0.abs() > STICK_DEADZONE { right.0 } else { 0.0 };
    let look_y = if right.1.abs() > STICK_DEADZONE { right.1 } else { 0.0 };
    if look_x != 0.0 || look_y != 0.0 {
        input.add_look_delta(look_x * STICK_LOOK_RATE * dt, -look_y * STICK_LOOK_RATE * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_filters_drift() {
        let mut input = BeanInput::new();
        apply_sticks((0.1, -0.2), (0.05, 0.0), &mut input, 1.0 / 60.0);
        assert_eq!(input, BeanInput::new());
    }

    #[test]
    fn left_stick_sets_movement_bits() {
        let mut input = BeanInput::new();
        apply_sticks((0.9, 0.8), (0.0, 0.0), &mut input, 1.0 / 60.0);
        assert_eq!(input.forward_axis(), 1);
        assert_eq!(input.strafe_axis(), 1);
    }

    #[test]
    fn right_stick_up_looks_up() {
        let mut input = BeanInput::new();
        apply_sticks((0.0, 0.0), (0.0, 1.0), &mut input, 1.0 / 60.0);
        let (_, dy) = input.look_delta(1.0);
        assert!(dy < 0.0);
    }
}
