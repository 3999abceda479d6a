//! Keyboard and pointer input handling.
//!
//! Converts winit events into the tick input the controller consumes.
//! Held keys persist across ticks; pointer motion accumulates and is
//! drained once per tick.

use bean_core::BeanInput;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks current input state and converts it to `BeanInput`.
#[derive(Debug, Default)]
pub struct InputHandler {
    current: BeanInput,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a key event and update held bits.
    pub fn process_key(&mut self, key: PhysicalKey, state: ElementState) {
        let held = state == ElementState::Pressed;

        let flag = match key {
            PhysicalKey::Code(KeyCode::KeyW) => Some(BeanInput::FORWARD),
            PhysicalKey::Code(KeyCode::KeyS) => Some(BeanInput::BACKWARD),
            PhysicalKey::Code(KeyCode::KeyA) => Some(BeanInput::LEFT),
            PhysicalKey::Code(KeyCode::KeyD) => Some(BeanInput::RIGHT),
            PhysicalKey::Code(KeyCode::Space) => Some(BeanInput::UP),
            PhysicalKey::Code(KeyCode::ControlLeft) => Some(BeanInput::DOWN),
            PhysicalKey::Code(KeyCode::ArrowLeft) => Some(BeanInput::LOOK_LEFT),
            PhysicalKey::Code(KeyCode::ArrowRight) => Some(BeanInput::LOOK_RIGHT),
            PhysicalKey::Code(KeyCode::ArrowUp) => Some(BeanInput::LOOK_UP),
            PhysicalKey::Code(KeyCode::ArrowDown) => Some(BeanInput::LOOK_DOWN),
            _ => None,
        };

        if let Some(flag) = flag {
            self.current.set(flag, held);
        }
    }

    /// Accumulate raw pointer motion (from device events while captured).
    pub fn process_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.current.add_look_delta(dx as f32, dy as f32);
    }

    /// Input for this tick; drains the accumulated look delta.
    pub fn take_tick_input(&mut self) -> BeanInput {
        let out = self.current;
        self.current.clear_look();
        out
    }

    /// Drop everything (e.g. on focus loss or screen change).
    pub fn reset(&mut self) {
        self.current = BeanInput::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_mapping() {
        let mut handler = InputHandler::new();

        handler.process_key(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
        handler.process_key(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed);
        let input = handler.take_tick_input();
        assert_eq!(input.forward_axis(), 1);
        assert_eq!(input.vertical_axis(), 1);

        handler.process_key(PhysicalKey::Code(KeyCode::KeyW), ElementState::Released);
        let input = handler.take_tick_input();
        assert_eq!(input.forward_axis(), 0);
        assert_eq!(input.vertical_axis(), 1);
    }

    #[test]
    fn mouse_motion_drains_per_tick() {
        let mut handler = InputHandler::new();
        handler.process_mouse_motion(4.0, -2.0);
        handler.process_mouse_motion(1.0, 0.0);

        let input = handler.take_tick_input();
        let (dx, dy) = input.look_delta(1.0);
        assert!((dx - 5.0).abs() < 0.01);
        assert!((dy + 2.0).abs() < 0.01);

        let next = handler.take_tick_input();
        assert_eq!(next.look_dx, 0);
        assert_eq!(next.look_dy, 0);
    }

    #[test]
    fn arrows_map_to_look_bits() {
        let mut handler = InputHandler::new();
        handler.process_key(PhysicalKey::Code(KeyCode::ArrowRight), ElementState::Pressed);
        let input = handler.take_tick_input();
        assert_eq!(input.look_yaw_axis(), 1);
    }

    #[test]
    fn reset_clears_held_keys() {
        let mut handler = InputHandler::new();
        handler.process_key(PhysicalKey::Code(KeyCode::KeyA), ElementState::Pressed);
        handler.reset();
        assert_eq!(handler.take_tick_input(), BeanInput::new());
    }
}
