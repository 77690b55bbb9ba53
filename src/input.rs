use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The four walking directions, sampled from held keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementIntent {
    pub const NONE: MovementIntent = MovementIntent {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };

    pub const FORWARD: MovementIntent = MovementIntent {
        forward: true,
        ..MovementIntent::NONE
    };

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Tracks keyboard and pointer state.
///
/// Window events feed it through [`handle_event`](Self::handle_event); tests
/// and headless hosts drive it directly with [`press`](Self::press) and
/// [`release`](Self::release).
#[derive(Debug, Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    mouse_delta: Vec2,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(key) = event.physical_key {
                match event.state {
                    ElementState::Pressed => self.press(key),
                    ElementState::Released => self.release(key),
                }
            }
        }
    }

    /// Accumulates raw pointer motion (device event, unaffected by cursor grab).
    pub fn add_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta += Vec2::new(dx as f32, dy as f32);
    }

    /// Returns and clears the pointer motion gathered since the last call.
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// WASD and the arrow keys mapped to walking directions.
    pub fn intent(&self) -> MovementIntent {
        let held = |a, b| self.key_down(a) || self.key_down(b);
        MovementIntent {
            forward: held(KeyCode::KeyW, KeyCode::ArrowUp),
            backward: held(KeyCode::KeyS, KeyCode::ArrowDown),
            left: held(KeyCode::KeyA, KeyCode::ArrowLeft),
            right: held(KeyCode::KeyD, KeyCode::ArrowRight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_share_intents() {
        let mut input = Input::new();
        input.press(KeyCode::ArrowUp);
        input.press(KeyCode::KeyD);
        assert_eq!(
            input.intent(),
            MovementIntent {
                forward: true,
                right: true,
                ..MovementIntent::NONE
            }
        );

        input.release(KeyCode::ArrowUp);
        input.press(KeyCode::KeyS);
        let intent = input.intent();
        assert!(!intent.forward && intent.backward && intent.right);
    }

    #[test]
    fn repeated_presses_hold_until_released() {
        let mut input = Input::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::KeyW);
        assert!(input.key_down(KeyCode::KeyW));
        input.release(KeyCode::KeyW);
        assert!(!input.key_down(KeyCode::KeyW));
        assert!(!input.intent().any());
    }

    #[test]
    fn mouse_delta_drains() {
        let mut input = Input::new();
        input.add_mouse_motion(3.0, -1.0);
        input.add_mouse_motion(2.0, 4.0);
        assert_eq!(input.take_mouse_delta(), Vec2::new(5.0, 3.0));
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn release_all_clears_intent() {
        let mut input = Input::new();
        input.press(KeyCode::KeyA);
        input.release_all();
        assert!(!input.intent().any());
    }
}
