//! First-person walking: damped velocity, square boundaries, and pointer lock.
//!
//! Each tick the velocity first decays, then accelerates along the held
//! intent, and finally moves the camera. Velocity is stored in the camera's
//! local frame with "forward" pointing along -Z, which is why the move step
//! negates both components:
//!
//! ```text
//! v   -= v * damping * dt                 (never overshoots zero)
//! v.x -= dir.x * acceleration * dt        dir = normalize(right - left, 0, forward - backward)
//! v.z -= dir.z * acceleration * dt
//! camera.move_right(-v.x * dt)
//! camera.move_forward(-v.z * dt)
//! clamp y >= eye_height, |x| <= boundary, |z| <= boundary
//! ```
//!
//! Everything after the decay only runs while a direction is held, so
//! leftover momentum is carried into the next keypress rather than drifting
//! the camera. Movement and look only run while the [`InputLock`] is held.

use glam::Vec3;

use crate::camera::Camera;
use crate::input::MovementIntent;

/// Tuning for [`Locomotion`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Fraction of velocity lost per second.
    pub damping: f32,
    /// Units per second squared while a direction is held.
    pub acceleration: f32,
    /// Lowest allowed camera height.
    pub eye_height: f32,
    /// Half-width of the square walkable area centred on the origin.
    pub boundary: f32,
    /// Radians per pixel of pointer motion.
    pub look_sensitivity: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            damping: 5.0,
            acceleration: 40.0,
            eye_height: 2.0,
            boundary: 70.0,
            look_sensitivity: 0.002,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionState {
    /// Horizontal velocity in the camera frame; `y` is always zero.
    pub velocity: Vec3,
    pub intent: MovementIntent,
}

/// Integrates walking input into camera motion.
#[derive(Clone, Debug, Default)]
pub struct Locomotion {
    config: LocomotionConfig,
    state: LocomotionState,
}

impl Locomotion {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            state: LocomotionState::default(),
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn set_intent(&mut self, intent: MovementIntent) {
        self.state.intent = intent;
    }

    /// Advances one frame. Returns `true` if the camera position changed.
    ///
    /// Momentum decays every tick, but the camera only moves while a
    /// direction is held.
    pub fn tick(&mut self, camera: &mut Camera, dt: f32) -> bool {
        let dt = dt.max(0.0);
        let velocity = &mut self.state.velocity;

        let decay = (self.config.damping * dt).min(1.0);
        velocity.x -= velocity.x * decay;
        velocity.z -= velocity.z * decay;

        let intent = self.state.intent;
        if !intent.any() {
            return false;
        }

        let axis = |pos: bool, neg: bool| pos as i32 as f32 - neg as i32 as f32;
        let dir = Vec3::new(
            axis(intent.right, intent.left),
            0.0,
            axis(intent.forward, intent.backward),
        )
        .normalize_or_zero();
        velocity.x -= dir.x * self.config.acceleration * dt;
        velocity.z -= dir.z * self.config.acceleration * dt;

        let before = camera.position;
        camera.move_right(-velocity.x * dt);
        camera.move_forward(-velocity.z * dt);

        let bound = self.config.boundary;
        camera.position.y = camera.position.y.max(self.config.eye_height);
        camera.position.x = camera.position.x.clamp(-bound, bound);
        camera.position.z = camera.position.z.clamp(-bound, bound);

        camera.position != before
    }

    /// Applies pointer motion to the camera. Returns `true` if it turned.
    pub fn look(&self, camera: &mut Camera, dx: f32, dy: f32) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        let s = self.config.look_sensitivity;
        let before = (camera.yaw, camera.pitch);
        camera.rotate(-dx * s, -dy * s);
        (camera.yaw, camera.pitch) != before
    }
}

/// Whether the pointer is captured for first-person control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputLock {
    locked: bool,
}

impl InputLock {
    /// Returns `true` if the lock was not already held.
    pub fn acquire(&mut self) -> bool {
        !std::mem::replace(&mut self.locked, true)
    }

    /// Returns `true` if the lock was held.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.locked, false)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// The instructions shown while the pointer is free.
pub trait Overlay {
    fn set_visible(&mut self, visible: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn walker() -> (Locomotion, Camera) {
        (
            Locomotion::new(LocomotionConfig::default()),
            Camera::new().at(0.0, 2.0, 30.0),
        )
    }

    #[test]
    fn velocity_decays_without_intent() {
        let (mut locomotion, mut camera) = walker();
        locomotion.state.velocity = Vec3::new(3.0, 0.0, -6.0);

        let start = camera.position;
        let mut previous = locomotion.velocity().length();
        for _ in 0..120 {
            assert!(!locomotion.tick(&mut camera, DT));
            assert_eq!(camera.position, start);
            let speed = locomotion.velocity().length();
            assert!(speed < previous);
            previous = speed;
        }
        assert!(previous < 0.01);
    }

    #[test]
    fn large_steps_stop_instead_of_reversing() {
        let (mut locomotion, mut camera) = walker();
        locomotion.state.velocity = Vec3::new(0.0, 0.0, -6.0);
        locomotion.tick(&mut camera, 1.0);
        assert_eq!(locomotion.velocity(), Vec3::ZERO);
    }

    #[test]
    fn forward_intent_walks_toward_negative_z() {
        let (mut locomotion, mut camera) = walker();
        locomotion.set_intent(MovementIntent::FORWARD);
        assert!(locomotion.tick(&mut camera, DT));
        assert!(camera.position.z < 30.0);
        assert!(locomotion.velocity().z < 0.0);
        assert_eq!(camera.position.x, 0.0);
    }

    #[test]
    fn strafing_right_moves_along_camera_right() {
        let (mut locomotion, mut camera) = walker();
        locomotion.set_intent(MovementIntent {
            right: true,
            ..MovementIntent::NONE
        });
        locomotion.tick(&mut camera, DT);
        assert!(camera.position.x > 0.0);
    }

    #[test]
    fn diagonal_intent_is_normalised() {
        let (mut straight, mut a) = walker();
        let (mut diagonal, mut b) = walker();
        straight.set_intent(MovementIntent::FORWARD);
        diagonal.set_intent(MovementIntent {
            forward: true,
            left: true,
            ..MovementIntent::NONE
        });
        straight.tick(&mut a, DT);
        diagonal.tick(&mut b, DT);
        assert!((straight.velocity().length() - diagonal.velocity().length()).abs() < 1e-5);
    }

    #[test]
    fn eye_height_is_a_floor() {
        let (mut locomotion, _) = walker();
        let mut camera = Camera::new().at(0.0, -5.0, 0.0);
        locomotion.set_intent(MovementIntent::FORWARD);
        assert!(locomotion.tick(&mut camera, DT));
        assert_eq!(camera.position.y, 2.0);
    }

    #[test]
    fn momentum_is_kept_for_the_next_keypress() {
        let (mut locomotion, mut camera) = walker();
        locomotion.set_intent(MovementIntent::FORWARD);
        for _ in 0..10 {
            locomotion.tick(&mut camera, DT);
        }
        let walked = camera.position;
        let speed = locomotion.velocity().length();

        locomotion.set_intent(MovementIntent::NONE);
        assert!(!locomotion.tick(&mut camera, DT));
        assert_eq!(camera.position, walked);
        assert!(locomotion.velocity().length() < speed);
        assert!(locomotion.velocity().length() > 0.0);
    }

    #[test]
    fn look_turns_opposite_to_pointer_motion() {
        let (locomotion, mut camera) = walker();
        assert!(locomotion.look(&mut camera, 100.0, 0.0));
        assert!(camera.yaw < 0.0);
        assert!(locomotion.look(&mut camera, 0.0, 100.0));
        assert!(camera.pitch < 0.0);
        assert!(!locomotion.look(&mut camera, 0.0, 0.0));
    }

    #[test]
    fn lock_reports_transitions() {
        let mut lock = InputLock::default();
        assert!(lock.acquire());
        assert!(!lock.acquire());
        assert!(lock.is_locked());
        assert!(lock.release());
        assert!(!lock.release());
    }
}
