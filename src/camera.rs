use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

/// Pitch stays this far inside straight up or down.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// A first-person perspective camera.
///
/// Orientation is yaw about +Y followed by pitch about the local X axis.
/// Yaw `0` looks toward -Z and grows counter-clockwise seen from above, so
/// positive yaw turns left. Pitch `0` is level and positive looks up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov: 75f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where a visitor first stands: at eye height on the south side,
    /// looking up at the fountain.
    pub fn piazza_start(aspect: f32) -> Self {
        let mut camera = Self::new().at(0.0, 2.0, 30.0).with_aspect(aspect);
        camera.look_at(Vec3::new(0.0, 8.0, 0.0));
        camera
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Turns the camera toward `target` without moving it.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = (-dir.x).atan2(-dir.z);
        self.set_pitch(dir.y.asin());
    }

    /// Adds to yaw and pitch, keeping pitch short of the poles.
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.set_pitch(self.pitch + d_pitch);
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Unit vector to the camera's right, always horizontal.
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_yaw, 0.0, -sin_yaw)
    }

    /// Strafes along [`right`](Self::right).
    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    /// Walks along the ground-plane projection of the view direction.
    ///
    /// Pitch has no effect: looking up and walking forward never lifts the camera.
    pub fn move_forward(&mut self, distance: f32) {
        self.position += Vec3::Y.cross(self.right()) * distance;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
