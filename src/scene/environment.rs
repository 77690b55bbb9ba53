use glam::Vec3;

use crate::material::Color;

/// Orthographic shadow volume of the sun.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowCamera {
    /// Half-width of the square shadow volume.
    pub extent: f32,
    pub near: f32,
    pub far: f32,
    pub bias: f32,
    pub normal_bias: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    /// Light travels from this point toward the origin.
    pub position: Vec3,
    pub shadow: ShadowCamera,
}

impl DirectionalLight {
    /// Unit vector pointing from the scene toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
}

/// Sky and global lighting of the square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub sky: Color,
    pub sun: DirectionalLight,
    pub hemisphere: HemisphereLight,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            sky: Color::hex(0x4ca7cb),
            sun: DirectionalLight {
                color: Color::hex(0xfffaf0),
                intensity: 1.2,
                position: Vec3::new(50.0, 100.0, 50.0),
                shadow: ShadowCamera {
                    extent: 70.0,
                    near: 1.0,
                    far: 200.0,
                    bias: -0.001,
                    normal_bias: 0.02,
                },
            },
            hemisphere: HemisphereLight {
                sky: Color::hex(0x87ceeb),
                ground: Color::hex(0x555555),
                intensity: 0.7,
            },
        }
    }
}
