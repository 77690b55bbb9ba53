use std::f32::consts::{FRAC_PI_2, TAU};

use crate::error::{Result, SceneError};
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::{PointLight, SceneNode};

pub const DEFAULT_LAMP_ARMS: u32 = 5;

const ARM_HEIGHT: f32 = 7.5;
const GLOBE_REACH: f32 = 1.8;
const GLOBE_LIFT: f32 = 0.8;

/// A cast-iron street lamp with `arms` lit arms spread evenly around the pole.
///
/// Arm `i` points at `angle = i / arms * 2π` (measured from +X toward +Z) and
/// ends in an emissive globe with a point light at the same position.
pub fn street_lamp(x: f32, z: f32, arms: u32) -> Result<SceneNode> {
    if arms == 0 {
        return Err(SceneError::InvalidParameter(
            "a street lamp needs at least one arm".into(),
        ));
    }

    let iron = Material::standard(Color::hex(0x2a2a2a)).shared();
    let globe = Material::standard(Color::hex(0xffffee))
        .emissive(Color::hex(0xffffaa), 0.5)
        .opacity(0.9)
        .shared();
    let light = PointLight {
        color: Color::hex(0xffd28a),
        intensity: 0.5,
        range: 10.0,
    };

    let mut lamp = SceneNode::group("street_lamp")
        .at(x, 0.0, z)
        .with_child(
            SceneNode::mesh("lamp_base", GeometryDescriptor::cylinder(0.8, 1.0, 0.5, 8), &iron)?
                .at(0.0, 0.25, 0.0),
        )
        .with_child(
            SceneNode::mesh("lamp_pole", GeometryDescriptor::cylinder(0.3, 0.4, 7.0, 8), &iron)?
                .at(0.0, 4.0, 0.0),
        )
        .with_child(
            SceneNode::mesh("lamp_decor", GeometryDescriptor::sphere(0.5, 8, 8), &iron)?
                .at(0.0, 6.0, 0.0),
        );

    for i in 0..arms {
        let angle = i as f32 / arms as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        let globe_x = cos * GLOBE_REACH;
        let globe_y = ARM_HEIGHT + GLOBE_LIFT;
        let globe_z = sin * GLOBE_REACH;

        let arm = SceneNode::group("lamp_arm")
            .with_child(
                SceneNode::mesh("arm_rod", GeometryDescriptor::cylinder(0.1, 0.1, 2.0, 8), &iron)?
                    .at(cos * 0.3, ARM_HEIGHT, sin * 0.3)
                    .rotated(0.0, angle, FRAC_PI_2 - 0.2),
            )
            .with_child(
                SceneNode::mesh("globe", GeometryDescriptor::sphere(0.4, 8, 8), &globe)?
                    .at(globe_x, globe_y, globe_z),
            )
            .with_child(SceneNode::point_light("globe_light", light).at(globe_x, globe_y, globe_z));
        lamp.add_child(arm);
    }

    Ok(lamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_arms() {
        assert!(street_lamp(0.0, 0.0, 0).is_err());
    }

    #[test]
    fn three_arms_are_evenly_spread() {
        let lamp = street_lamp(0.0, 0.0, 3).unwrap();
        let rods = lamp.find_all("arm_rod");
        assert_eq!(rods.len(), 3);
        let angle = |p: glam::Vec3| p.z.atan2(p.x).rem_euclid(TAU);
        assert!((angle(rods[1].transform.position) - TAU / 3.0).abs() < 1e-4);
        assert!((angle(rods[2].transform.position) - 2.0 * TAU / 3.0).abs() < 1e-4);
    }

    #[test]
    fn globes_glow() {
        let lamp = street_lamp(0.0, 0.0, DEFAULT_LAMP_ARMS).unwrap();
        let globe = lamp.find("globe").unwrap();
        let material = globe.material.as_ref().unwrap();
        assert_eq!(material.emissive_intensity, 0.5);
        assert!(material.transparent);
    }
}
