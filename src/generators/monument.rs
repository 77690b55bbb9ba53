//! The elephant fountain: a lava-stone elephant on a marble pedestal,
//! carrying a granite obelisk topped with a gilded cross.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6, PI};
use std::rc::Rc;

use super::DetailLevel;
use crate::error::Result;
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::SceneNode;

/// Number of cylinders making up the trunk.
pub const TRUNK_SEGMENTS: u32 = 5;

const TRUNK_LENGTH: f32 = 3.5;
const SEGMENT_LENGTH: f32 = TRUNK_LENGTH / TRUNK_SEGMENTS as f32;
const CURVE_STEP: f32 = 0.15;

/// Pitch and forward offset of trunk segment `index`.
///
/// Both grow with the index so the trunk curls further outward toward the tip.
pub fn trunk_segment_pose(index: u32) -> (f32, f32) {
    let curve = index as f32 * CURVE_STEP;
    (curve, curve * SEGMENT_LENGTH * 1.5)
}

/// Builds the fountain centred on the origin, turned to face the cathedral.
pub fn monument(detail: DetailLevel) -> Result<SceneNode> {
    let marble = Material::standard(Color::hex(0xf0f0f0)).roughness(0.3).shared();
    let skin = Material::standard(Color::hex(0x202020))
        .roughness(0.9)
        .bump_scale(0.02)
        .shared();
    let (body_skin, head_skin) = if detail.is_full() {
        (
            skin.derive(|m| m.bump_scale = Some(0.05)),
            skin.derive(|m| m.bump_scale = Some(0.03)),
        )
    } else {
        (skin.clone(), skin.clone())
    };

    let mut fountain = SceneNode::group("monument")
        .rotated(0.0, PI, 0.0)
        .with_child(
            SceneNode::mesh("pedestal", GeometryDescriptor::cuboid(7.0, 1.0, 7.0), &marble)?
                .at(0.0, 0.5, 0.0)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh("pedestal_mid", GeometryDescriptor::cuboid(6.0, 2.0, 6.0), &marble)?
                .at(0.0, 2.0, 0.0)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh("basin", GeometryDescriptor::cylinder(8.0, 8.0, 0.8, 32), &marble)?
                .at(0.0, 0.4, 0.0)
                .shadows(false, true),
        )
        .with_child(
            SceneNode::mesh("elephant_body", GeometryDescriptor::sphere(2.2, 16, 12), &body_skin)?
                .at(0.0, 4.25, 0.0)
                .scaled(1.0, 0.8, 1.5)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh("elephant_head", GeometryDescriptor::sphere(1.2, 16, 12), &head_skin)?
                .at(0.0, 4.75, 3.2)
                .scaled(1.0, 0.9, 1.2)
                .shadows(true, true),
        );

    for side in [-1.0_f32, 1.0] {
        fountain.add_child(ear(side, &skin, detail)?);
    }
    fountain.add_child(trunk(&skin)?);
    for (x, z) in [(1.3, 1.8), (-1.3, 1.8), (1.3, -1.8), (-1.3, -1.8)] {
        fountain.add_child(leg(x, z, &skin)?);
    }

    if detail.is_full() {
        let eye = Material::standard(Color::BLACK).roughness(0.2).shared();
        let ivory = Material::standard(Color::hex(0xf0f0e0)).roughness(0.3).shared();
        for side in [-1.0_f32, 1.0] {
            fountain.add_child(
                SceneNode::mesh("eye", GeometryDescriptor::sphere(0.15, 8, 8), &eye)?
                    .at(side * 0.7, 5.1, 3.8),
            );
            fountain.add_child(
                SceneNode::mesh("tusk", GeometryDescriptor::cylinder(0.15, 0.1, 1.5, 8), &ivory)?
                    .at(side * 0.6, 4.2, 3.8)
                    .rotated(FRAC_PI_3, 0.0, side * PI / 12.0),
            );
        }
    }

    fountain.add_child(obelisk()?);
    Ok(fountain)
}

fn ear(side: f32, skin: &Rc<Material>, detail: DetailLevel) -> Result<SceneNode> {
    let mut ear = SceneNode::group("ear")
        .at(side * 1.3, 5.0, 3.0)
        .rotated(-FRAC_PI_3, side * FRAC_PI_2, side * PI / 12.0)
        .with_child(SceneNode::mesh(
            "ear_front",
            GeometryDescriptor::circle_arc(1.2, 12, 0.0, PI),
            skin,
        )?)
        .with_child(
            SceneNode::mesh(
                "ear_back",
                GeometryDescriptor::circle_arc(1.1, 12, 0.0, PI),
                skin,
            )?
            .at(0.0, 0.0, -0.1),
        );
    if detail.is_full() {
        ear.add_child(
            SceneNode::mesh(
                "ear_rim",
                GeometryDescriptor::torus(1.15, 0.1, 8, 12, PI),
                skin,
            )?
            .rotated(FRAC_PI_2, 0.0, 0.0),
        );
    }
    Ok(ear)
}

fn trunk(skin: &Rc<Material>) -> Result<SceneNode> {
    let mut trunk = SceneNode::group("trunk")
        .at(0.0, 4.75, 4.2)
        .rotated(FRAC_PI_6, 0.0, 0.0);

    for i in 0..TRUNK_SEGMENTS {
        let radius = 0.5 - i as f32 * 0.06;
        let (pitch, forward) = trunk_segment_pose(i);
        trunk.add_child(
            SceneNode::mesh(
                "trunk_segment",
                GeometryDescriptor::cylinder(radius - 0.05, radius, SEGMENT_LENGTH, 12),
                skin,
            )?
            .at(0.0, -(i as f32) * SEGMENT_LENGTH, forward)
            .rotated(pitch, 0.0, 0.0),
        );
    }

    trunk.add_child(
        SceneNode::mesh("trunk_tip", GeometryDescriptor::sphere(0.2, 8, 8), skin)?
            .at(0.0, -TRUNK_LENGTH, 1.2)
            .scaled(1.0, 1.0, 1.2),
    );
    Ok(trunk)
}

fn leg(x: f32, z: f32, skin: &Rc<Material>) -> Result<SceneNode> {
    // Front legs lean forward, hind legs back.
    let lean = if z > 0.0 { -0.05 } else { 0.05 };
    Ok(SceneNode::group("leg")
        .at(x, 4.25, z)
        .rotated(lean, 0.0, 0.0)
        .with_child(
            SceneNode::mesh("upper_leg", GeometryDescriptor::cylinder(0.7, 0.6, 1.5, 10), skin)?
                .at(0.0, -0.75, 0.0),
        )
        .with_child(
            SceneNode::mesh("knee", GeometryDescriptor::sphere(0.6, 10, 10), skin)?
                .at(0.0, -1.5, 0.0)
                .scaled(1.0, 0.8, 1.0),
        )
        .with_child(
            SceneNode::mesh("lower_leg", GeometryDescriptor::cylinder(0.6, 0.7, 1.5, 10), skin)?
                .at(0.0, -2.25, 0.0),
        )
        .with_child(
            SceneNode::mesh("foot", GeometryDescriptor::sphere(0.7, 10, 10), skin)?
                .at(0.0, -3.0, 0.0)
                .scaled(1.1, 0.6, 1.1),
        ))
}

fn obelisk() -> Result<SceneNode> {
    let granite = Material::standard(Color::hex(0x8c3a1d)).roughness(0.5).shared();
    let gold = Material::standard(Color::hex(0xd4af37))
        .metalness(0.8)
        .roughness(0.2)
        .shared();
    let banding = Material::standard(Color::hex(0xa56b46)).shared();

    let mut obelisk = SceneNode::group("obelisk")
        .with_child(
            SceneNode::mesh("obelisk_shaft", GeometryDescriptor::cuboid(1.2, 8.0, 1.2), &granite)?
                .at(0.0, 9.0, 0.0)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh("obelisk_tip", GeometryDescriptor::cone(0.8, 1.5, 4), &granite)?
                .at(0.0, 13.75, 0.0)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh("cross", GeometryDescriptor::cuboid(0.2, 1.0, 0.2), &gold)?
                .at(0.0, 14.75, 0.0),
        )
        .with_child(
            SceneNode::mesh("cross", GeometryDescriptor::cuboid(0.6, 0.2, 0.2), &gold)?
                .at(0.0, 14.5, 0.0),
        );

    for i in 0..5 {
        obelisk.add_child(
            SceneNode::mesh("obelisk_band", GeometryDescriptor::cuboid(1.3, 0.3, 1.3), &banding)?
                .at(0.0, 6.0 + i as f32 * 2.0, 0.0),
        );
    }
    Ok(obelisk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trunk_curls_monotonically() {
        let poses: Vec<_> = (0..TRUNK_SEGMENTS).map(trunk_segment_pose).collect();
        for pair in poses.windows(2) {
            assert!(pair[1].0 > pair[0].0);
            assert!(pair[1].1 > pair[0].1);
        }
        assert_eq!(poses[0], (0.0, 0.0));
        assert!(poses.iter().all(|(pitch, _)| *pitch < FRAC_PI_2));
    }

    #[test]
    fn trunk_segments_follow_their_pose() {
        let fountain = monument(DetailLevel::Full).unwrap();
        let segments = fountain.find_all("trunk_segment");
        assert_eq!(segments.len(), TRUNK_SEGMENTS as usize);
        for (i, segment) in segments.iter().enumerate() {
            let (_, forward) = trunk_segment_pose(i as u32);
            assert!((segment.transform.position.z - forward).abs() < 1e-6);
            assert!((segment.transform.position.y + i as f32 * SEGMENT_LENGTH).abs() < 1e-6);
        }
    }

    #[test]
    fn simplified_detail_drops_small_parts() {
        let full = monument(DetailLevel::Full).unwrap();
        let simple = monument(DetailLevel::Simplified).unwrap();

        assert_eq!(full.find_all("eye").len(), 2);
        assert_eq!(full.find_all("tusk").len(), 2);
        assert_eq!(full.find_all("ear_rim").len(), 2);
        assert!(simple.find("eye").is_none());
        assert!(simple.find("tusk").is_none());
        assert!(simple.find("ear_rim").is_none());
        assert!(simple.node_count() < full.node_count());
    }

    #[test]
    fn body_and_head_get_their_own_bump() {
        let fountain = monument(DetailLevel::Full).unwrap();
        let bump = |label| {
            fountain
                .find(label)
                .and_then(|n| n.material.as_ref())
                .and_then(|m| m.bump_scale)
        };
        assert_eq!(bump("elephant_body"), Some(0.05));
        assert_eq!(bump("elephant_head"), Some(0.03));
        assert_eq!(bump("upper_leg"), Some(0.02));
    }

    #[test]
    fn faces_the_cathedral() {
        let fountain = monument(DetailLevel::Simplified).unwrap();
        let facing = fountain.transform.rotation * glam::Vec3::Z;
        assert!((facing - glam::Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(fountain.find_all("leg").len(), 4);
        assert_eq!(fountain.find_all("obelisk_band").len(), 5);
    }
}
