use std::f32::consts::{FRAC_PI_2, TAU};

use crate::error::Result;
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::SceneNode;

/// Radius of the paved disc; the walkable area stays inside it.
pub const GROUND_RADIUS: f32 = 75.0;

const INLAY_HEIGHT: f32 = 0.05;
const SPOKES: u32 = 8;
const RING_RADII: [f32; 3] = [25.0, 40.0, 55.0];

/// The paved disc lying in the XZ plane.
pub fn piazza_ground() -> Result<SceneNode> {
    let paving = Material::standard(Color::hex(0x8a8275))
        .roughness(0.8)
        .bump_scale(0.1)
        .shared();
    Ok(
        SceneNode::mesh("ground", GeometryDescriptor::circle(GROUND_RADIUS, 32), &paving)?
            .rotated(-FRAC_PI_2, 0.0, 0.0)
            .shadows(false, true),
    )
}

/// The lighter stone inlay: a centre disc, radial spokes and concentric rings.
pub fn piazza_pattern() -> Result<SceneNode> {
    let inlay = Material::standard(Color::hex(0x9a9285)).roughness(0.7).shared();
    let ring = inlay.derive(|m| m.double_sided = true);

    let mut pattern = SceneNode::group("pattern").with_child(
        SceneNode::mesh("pattern_center", GeometryDescriptor::circle(15.0, 32), &inlay)?
            .at(0.0, INLAY_HEIGHT, 0.0)
            .rotated(-FRAC_PI_2, 0.0, 0.0),
    );

    for i in 0..SPOKES {
        pattern.add_child(
            SceneNode::mesh("pattern_spoke", GeometryDescriptor::plane(60.0, 2.0), &inlay)?
                .at(0.0, INLAY_HEIGHT, 0.0)
                .rotated(-FRAC_PI_2, 0.0, i as f32 / SPOKES as f32 * TAU),
        );
    }

    for radius in RING_RADII {
        pattern.add_child(
            SceneNode::mesh("pattern_ring", GeometryDescriptor::ring(radius - 1.0, radius, 64), &ring)?
                .at(0.0, INLAY_HEIGHT, 0.0)
                .rotated(-FRAC_PI_2, 0.0, 0.0),
        );
    }

    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn ground_lies_flat_and_receives_shadows() {
        let ground = piazza_ground().unwrap();
        let normal = ground.transform.rotation * Vec3::Z;
        assert!((normal - Vec3::Y).length() < 1e-5);
        assert!(ground.receive_shadow);
        assert!(!ground.cast_shadow);
    }

    #[test]
    fn inlay_floats_above_the_ground() {
        let pattern = piazza_pattern().unwrap();
        assert_eq!(pattern.find_all("pattern_spoke").len(), SPOKES as usize);
        assert_eq!(pattern.find_all("pattern_ring").len(), RING_RADII.len());
        assert!(
            pattern
                .children()
                .iter()
                .all(|part| part.transform.position.y == INLAY_HEIGHT)
        );
        let ring = pattern.find("pattern_ring").unwrap();
        assert!(ring.material.as_ref().unwrap().double_sided);
    }
}
