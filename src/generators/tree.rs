use crate::error::Result;
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::SceneNode;

/// Canopy spheres as `(x, y, z, radius)` relative to the tree base.
pub const FOLIAGE: [(f32, f32, f32, f32); 6] = [
    (0.0, 4.0, 0.0, 1.8),
    (1.0, 3.8, 0.0, 1.5),
    (-1.0, 3.7, 0.0, 1.5),
    (0.0, 3.9, 1.0, 1.5),
    (0.0, 3.8, -1.0, 1.5),
    (0.0, 5.2, 0.0, 1.5),
];

/// A trunk capped by overlapping foliage spheres.
pub fn tree(x: f32, z: f32) -> Result<SceneNode> {
    let bark = Material::standard(Color::hex(0x8b4513)).shared();
    let leaves = Material::standard(Color::hex(0x3a5f0b)).shared();

    let mut tree = SceneNode::group("tree").at(x, 0.0, z).with_child(
        SceneNode::mesh("trunk", GeometryDescriptor::cylinder(0.5, 0.7, 3.0, 8), &bark)?
            .at(0.0, 1.5, 0.0)
            .shadows(true, true),
    );

    for (fx, fy, fz, radius) in FOLIAGE {
        tree.add_child(
            SceneNode::mesh("foliage", GeometryDescriptor::sphere(radius, 8, 8), &leaves)?
                .at(fx, fy, fz)
                .shadows(true, true),
        );
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canopy_has_six_spheres_above_the_trunk() {
        let tree = tree(35.0, -35.0).unwrap();
        let foliage = tree.find_all("foliage");
        assert_eq!(foliage.len(), FOLIAGE.len());
        assert!(foliage.iter().all(|f| f.transform.position.y > 3.0));
        assert_eq!(tree.transform.position, glam::Vec3::new(35.0, 0.0, -35.0));
    }
}
