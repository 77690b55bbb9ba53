use std::f32::consts::PI;

use super::window;
use crate::error::Result;
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::SceneNode;

const BAYS: u32 = 5;
const BAY_SPACING: f32 = 8.0;

/// Which side of the cathedral a courtyard wing flanks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourtyardSide {
    Left,
    Right,
}

impl CourtyardSide {
    /// Direction the arcade runs away from the cathedral along X.
    fn outward(self) -> f32 {
        match self {
            CourtyardSide::Left => -1.0,
            CourtyardSide::Right => 1.0,
        }
    }

    pub fn center_x(self) -> f32 {
        self.outward() * 55.0
    }
}

/// An arcaded wing beside the cathedral: columns with half-torus arches,
/// an upper floor with a cornice and windows, and four potted plants.
pub fn courtyard(side: CourtyardSide) -> Result<SceneNode> {
    let plaster = Material::standard(Color::hex(0xe8d8c8)).roughness(0.7).shared();
    let terracotta = Material::standard(Color::hex(0x8b4513)).shared();
    let leaves = Material::standard(Color::hex(0x2d5a27)).shared();
    let outward = side.outward();

    let mut wing = SceneNode::group("courtyard").at(side.center_x(), 0.0, -40.0);

    for i in 0..BAYS {
        let x = outward * i as f32 * BAY_SPACING;
        wing.add_child(
            SceneNode::mesh("arcade_column", GeometryDescriptor::cylinder(0.8, 0.8, 8.0, 12), &plaster)?
                .at(x, 4.0, 0.0),
        );
        wing.add_child(
            SceneNode::mesh("arch", GeometryDescriptor::torus(4.0, 0.8, 12, 12, PI), &plaster)?
                .at(x, 8.0, 0.0)
                .rotated(0.0, 0.0, PI / 2.0),
        );
    }

    wing.add_child(
        SceneNode::mesh("upper_floor", GeometryDescriptor::cuboid(40.0, 10.0, 15.0), &plaster)?
            .at(0.0, 13.0, 0.0),
    );

    let mut details = SceneNode::group("courtyard_details").with_child(
        SceneNode::mesh("cornice", GeometryDescriptor::cuboid(42.0, 0.5, 2.5), &plaster)?
            .at(0.0, 18.0, 0.0),
    );
    for i in 0..BAYS {
        let x = outward * (i as f32 * BAY_SPACING - 16.0);
        details.add_child(window(x, 13.0, 8.0, 2.0, 3.0)?);
    }
    wing.add_child(details);

    for (dx, dz) in [(-10.0, 10.0), (-10.0, -10.0), (10.0, 10.0), (10.0, -10.0)] {
        wing.add_child(
            SceneNode::mesh("pot", GeometryDescriptor::cylinder(1.0, 0.8, 1.5, 8), &terracotta)?
                .at(dx, 0.75, dz),
        );
        wing.add_child(
            SceneNode::mesh("plant", GeometryDescriptor::sphere(1.2, 8, 8), &leaves)?
                .at(dx, 2.0, dz),
        );
    }

    Ok(wing)
}
