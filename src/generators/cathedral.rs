use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::{DetailLevel, window};
use crate::error::Result;
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::SceneNode;

const FACADE_Z: f32 = 10.5;
const COLUMN_HEIGHT: f32 = 20.0;
const COLUMN_Y: f32 = 15.0;
const STEP_COUNT: u32 = 5;
const STEP_DEPTH: f32 = 1.5;
const MAIN_DOOR: (f32, f32) = (6.0, 12.0);

/// The baroque cathedral on the north side of the square, facing +Z.
///
/// The group sits at `(0, 0, -40)`; every part position below is relative to it.
pub fn cathedral(detail: DetailLevel) -> Result<SceneNode> {
    let stone = Material::standard(Color::hex(0xe0d5cb))
        .roughness(0.9)
        .metalness(0.1)
        .shared();
    let facade = Material::standard(Color::hex(0xe8e0d5)).roughness(0.85).shared();
    let steps = Material::standard(Color::hex(0xd5d0c8)).roughness(0.6).shared();
    let wood = Material::standard(Color::hex(0x5d2a14)).roughness(0.5).shared();
    let copper = Material::standard(Color::hex(0xd8c0a8)).roughness(0.4).shared();

    let mut cathedral = SceneNode::group("cathedral")
        .at(0.0, 0.0, -40.0)
        .with_child(
            SceneNode::mesh("nave", GeometryDescriptor::cuboid(40.0, 25.0, 20.0), &stone)?
                .at(0.0, 12.5, 0.0)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh("facade", GeometryDescriptor::cuboid(30.0, 35.0, 1.5), &facade)?
                .at(0.0, 17.5, FACADE_Z)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh("upper_facade", GeometryDescriptor::cuboid(20.0, 10.0, 1.0), &facade)?
                .at(0.0, 35.0, FACADE_Z)
                .shadows(true, true),
        )
        .with_child(
            SceneNode::mesh(
                "pediment",
                GeometryDescriptor::cylinder_arc(10.0, 10.0, 8.0, 3, true, 0.0, TAU),
                &facade,
            )?
            .at(0.0, 42.0, FACADE_Z)
            .rotated(0.0, 0.0, PI)
            .scaled(1.0, 1.0, 0.2)
            .shadows(true, true),
        );

    for i in [-3.0_f32, -1.0, 1.0, 3.0] {
        let x = i * 4.0;
        cathedral.add_child(
            SceneNode::mesh("column", GeometryDescriptor::cuboid(2.0, COLUMN_HEIGHT, 2.0), &facade)?
                .at(x, COLUMN_Y, 11.5)
                .shadows(true, true),
        );
        cathedral.add_child(
            SceneNode::mesh("capital", GeometryDescriptor::cuboid(3.0, 1.5, 3.0), &facade)?
                .at(x, COLUMN_Y + COLUMN_HEIGHT / 2.0 + 0.75, 11.5),
        );
        cathedral.add_child(
            SceneNode::mesh("column_base", GeometryDescriptor::cuboid(2.5, 1.0, 2.5), &facade)?
                .at(x, COLUMN_Y - COLUMN_HEIGHT / 2.0 - 0.5, 11.5),
        );
    }

    if detail.is_full() {
        let statue = Material::standard(Color::hex(0xf0f0f0)).roughness(0.5).shared();
        for i in [-4.0_f32, -2.0, 2.0, 4.0] {
            cathedral.add_child(
                SceneNode::mesh("statue_base", GeometryDescriptor::cuboid(1.5, 1.0, 1.5), &facade)?
                    .at(i * 3.0, 40.0, FACADE_Z),
            );
            cathedral.add_child(
                SceneNode::mesh("statue", GeometryDescriptor::cylinder(0.3, 0.5, 3.0, 8), &statue)?
                    .at(i * 3.0, 42.0, FACADE_Z),
            );
        }
    }

    let mut stairs = SceneNode::group("steps");
    for i in 0..STEP_COUNT {
        let i = i as f32;
        stairs.add_child(
            SceneNode::mesh(
                "step",
                GeometryDescriptor::cuboid(35.0 - i * 2.0, 0.8, STEP_DEPTH),
                &steps,
            )?
            .at(0.0, 0.4 + i * 0.8, 11.0 - i * STEP_DEPTH / 2.0)
            .shadows(true, true),
        );
    }
    cathedral.add_child(stairs);

    let (door_w, door_h) = MAIN_DOOR;
    cathedral.add_child(
        SceneNode::mesh("main_door", GeometryDescriptor::cuboid(door_w, door_h, 0.5), &wood)?
            .at(0.0, door_h / 2.0, 11.3),
    );
    cathedral.add_child(
        SceneNode::mesh(
            "door_arch",
            GeometryDescriptor::cylinder_arc(door_w / 2.0, door_w / 2.0, 1.0, 32, false, 0.0, PI),
            &facade,
        )?
        .at(0.0, door_h + 0.5, 11.3)
        .rotated(FRAC_PI_2, 0.0, 0.0),
    );
    if detail.is_full() {
        for x in [-10.0, 10.0] {
            cathedral.add_child(
                SceneNode::mesh("side_door", GeometryDescriptor::cuboid(4.0, 8.0, 0.5), &wood)?
                    .at(x, 4.0, 11.3),
            );
        }
    }

    cathedral.add_child(
        SceneNode::mesh(
            "dome",
            GeometryDescriptor::sphere_section(8.0, 16, 16, 0.0, TAU, 0.0, FRAC_PI_2),
            &copper,
        )?
        .at(-15.0, 30.0, -5.0)
        .shadows(true, true),
    );
    cathedral.add_child(
        SceneNode::mesh("lantern", GeometryDescriptor::cylinder(2.0, 2.0, 3.0, 16), &facade)?
            .at(-15.0, 34.0, -5.0)
            .shadows(true, true),
    );
    cathedral.add_child(
        SceneNode::mesh("drum", GeometryDescriptor::cylinder(9.0, 9.0, 5.0, 16), &stone)?
            .at(-15.0, 26.0, -5.0)
            .shadows(true, true),
    );

    for i in [-2.0_f32, -1.0, 1.0, 2.0] {
        cathedral.add_child(window(i * 5.0, 26.0, 11.3, 2.5, 4.0)?);
    }

    Ok(cathedral)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_climb_toward_the_facade() {
        let cathedral = cathedral(DetailLevel::Full).unwrap();
        let steps = cathedral.find_all("step");
        assert_eq!(steps.len(), STEP_COUNT as usize);
        let width = |step: &SceneNode| match step.geometry {
            Some(GeometryDescriptor::Cuboid { width, .. }) => width,
            ref other => panic!("step is not a cuboid: {other:?}"),
        };
        for pair in steps.windows(2) {
            let (lower, upper) = (pair[0].transform.position, pair[1].transform.position);
            assert!(upper.y > lower.y);
            assert!(upper.z < lower.z);
            assert!(width(pair[1]) < width(pair[0]), "each step is narrower");
        }
    }

    #[test]
    fn facade_has_four_columns_and_windows() {
        let cathedral = cathedral(DetailLevel::Simplified).unwrap();
        assert_eq!(cathedral.find_all("column").len(), 4);
        assert_eq!(cathedral.find_all("capital").len(), 4);
        assert_eq!(cathedral.find_all("window_group").len(), 4);
        assert!(cathedral.find("statue").is_none());
        assert!(cathedral.find("side_door").is_none());
    }

    #[test]
    fn full_detail_adds_statues_and_side_doors() {
        let cathedral = cathedral(DetailLevel::Full).unwrap();
        assert_eq!(cathedral.find_all("statue").len(), 4);
        assert_eq!(cathedral.find_all("side_door").len(), 2);
        let capital = cathedral.find("capital").unwrap();
        assert_eq!(capital.transform.position.y, 25.75);
    }
}
