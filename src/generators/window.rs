use crate::error::Result;
use crate::geometry::GeometryDescriptor;
use crate::material::{Color, Material};
use crate::scene::SceneNode;

/// Glass draws after opaque parts of the same window.
pub const GLASS_RENDER_ORDER: i32 = 1;

/// A recessed window: a stone recess, a frame, and a glass pane.
///
/// The group's origin is the outer face of the wall; every part sits behind it.
/// The pane is coplanar-adjacent to the frame, so it carries a negative depth
/// offset, skips depth writes, and draws with [`GLASS_RENDER_ORDER`].
pub fn window(x: f32, y: f32, z: f32, width: f32, height: f32) -> Result<SceneNode> {
    let recess = Material::standard(Color::hex(0xd5d0c8)).roughness(0.8).shared();
    let frame = Material::standard(Color::hex(0xe0d5c0)).roughness(0.6).shared();
    let glass = Material::standard(Color::hex(0x87cefa))
        .metalness(0.3)
        .roughness(0.2)
        .transmission(0.9)
        .transparent()
        .depth_write(false)
        .depth_offset(-1.0, -1.0)
        .shared();

    Ok(SceneNode::group("window_group")
        .at(x, y, z)
        .with_child(
            SceneNode::mesh(
                "window_recess",
                GeometryDescriptor::cuboid(width + 0.4, height + 0.4, 0.3),
                &recess,
            )?
            .at(0.0, 0.0, -0.15),
        )
        .with_child(
            SceneNode::mesh(
                "window_frame",
                GeometryDescriptor::cuboid(width + 0.2, height + 0.2, 0.1),
                &frame,
            )?
            .at(0.0, 0.0, -0.05),
        )
        .with_child(
            SceneNode::mesh("window_glass", GeometryDescriptor::plane(width, height), &glass)?
                .at(0.0, 0.0, -0.1)
                .render_order(GLASS_RENDER_ORDER),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glass_is_biased_toward_the_viewer() {
        let node = window(5.0, 26.0, 11.3, 2.5, 4.0).unwrap();
        let glass = node.find("window_glass").unwrap();
        let material = glass.material.as_ref().unwrap();
        let offset = material.depth_offset.unwrap();

        assert!(offset.factor < 0.0 && offset.units < 0.0);
        assert!(!material.depth_write);
        assert_eq!(glass.render_order, GLASS_RENDER_ORDER);

        let frame = node.find("window_frame").unwrap();
        assert!(frame.render_order < glass.render_order);
    }

    #[test]
    fn parts_are_sized_around_the_opening() {
        let node = window(0.0, 0.0, 0.0, 2.0, 3.0).unwrap();
        assert_eq!(node.children().len(), 3);
        assert_eq!(
            node.find("window_recess").unwrap().geometry,
            Some(GeometryDescriptor::cuboid(2.4, 3.4, 0.3))
        );
    }

    #[test]
    fn rejects_zero_sized_openings() {
        assert!(window(0.0, 0.0, 0.0, 0.0, 3.0).is_err());
    }
}
