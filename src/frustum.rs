//! View-frustum planes and sphere tests for visibility culling.

use glam::{Mat4, Vec3, Vec4};

use crate::geometry::BoundingSphere;

/// The six clip planes of a view-projection matrix.
///
/// Planes are stored as `(normal, distance)` with normals pointing inward,
/// so a point is inside when `dot(normal, p) + distance >= 0` for all six.
/// Extraction assumes the `[0, 1]` clip-space depth range used by wgpu.
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    pub fn from_view_projection(m: &Mat4) -> Self {
        let r0 = m.row(0);
        let r1 = m.row(1);
        let r2 = m.row(2);
        let r3 = m.row(3);

        let planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r2,      // near
            r3 - r2, // far
        ]
        .map(normalize_plane);

        Self { planes }
    }

    /// True if any part of the sphere may be visible.
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(sphere.center) + plane.w >= -sphere.radius)
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.intersects_sphere(&BoundingSphere::new(point, 0.0))
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let length = plane.truncate().length();
    if length > 0.0 { plane / length } else { plane }
}
