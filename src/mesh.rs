//! Spatial transforms, the vertex format, and GPU-resident meshes.
//!
//! - [`Transform`]: Position, rotation, and scale for placing a node relative to its parent
//! - [`Vertex3d`]: The vertex format produced by tessellation and read by the scene shader
//! - [`Mesh`]: Vertex and index buffers uploaded from a [`RawGeometry`]
//!
//! # Transforms
//!
//! [`Transform`] uses a builder pattern. Rotations authored as Euler angles
//! always use the XYZ order (the matrix is `Rx * Ry * Rz`), so every generator
//! composes rotations the same way:
//!
//! ```
//! use piazza::Transform;
//! use glam::Vec3;
//!
//! let transform = Transform::new()
//!     .position(Vec3::new(0.0, 4.75, 4.2))
//!     .euler(std::f32::consts::FRAC_PI_6, 0.0, 0.0)
//!     .scale(Vec3::new(1.0, 0.8, 1.5));
//! ```
//!
//! # Vertex Layout
//!
//! | Attribute | Location | Format      | Offset |
//! |-----------|----------|-------------|--------|
//! | position  | 0        | Float32x3   | 0      |
//! | normal    | 1        | Float32x3   | 12     |
//! | uv        | 2        | Float32x2   | 24     |
//!
//! This layout is exposed via [`Vertex3d::LAYOUT`] for pipeline creation.
//!
//! [`RawGeometry`]: crate::geometry::RawGeometry

use crate::geometry::RawGeometry;
use crate::gpu::GpuContext;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// A vertex with position, normal, and texture coordinates.
///
/// Each vertex occupies 32 bytes and is `Pod`, so whole slices can be cast
/// to bytes for upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// The 3D position of this vertex in model space.
    pub position: [f32; 3],
    /// The surface normal vector (normalized).
    pub normal: [f32; 3],
    /// Texture coordinates in the range [0, 1].
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout descriptor for this vertex type.
    ///
    /// - **Array stride**: 32 bytes per vertex
    /// - **Step mode**: Per-vertex
    /// - **Attributes**: position (loc 0), normal (loc 1), uv (loc 2)
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident geometry with vertex and index buffers.
///
/// Meshes are immutable after creation. The scene renderer creates one mesh
/// per distinct [`GeometryDescriptor`](crate::GeometryDescriptor) and shares
/// it between every node that uses that shape.
///
/// All tessellated primitives use counter-clockwise winding for front faces.
#[derive(Debug)]
pub struct Mesh {
    /// The GPU buffer containing vertex data.
    pub(crate) vertex_buffer: wgpu::Buffer,
    /// The GPU buffer containing index data (u32 indices).
    pub(crate) index_buffer: wgpu::Buffer,
    /// The number of indices in the mesh (determines draw call size).
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads vertex and index data to new GPU buffers.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Uploads tessellated geometry.
    pub fn from_raw(gpu: &GpuContext, raw: &RawGeometry) -> Self {
        Self::new(gpu, &raw.vertices, &raw.indices)
    }
}

/// Position, rotation, and scale of a node relative to its parent.
///
/// The matrix applies transformations in SRT order (Scale, Rotate, Translate).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Scale factors for each axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a new identity transform (origin, no rotation, unit scale).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform positioned at the given location.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the position (translation) component.
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation from Euler angles in radians, applied in XYZ order.
    ///
    /// This is the only Euler order used by the generators, so a rotation
    /// authored as `(x, y, z)` means the same thing everywhere in the scene.
    pub fn euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    /// Sets non-uniform scale factors for each axis.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Converts this transform to a 4×4 transformation matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn euler_order_is_x_then_y_then_z() {
        let transform = Transform::new().euler(0.3, 0.5, 0.7);
        let expected =
            Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(0.5) * Mat4::from_rotation_z(0.7);
        assert!(transform.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn matrix_scales_before_translating() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .scale(Vec3::new(2.0, 1.0, 1.0))
            .euler(0.0, FRAC_PI_2, 0.0);
        let p = transform.matrix().transform_point3(Vec3::X);
        // X scaled by 2, then rotated onto -Z, then translated.
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), 1e-5));
    }
}
