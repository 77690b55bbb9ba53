//! Primitive shape descriptors and their tessellation.
//!
//! A [`GeometryDescriptor`] is a small value describing one primitive:
//! a cuboid, cylinder, cone, sphere, ring, circle, plane, or torus, along with
//! its radii, segment counts, and angular sweep. Generators attach descriptors
//! to scene nodes; nothing is tessellated until someone asks.
//!
//! # Conventions
//!
//! Shapes follow the usual real-time conventions so scene coordinates can be
//! authored by hand:
//!
//! | Shape    | Orientation                                 | Origin            |
//! |----------|---------------------------------------------|-------------------|
//! | Cuboid   | axis aligned                                | center            |
//! | Cylinder | axis along +Y, sweep starts at +Z           | center of the axis |
//! | Cone     | apex at +Y                                  | center of the axis |
//! | Sphere   | poles on Y, `theta` measured from +Y        | center            |
//! | Circle   | XY plane, facing +Z                         | center            |
//! | Ring     | XY plane, facing +Z                         | center            |
//! | Plane    | XY plane, facing +Z                         | center            |
//! | Torus    | ring in the XY plane, sweep starts at +X    | center            |
//!
//! # Validation
//!
//! [`GeometryDescriptor::validate`] rejects non-positive or non-finite
//! dimensions and too-small segment counts:
//!
//! ```
//! use piazza::GeometryDescriptor;
//!
//! assert!(GeometryDescriptor::cuboid(2.0, 3.0, 0.5).validate().is_ok());
//! assert!(GeometryDescriptor::cuboid(0.0, 3.0, 0.5).validate().is_err());
//! ```
//!
//! # Tessellation
//!
//! [`GeometryDescriptor::tessellate`] produces a [`RawGeometry`] whose vertex
//! count always equals [`GeometryDescriptor::vertex_count`], which lets the
//! quality policy reason about mesh weight without building any buffers.

use crate::error::{Result, SceneError};
use crate::mesh::Vertex3d;
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// A primitive shape with its parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeometryDescriptor {
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        open_ended: bool,
        theta_start: f32,
        theta_length: f32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    },
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        theta_segments: u32,
    },
    Circle {
        radius: f32,
        segments: u32,
        theta_start: f32,
        theta_length: f32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
        arc: f32,
    },
}

impl GeometryDescriptor {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Cuboid {
            width,
            height,
            depth,
        }
    }

    /// A closed cylinder with a full sweep.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }

    /// A cylinder restricted to `theta_length` radians starting at `theta_start`.
    pub fn cylinder_arc(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        open_ended: bool,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        Self::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            open_ended,
            theta_start,
            theta_length,
        }
    }

    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self::Cone {
            radius,
            height,
            radial_segments,
        }
    }

    /// A full sphere.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::Sphere {
            radius,
            width_segments,
            height_segments,
            phi_start: 0.0,
            phi_length: TAU,
            theta_start: 0.0,
            theta_length: PI,
        }
    }

    /// A sphere patch; `theta` runs from the +Y pole, `phi` around the Y axis.
    pub fn sphere_section(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        Self::Sphere {
            radius,
            width_segments,
            height_segments,
            phi_start,
            phi_length,
            theta_start,
            theta_length,
        }
    }

    pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> Self {
        Self::Ring {
            inner_radius,
            outer_radius,
            theta_segments,
        }
    }

    pub fn circle(radius: f32, segments: u32) -> Self {
        Self::Circle {
            radius,
            segments,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }

    pub fn circle_arc(radius: f32, segments: u32, theta_start: f32, theta_length: f32) -> Self {
        Self::Circle {
            radius,
            segments,
            theta_start,
            theta_length,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane { width, height }
    }

    pub fn torus(
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
        arc: f32,
    ) -> Self {
        Self::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
            arc,
        }
    }

    /// Short lowercase name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cuboid { .. } => "cuboid",
            Self::Cylinder { .. } => "cylinder",
            Self::Cone { .. } => "cone",
            Self::Sphere { .. } => "sphere",
            Self::Ring { .. } => "ring",
            Self::Circle { .. } => "circle",
            Self::Plane { .. } => "plane",
            Self::Torus { .. } => "torus",
        }
    }

    /// Checks that every dimension is positive and finite and that segment
    /// counts can produce a closed outline.
    pub fn validate(&self) -> Result<()> {
        let shape = self.kind();
        match *self {
            Self::Cuboid {
                width,
                height,
                depth,
            } => {
                positive(shape, "width", width)?;
                positive(shape, "height", height)?;
                positive(shape, "depth", depth)?;
            }
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                theta_length,
                ..
            } => {
                non_negative(shape, "radius_top", radius_top)?;
                non_negative(shape, "radius_bottom", radius_bottom)?;
                positive(shape, "radius", radius_top.max(radius_bottom))?;
                positive(shape, "height", height)?;
                segments(shape, "radial_segments", radial_segments, 3)?;
                positive(shape, "theta_length", theta_length)?;
            }
            Self::Cone {
                radius,
                height,
                radial_segments,
            } => {
                positive(shape, "radius", radius)?;
                positive(shape, "height", height)?;
                segments(shape, "radial_segments", radial_segments, 3)?;
            }
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
                phi_length,
                theta_length,
                ..
            } => {
                positive(shape, "radius", radius)?;
                segments(shape, "width_segments", width_segments, 3)?;
                segments(shape, "height_segments", height_segments, 2)?;
                positive(shape, "phi_length", phi_length)?;
                positive(shape, "theta_length", theta_length)?;
            }
            Self::Ring {
                inner_radius,
                outer_radius,
                theta_segments,
            } => {
                non_negative(shape, "inner_radius", inner_radius)?;
                positive(shape, "outer_radius", outer_radius)?;
                positive(shape, "width", outer_radius - inner_radius)?;
                segments(shape, "theta_segments", theta_segments, 3)?;
            }
            Self::Circle {
                radius,
                segments: count,
                theta_length,
                ..
            } => {
                positive(shape, "radius", radius)?;
                segments(shape, "segments", count, 3)?;
                positive(shape, "theta_length", theta_length)?;
            }
            Self::Plane { width, height } => {
                positive(shape, "width", width)?;
                positive(shape, "height", height)?;
            }
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
                arc,
            } => {
                positive(shape, "radius", radius)?;
                positive(shape, "tube", tube)?;
                segments(shape, "radial_segments", radial_segments, 3)?;
                segments(shape, "tubular_segments", tubular_segments, 3)?;
                positive(shape, "arc", arc)?;
            }
        }
        Ok(())
    }

    /// Number of vertices [`tessellate`](Self::tessellate) will emit.
    pub fn vertex_count(&self) -> usize {
        match *self {
            Self::Cuboid { .. } => 24,
            Self::Cylinder {
                radius_top,
                radius_bottom,
                radial_segments,
                open_ended,
                ..
            } => {
                let r = radial_segments as usize;
                let mut count = (r + 1) * 2;
                if !open_ended {
                    if radius_top > 0.0 {
                        count += 2 * r + 1;
                    }
                    if radius_bottom > 0.0 {
                        count += 2 * r + 1;
                    }
                }
                count
            }
            Self::Cone {
                radial_segments, ..
            } => {
                let r = radial_segments as usize;
                (r + 1) * 2 + 2 * r + 1
            }
            Self::Sphere {
                width_segments,
                height_segments,
                ..
            } => (width_segments as usize + 1) * (height_segments as usize + 1),
            Self::Ring { theta_segments, .. } => (theta_segments as usize + 1) * 2,
            Self::Circle { segments, .. } => segments as usize + 2,
            Self::Plane { .. } => 4,
            Self::Torus {
                radial_segments,
                tubular_segments,
                ..
            } => (radial_segments as usize + 1) * (tubular_segments as usize + 1),
        }
    }

    /// Builds triangle data for this shape.
    pub fn tessellate(&self) -> RawGeometry {
        match *self {
            Self::Cuboid {
                width,
                height,
                depth,
            } => cuboid(width, height, depth),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                open_ended,
                theta_start,
                theta_length,
            } => cylinder(
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                open_ended,
                theta_start,
                theta_length,
            ),
            Self::Cone {
                radius,
                height,
                radial_segments,
            } => cylinder(0.0, radius, height, radial_segments, false, 0.0, TAU),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
                phi_start,
                phi_length,
                theta_start,
                theta_length,
            } => sphere(
                radius,
                width_segments,
                height_segments,
                phi_start,
                phi_length,
                theta_start,
                theta_length,
            ),
            Self::Ring {
                inner_radius,
                outer_radius,
                theta_segments,
            } => ring(inner_radius, outer_radius, theta_segments),
            Self::Circle {
                radius,
                segments,
                theta_start,
                theta_length,
            } => circle(radius, segments, theta_start, theta_length),
            Self::Plane { width, height } => plane(width, height),
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
                arc,
            } => torus(radius, tube, radial_segments, tubular_segments, arc),
        }
    }

    /// A hashable identity for this descriptor, used to share GPU meshes.
    pub fn key(&self) -> GeometryKey {
        let (tag, floats, ints): (u8, Vec<f32>, Vec<u32>) = match *self {
            Self::Cuboid {
                width,
                height,
                depth,
            } => (0, vec![width, height, depth], vec![]),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                open_ended,
                theta_start,
                theta_length,
            } => (
                1,
                vec![radius_top, radius_bottom, height, theta_start, theta_length],
                vec![radial_segments, open_ended as u32],
            ),
            Self::Cone {
                radius,
                height,
                radial_segments,
            } => (2, vec![radius, height], vec![radial_segments]),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
                phi_start,
                phi_length,
                theta_start,
                theta_length,
            } => (
                3,
                vec![radius, phi_start, phi_length, theta_start, theta_length],
                vec![width_segments, height_segments],
            ),
            Self::Ring {
                inner_radius,
                outer_radius,
                theta_segments,
            } => (4, vec![inner_radius, outer_radius], vec![theta_segments]),
            Self::Circle {
                radius,
                segments,
                theta_start,
                theta_length,
            } => (5, vec![radius, theta_start, theta_length], vec![segments]),
            Self::Plane { width, height } => (6, vec![width, height], vec![]),
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
                arc,
            } => (
                7,
                vec![radius, tube, arc],
                vec![radial_segments, tubular_segments],
            ),
        };
        let mut words = Vec::with_capacity(1 + floats.len() + ints.len());
        words.push(tag as u32);
        words.extend(floats.into_iter().map(f32::to_bits));
        words.extend(ints);
        GeometryKey(words)
    }
}

/// Hashable identity of a [`GeometryDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeometryKey(Vec<u32>);

fn positive(shape: &'static str, field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidDimension {
            shape,
            field,
            value,
        })
    }
}

fn non_negative(shape: &'static str, field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidDimension {
            shape,
            field,
            value,
        })
    }
}

fn segments(shape: &'static str, field: &'static str, value: u32, min: u32) -> Result<()> {
    if value >= min {
        Ok(())
    } else {
        Err(SceneError::InvalidSegments {
            shape,
            field,
            min,
            value,
        })
    }
}

/// A sphere enclosing some geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Maps the sphere through an affine transform.
    ///
    /// Non-uniform scale inflates the radius by the largest axis scale, so the
    /// result still encloses the transformed geometry.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let center = matrix.transform_point3(self.center);
        let scale = matrix
            .x_axis
            .truncate()
            .length()
            .max(matrix.y_axis.truncate().length())
            .max(matrix.z_axis.truncate().length());
        Self {
            center,
            radius: self.radius * scale,
        }
    }

    /// The smallest sphere enclosing both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        let offset = other.center - self.center;
        let distance = offset.length();

        if distance + other.radius <= self.radius {
            return *self;
        }
        if distance + self.radius <= other.radius {
            return *other;
        }

        let radius = (distance + self.radius + other.radius) * 0.5;
        let center = self.center + offset * ((radius - self.radius) / distance);
        Self { center, radius }
    }
}

/// Triangle data before GPU upload.
#[derive(Clone, Debug)]
pub struct RawGeometry {
    /// Vertex positions, normals, and UVs.
    pub vertices: Vec<Vertex3d>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl RawGeometry {
    /// Creates raw geometry from vertices and indices.
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns `(min, max)` corners of the bounding box.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    /// Sphere centered on the bounding box, reaching the farthest vertex.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        if self.vertices.is_empty() {
            return BoundingSphere::new(Vec3::ZERO, 0.0);
        }
        let center = self.center();
        let radius = self
            .vertices
            .iter()
            .map(|v| Vec3::from(v.position).distance_squared(center))
            .fold(0.0_f32, f32::max)
            .sqrt();
        BoundingSphere::new(center, radius)
    }
}

fn cuboid(width: f32, height: f32, depth: f32) -> RawGeometry {
    let half = Vec3::new(width, height, depth) * 0.5;
    // (normal, u, v) with u × v = normal so each quad winds CCW from outside.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let center = normal * half;
        let du = u * u.abs().dot(half);
        let dv = v * v.abs().dot(half);
        let base = vertices.len() as u32;

        for (su, sv, uv) in [
            (-1.0, -1.0, [0.0, 1.0]),
            (1.0, -1.0, [1.0, 1.0]),
            (1.0, 1.0, [1.0, 0.0]),
            (-1.0, 1.0, [0.0, 0.0]),
        ] {
            let p = center + du * su + dv * sv;
            vertices.push(Vertex3d::new(p.to_array(), normal.to_array(), uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    RawGeometry::new(vertices, indices)
}

fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    open_ended: bool,
    theta_start: f32,
    theta_length: f32,
) -> RawGeometry {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let row = radial_segments + 1;

    // Torso: row 0 at the top, row 1 at the bottom.
    for y in 0..=1u32 {
        let v = y as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial_segments {
            let u = x as f32 / radial_segments as f32;
            let theta = u * theta_length + theta_start;
            let (sin, cos) = theta.sin_cos();
            let position = [radius * sin, -v * height + half_height, radius * cos];
            let normal = Vec3::new(sin, slope, cos).normalize_or_zero();
            vertices.push(Vertex3d::new(position, normal.to_array(), [u, 1.0 - v]));
        }
    }
    for x in 0..radial_segments {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if !open_ended {
        if radius_top > 0.0 {
            cap(
                &mut vertices,
                &mut indices,
                true,
                radius_top,
                half_height,
                radial_segments,
                theta_start,
                theta_length,
            );
        }
        if radius_bottom > 0.0 {
            cap(
                &mut vertices,
                &mut indices,
                false,
                radius_bottom,
                half_height,
                radial_segments,
                theta_start,
                theta_length,
            );
        }
    }

    RawGeometry::new(vertices, indices)
}

#[allow(clippy::too_many_arguments)]
fn cap(
    vertices: &mut Vec<Vertex3d>,
    indices: &mut Vec<u32>,
    top: bool,
    radius: f32,
    half_height: f32,
    radial_segments: u32,
    theta_start: f32,
    theta_length: f32,
) {
    let sign = if top { 1.0 } else { -1.0 };
    let y = half_height * sign;
    let normal = [0.0, sign, 0.0];
    let center_start = vertices.len() as u32;

    for _ in 0..radial_segments {
        vertices.push(Vertex3d::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    }
    let rim_start = vertices.len() as u32;

    for x in 0..=radial_segments {
        let u = x as f32 / radial_segments as f32;
        let theta = u * theta_length + theta_start;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex3d::new(
            [radius * sin, y, radius * cos],
            normal,
            [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
        ));
    }

    for x in 0..radial_segments {
        let c = center_start + x;
        let i = rim_start + x;
        if top {
            indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

fn sphere(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    phi_start: f32,
    phi_length: f32,
    theta_start: f32,
    theta_length: f32,
) -> RawGeometry {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let theta_end = (theta_start + theta_length).min(PI);
    let row = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = theta_start + v * theta_length;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = phi_start + u * phi_length;
            let position = Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            let normal = position.try_normalize().unwrap_or(Vec3::Y);
            vertices.push(Vertex3d::new(
                position.to_array(),
                normal.to_array(),
                [u, v],
            ));
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Degenerate pole triangles are skipped.
            if iy != 0 || theta_start > 0.0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 || theta_end < PI {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    RawGeometry::new(vertices, indices)
}

fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> RawGeometry {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let normal = [0.0, 0.0, 1.0];

    for radius in [inner_radius, outer_radius] {
        for i in 0..=theta_segments {
            let theta = i as f32 / theta_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let x = radius * cos;
            let y = radius * sin;
            vertices.push(Vertex3d::new(
                [x, y, 0.0],
                normal,
                [
                    (x / outer_radius + 1.0) * 0.5,
                    (y / outer_radius + 1.0) * 0.5,
                ],
            ));
        }
    }

    for i in 0..theta_segments {
        let a = i;
        let b = i + theta_segments + 1;
        let c = i + theta_segments + 2;
        let d = i + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    RawGeometry::new(vertices, indices)
}

fn circle(radius: f32, segments: u32, theta_start: f32, theta_length: f32) -> RawGeometry {
    let mut vertices = Vec::with_capacity(segments as usize + 2);
    let mut indices = Vec::with_capacity(segments as usize * 3);
    let normal = [0.0, 0.0, 1.0];

    vertices.push(Vertex3d::new([0.0, 0.0, 0.0], normal, [0.5, 0.5]));
    for s in 0..=segments {
        let theta = theta_start + s as f32 / segments as f32 * theta_length;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex3d::new(
            [radius * cos, radius * sin, 0.0],
            normal,
            [(cos + 1.0) * 0.5, (sin + 1.0) * 0.5],
        ));
    }
    for i in 1..=segments {
        indices.extend_from_slice(&[i, i + 1, 0]);
    }

    RawGeometry::new(vertices, indices)
}

fn plane(width: f32, height: f32) -> RawGeometry {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let normal = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex3d::new([-hw, hh, 0.0], normal, [0.0, 0.0]),
        Vertex3d::new([hw, hh, 0.0], normal, [1.0, 0.0]),
        Vertex3d::new([-hw, -hh, 0.0], normal, [0.0, 1.0]),
        Vertex3d::new([hw, -hh, 0.0], normal, [1.0, 1.0]),
    ];
    RawGeometry::new(vertices, vec![0, 2, 1, 2, 3, 1])
}

fn torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
    arc: f32,
) -> RawGeometry {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let row = tubular_segments + 1;

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * arc;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize_or_zero();
            vertices.push(Vertex3d::new(
                position.to_array(),
                normal.to_array(),
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            ));
        }
    }

    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    RawGeometry::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shapes() -> Vec<GeometryDescriptor> {
        vec![
            GeometryDescriptor::cuboid(2.0, 3.0, 4.0),
            GeometryDescriptor::cylinder(0.3, 0.4, 7.0, 8),
            GeometryDescriptor::cylinder(0.0, 0.4, 2.0, 8),
            GeometryDescriptor::cylinder_arc(10.0, 10.0, 8.0, 3, true, 0.0, TAU),
            GeometryDescriptor::cylinder_arc(3.0, 3.0, 1.0, 32, false, 0.0, PI),
            GeometryDescriptor::cone(0.8, 1.5, 4),
            GeometryDescriptor::sphere(2.2, 16, 12),
            GeometryDescriptor::sphere_section(8.0, 16, 16, 0.0, TAU, 0.0, PI / 2.0),
            GeometryDescriptor::ring(24.0, 25.0, 64),
            GeometryDescriptor::circle(75.0, 32),
            GeometryDescriptor::circle_arc(1.2, 12, 0.0, PI),
            GeometryDescriptor::plane(60.0, 2.0),
            GeometryDescriptor::torus(4.0, 0.8, 12, 12, PI),
        ]
    }

    #[test]
    fn vertex_count_matches_tessellation() {
        for shape in all_shapes() {
            let raw = shape.tessellate();
            assert_eq!(raw.vertices.len(), shape.vertex_count(), "{shape:?}");
        }
    }

    #[test]
    fn indices_form_triangles_within_range() {
        for shape in all_shapes() {
            let raw = shape.tessellate();
            assert_eq!(raw.indices.len() % 3, 0, "{shape:?}");
            assert!(!raw.indices.is_empty(), "{shape:?}");
            let n = raw.vertices.len() as u32;
            assert!(raw.indices.iter().all(|&i| i < n), "{shape:?}");
        }
    }

    #[test]
    fn known_vertex_counts() {
        assert_eq!(GeometryDescriptor::sphere(1.0, 16, 12).vertex_count(), 221);
        assert_eq!(GeometryDescriptor::circle(75.0, 32).vertex_count(), 34);
        // Torso 2 * 9 plus two caps of 2 * 8 + 1.
        assert_eq!(
            GeometryDescriptor::cylinder(0.3, 0.4, 7.0, 8).vertex_count(),
            52
        );
        assert_eq!(GeometryDescriptor::cone(0.8, 1.5, 4).vertex_count(), 19);
    }

    #[test]
    fn cuboid_bounds_match_dimensions() {
        let raw = GeometryDescriptor::cuboid(2.0, 4.0, 6.0).tessellate();
        let (min, max) = raw.bounds();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn cuboid_faces_wind_outward() {
        let raw = GeometryDescriptor::cuboid(1.0, 1.0, 1.0).tessellate();
        for tri in raw.indices.chunks(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from(raw.vertices[i as usize].position))
                .collect();
            let face_normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize();
            let stored = Vec3::from(raw.vertices[tri[0] as usize].normal);
            assert!(face_normal.abs_diff_eq(stored, 1e-5));
        }
    }

    #[test]
    fn sphere_bounding_radius() {
        let sphere = GeometryDescriptor::sphere(1.5, 8, 8)
            .tessellate()
            .bounding_sphere();
        assert!(sphere.center.length() < 1e-4);
        assert!((sphere.radius - 1.5).abs() < 1e-4);
    }

    #[test]
    fn validation_rejects_degenerate_shapes() {
        assert!(GeometryDescriptor::cuboid(-1.0, 1.0, 1.0).validate().is_err());
        assert!(GeometryDescriptor::cuboid(f32::NAN, 1.0, 1.0).validate().is_err());
        assert!(GeometryDescriptor::cylinder(0.0, 0.0, 1.0, 8).validate().is_err());
        assert!(GeometryDescriptor::cylinder(1.0, 1.0, 1.0, 2).validate().is_err());
        assert!(GeometryDescriptor::ring(2.0, 1.0, 16).validate().is_err());
        assert!(GeometryDescriptor::sphere(1.0, 8, 1).validate().is_err());
        assert!(GeometryDescriptor::plane(0.0, 1.0).validate().is_err());

        assert!(GeometryDescriptor::cylinder(0.0, 1.0, 1.0, 8).validate().is_ok());
        for shape in all_shapes() {
            assert!(shape.validate().is_ok(), "{shape:?}");
        }
    }

    #[test]
    fn bounding_sphere_merge_encloses_both() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        let b = BoundingSphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0);
        let merged = a.merge(&b);
        assert!((merged.radius - 3.0).abs() < 1e-5);
        assert!(merged.center.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));

        let inner = BoundingSphere::new(Vec3::new(0.5, 0.0, 0.0), 0.2);
        assert_eq!(a.merge(&inner), a);
    }

    #[test]
    fn equal_descriptors_share_a_key() {
        let a = GeometryDescriptor::sphere(0.4, 8, 8);
        let b = GeometryDescriptor::sphere(0.4, 8, 8);
        let c = GeometryDescriptor::sphere(0.5, 8, 8);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }
}
