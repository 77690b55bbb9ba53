//! Surface descriptions shared between scene nodes.
//!
//! A [`Material`] is an immutable value. Generators build one per surface kind,
//! wrap it in an [`Rc`] with [`Material::shared`], and hand clones of that
//! handle to every sibling that uses it. When one object needs a tweaked copy
//! (the monument's body uses a stronger bump than its legs), it asks for a new
//! handle with [`Material::derive`] instead of editing the shared one:
//!
//! ```
//! use piazza::{Color, Material};
//!
//! let skin = Material::standard(Color::hex(0x202020)).roughness(0.9).shared();
//! let body = skin.derive(|m| m.bump_scale = Some(0.05));
//!
//! assert_eq!(skin.bump_scale, None);
//! assert_eq!(body.bump_scale, Some(0.05));
//! ```

use std::rc::Rc;

/// RGBA color with components in `[0, 1]`, stored in sRGB space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    /// Converts the color channels to linear space for shading.
    pub fn to_linear(self) -> [f32; 4] {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b), self.a]
    }
}

/// Polygon offset applied when rasterizing coplanar overlays.
///
/// Negative values pull the surface toward the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthOffset {
    pub factor: f32,
    pub units: f32,
}

/// An immutable physically-inspired surface description.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    /// Blended rather than opaque.
    pub transparent: bool,
    pub double_sided: bool,
    pub depth_write: bool,
    pub depth_offset: Option<DepthOffset>,
    pub bump_scale: Option<f32>,
    /// Fraction of light passing through (glass).
    pub transmission: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
            depth_write: true,
            depth_offset: None,
            bump_scale: None,
            transmission: 0.0,
        }
    }
}

impl Material {
    /// An opaque, fully rough surface of the given color.
    pub fn standard(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn emissive(mut self, color: Color, intensity: f32) -> Self {
        self.emissive = color;
        self.emissive_intensity = intensity;
        self
    }

    /// Makes the material blended with the given opacity.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = true;
        self
    }

    /// Makes the material blended without changing its opacity.
    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn depth_write(mut self, enabled: bool) -> Self {
        self.depth_write = enabled;
        self
    }

    pub fn depth_offset(mut self, factor: f32, units: f32) -> Self {
        self.depth_offset = Some(DepthOffset { factor, units });
        self
    }

    pub fn bump_scale(mut self, scale: f32) -> Self {
        self.bump_scale = Some(scale);
        self
    }

    pub fn transmission(mut self, transmission: f32) -> Self {
        self.transmission = transmission;
        self
    }

    /// Wraps the material for sharing between nodes.
    pub fn shared(self) -> Rc<Material> {
        Rc::new(self)
    }

    /// Returns a new shared material equal to this one after `edit`.
    ///
    /// The original is left untouched, so nodes already holding it keep
    /// rendering exactly as before.
    pub fn derive(&self, edit: impl FnOnce(&mut Material)) -> Rc<Material> {
        let mut variant = self.clone();
        edit(&mut variant);
        Rc::new(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        let c = Color::hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn derive_leaves_original_untouched() {
        let base = Material::standard(Color::hex(0x202020)).roughness(0.9).shared();
        let variant = base.derive(|m| m.bump_scale = Some(0.03));

        assert!(!Rc::ptr_eq(&base, &variant));
        assert_eq!(base.bump_scale, None);
        assert_eq!(variant.bump_scale, Some(0.03));
        assert_eq!(variant.roughness, 0.9);
    }

    #[test]
    fn opacity_implies_blending() {
        let globe = Material::standard(Color::hex(0xffffee)).opacity(0.9);
        assert!(globe.transparent);
        assert_eq!(globe.opacity, 0.9);
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0, 1.0]);
        let white = Color::WHITE.to_linear();
        assert!((white[0] - 1.0).abs() < 1e-6);
    }
}
