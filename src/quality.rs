//! Device-adaptive quality selection.
//!
//! The decision is made once at startup from a [`DeviceCapabilities`] value.
//! How that value is obtained (a real adapter, a test fixture) is the
//! caller's business; everything in here is pure.
//!
//! ```
//! use piazza::quality::{CapabilityTier, DeviceCapabilities, QualitySettings, ShadowFilter};
//!
//! let laptop = DeviceCapabilities {
//!     gpu_description: Some("Intel(R) Iris(R) Xe Graphics".into()),
//!     device_pixel_ratio: 2.0,
//!     ..Default::default()
//! };
//! let quality = QualitySettings::select(&laptop);
//!
//! assert_eq!(quality.tier, CapabilityTier::Reduced);
//! assert_eq!(quality.pixel_ratio, 1.0);
//! assert_eq!(quality.shadow_filter, ShadowFilter::Basic);
//! ```

use crate::scene::SceneNode;

/// Mesh vertex count above which reduced-tier meshes stop casting shadows.
pub const DEFAULT_SHADOW_VERTEX_BUDGET: usize = 1000;

/// What the host reports about the device at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceCapabilities {
    pub mobile: bool,
    /// Renderer or adapter name, when the platform exposes one.
    pub gpu_description: Option<String>,
    pub integrated_gpu: bool,
    pub device_pixel_ratio: f32,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            mobile: false,
            gpu_description: None,
            integrated_gpu: false,
            device_pixel_ratio: 1.0,
        }
    }
}

impl DeviceCapabilities {
    /// Describes a wgpu adapter. `device_pixel_ratio` comes from the window.
    pub fn from_adapter_info(info: &wgpu::AdapterInfo, device_pixel_ratio: f32) -> Self {
        let description = if info.name.is_empty() {
            None
        } else {
            Some(info.name.clone())
        };
        Self {
            mobile: cfg!(any(target_os = "android", target_os = "ios")),
            gpu_description: description,
            integrated_gpu: info.device_type == wgpu::DeviceType::IntegratedGpu,
            device_pixel_ratio,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
    Standard,
    Reduced,
}

impl CapabilityTier {
    /// Reduced for mobile devices, integrated GPUs and anything Intel.
    pub fn classify(caps: &DeviceCapabilities) -> Self {
        let intel = caps
            .gpu_description
            .as_deref()
            .is_some_and(|name| name.to_ascii_lowercase().contains("intel"));
        if caps.mobile || caps.integrated_gpu || intel {
            CapabilityTier::Reduced
        } else {
            CapabilityTier::Standard
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowFilter {
    Basic,
    PcfSoft,
}

/// Rendering settings derived from the tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualitySettings {
    pub tier: CapabilityTier,
    pub pixel_ratio: f32,
    pub shadow_map_size: u32,
    pub shadow_filter: ShadowFilter,
    pub shadow_vertex_budget: usize,
}

impl QualitySettings {
    pub fn select(caps: &DeviceCapabilities) -> Self {
        Self::for_tier(CapabilityTier::classify(caps), caps.device_pixel_ratio)
    }

    /// Settings for a known tier, e.g. one forced by configuration.
    pub fn for_tier(tier: CapabilityTier, device_pixel_ratio: f32) -> Self {
        match tier {
            CapabilityTier::Standard => Self {
                tier,
                pixel_ratio: device_pixel_ratio.min(1.5),
                shadow_map_size: 1024,
                shadow_filter: ShadowFilter::PcfSoft,
                shadow_vertex_budget: DEFAULT_SHADOW_VERTEX_BUDGET,
            },
            CapabilityTier::Reduced => Self {
                tier,
                pixel_ratio: 1.0,
                shadow_map_size: 512,
                shadow_filter: ShadowFilter::Basic,
                shadow_vertex_budget: DEFAULT_SHADOW_VERTEX_BUDGET,
            },
        }
    }

    pub fn with_shadow_vertex_budget(mut self, budget: usize) -> Self {
        self.shadow_vertex_budget = budget;
        self
    }

    /// Stops heavy meshes in `node` from casting shadows on the reduced tier.
    ///
    /// Returns how many meshes were pruned. Standard tier leaves the tree alone.
    pub fn apply_shadow_policy(&self, node: &mut SceneNode) -> usize {
        if self.tier != CapabilityTier::Reduced {
            return 0;
        }
        let budget = self.shadow_vertex_budget;
        let mut pruned = 0;
        node.visit_mut(&mut |n| {
            let heavy = n
                .geometry
                .as_ref()
                .is_some_and(|g| g.vertex_count() > budget);
            if heavy && n.cast_shadow {
                n.cast_shadow = false;
                pruned += 1;
            }
        });
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryDescriptor;
    use crate::material::{Color, Material};

    fn desktop() -> DeviceCapabilities {
        DeviceCapabilities {
            gpu_description: Some("NVIDIA GeForce RTX 3070".into()),
            device_pixel_ratio: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn discrete_desktop_is_standard() {
        let quality = QualitySettings::select(&desktop());
        assert_eq!(quality.tier, CapabilityTier::Standard);
        assert_eq!(quality.pixel_ratio, 1.5);
        assert_eq!(quality.shadow_map_size, 1024);
        assert_eq!(quality.shadow_filter, ShadowFilter::PcfSoft);
    }

    #[test]
    fn standard_keeps_low_pixel_ratios() {
        let caps = DeviceCapabilities {
            device_pixel_ratio: 1.25,
            ..desktop()
        };
        assert_eq!(QualitySettings::select(&caps).pixel_ratio, 1.25);
    }

    #[test]
    fn any_reduced_signal_wins() {
        let mobile = DeviceCapabilities {
            mobile: true,
            ..desktop()
        };
        let integrated = DeviceCapabilities {
            integrated_gpu: true,
            ..desktop()
        };
        let intel = DeviceCapabilities {
            gpu_description: Some("ANGLE (INTEL UHD 620)".into()),
            ..desktop()
        };
        for caps in [mobile, integrated, intel] {
            let quality = QualitySettings::select(&caps);
            assert_eq!(quality.tier, CapabilityTier::Reduced);
            assert_eq!(quality.pixel_ratio, 1.0);
            assert_eq!(quality.shadow_map_size, 512);
        }
    }

    #[test]
    fn missing_description_is_not_reduced() {
        let caps = DeviceCapabilities::default();
        assert_eq!(CapabilityTier::classify(&caps), CapabilityTier::Standard);
    }

    #[test]
    fn shadow_policy_prunes_only_heavy_meshes_on_reduced() {
        let stone = Material::standard(Color::WHITE).shared();
        let tree = || {
            SceneNode::group("root")
                .with_child(
                    SceneNode::mesh("light", GeometryDescriptor::cuboid(1.0, 1.0, 1.0), &stone)
                        .unwrap()
                        .shadows(true, true),
                )
                .with_child(
                    SceneNode::mesh("heavy", GeometryDescriptor::ring(24.0, 25.0, 600), &stone)
                        .unwrap()
                        .shadows(true, true),
                )
        };

        let mut reduced = tree();
        let pruned = QualitySettings::for_tier(CapabilityTier::Reduced, 1.0)
            .apply_shadow_policy(&mut reduced);
        assert_eq!(pruned, 1);
        assert!(reduced.find("light").unwrap().cast_shadow);
        assert!(!reduced.find("heavy").unwrap().cast_shadow);
        assert!(reduced.find("heavy").unwrap().receive_shadow);

        let mut standard = tree();
        let pruned = QualitySettings::for_tier(CapabilityTier::Standard, 1.0)
            .apply_shadow_policy(&mut standard);
        assert_eq!(pruned, 0);
        assert!(standard.find("heavy").unwrap().cast_shadow);
    }
}
