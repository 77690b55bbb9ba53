//! `piazza.toml` loading.
//!
//! Every section and field is optional; a missing file means all defaults.
//!
//! ```toml
//! [window]
//! title = "Piazza del Duomo"
//! width = 1280
//! height = 720
//!
//! [scene]
//! detail = "simplified"        # or "full"
//! window_density = 3.0
//! window_skip_probability = 0.1
//! seed = 42                    # omit for a different layout every run
//! lamp_arms = 5
//!
//! [locomotion]
//! damping = 5.0
//! acceleration = 40.0
//! eye_height = 2.0
//! boundary = 70.0
//! look_sensitivity = 0.002
//!
//! [quality]
//! force_tier = "reduced"       # or "standard"; omit to detect
//! shadow_vertex_budget = 1000
//! ```

use std::path::Path;

use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::assembler::SceneSettings;
use crate::error::ConfigError;
use crate::generators::{BuildingParams, DEFAULT_LAMP_ARMS, DetailLevel, RandomSkips};
use crate::locomotion::LocomotionConfig;
use crate::quality::{
    CapabilityTier, DEFAULT_SHADOW_VERTEX_BUDGET, DeviceCapabilities, QualitySettings,
};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "piazza.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PiazzaConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub locomotion: LocomotionConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Piazza del Duomo".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl WindowConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub detail: DetailLevel,
    pub window_density: f32,
    pub window_skip_probability: f32,
    /// Fixes the window-skip sequence. `None` draws a fresh one each run.
    pub seed: Option<u64>,
    pub lamp_arms: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            detail: DetailLevel::Full,
            window_density: BuildingParams::DEFAULT_WINDOW_DENSITY,
            window_skip_probability: BuildingParams::DEFAULT_SKIP_PROBABILITY,
            seed: None,
            lamp_arms: DEFAULT_LAMP_ARMS,
        }
    }
}

impl SceneConfig {
    pub fn settings(&self) -> SceneSettings {
        SceneSettings {
            detail: self.detail,
            window_density: self.window_density,
            skip_probability: self.window_skip_probability,
            lamp_arms: self.lamp_arms,
        }
    }

    pub fn skip_source(&self) -> RandomSkips<ChaCha8Rng> {
        match self.seed {
            Some(seed) => RandomSkips::seeded(seed),
            None => RandomSkips::from_entropy(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Skips capability detection when set.
    pub force_tier: Option<CapabilityTier>,
    pub shadow_vertex_budget: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            force_tier: None,
            shadow_vertex_budget: DEFAULT_SHADOW_VERTEX_BUDGET,
        }
    }
}

impl QualityConfig {
    pub fn resolve(&self, caps: &DeviceCapabilities) -> QualitySettings {
        let settings = match self.force_tier {
            Some(tier) => QualitySettings::for_tier(tier, caps.device_pixel_ratio),
            None => QualitySettings::select(caps),
        };
        settings.with_shadow_vertex_budget(self.shadow_vertex_budget)
    }
}

impl PiazzaConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PiazzaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] when it exists,
    /// otherwise the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            log::info!("loading config from {}", path.display());
            return Self::load(path);
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            log::info!("loading config from {DEFAULT_CONFIG_FILE}");
            Self::load(default)
        } else {
            log::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scene.window_density", self.scene.window_density),
            ("locomotion.damping", self.locomotion.damping),
            ("locomotion.acceleration", self.locomotion.acceleration),
            ("locomotion.eye_height", self.locomotion.eye_height),
            ("locomotion.boundary", self.locomotion.boundary),
            ("locomotion.look_sensitivity", self.locomotion.look_sensitivity),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !(0.0..=1.0).contains(&self.scene.window_skip_probability) {
            return Err(ConfigError::Invalid(format!(
                "scene.window_skip_probability must be within [0, 1], got {}",
                self.scene.window_skip_probability
            )));
        }
        if self.scene.lamp_arms == 0 {
            return Err(ConfigError::Invalid(
                "scene.lamp_arms must be at least 1".into(),
            ));
        }
        if self.quality.shadow_vertex_budget == 0 {
            return Err(ConfigError::Invalid(
                "quality.shadow_vertex_budget must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = PiazzaConfig::from_toml_str("").unwrap();
        assert_eq!(config, PiazzaConfig::default());
        assert_eq!(config.locomotion.boundary, 70.0);
        assert_eq!(config.scene.lamp_arms, 5);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PiazzaConfig::from_toml_str(
            r#"
            [scene]
            detail = "simplified"
            seed = 42

            [quality]
            force_tier = "reduced"
            "#,
        )
        .unwrap();

        assert_eq!(config.scene.detail, DetailLevel::Simplified);
        assert_eq!(config.scene.seed, Some(42));
        assert_eq!(config.scene.window_density, 4.0);
        assert_eq!(config.quality.force_tier, Some(CapabilityTier::Reduced));
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn forced_tier_overrides_detection() {
        let quality = QualityConfig {
            force_tier: Some(CapabilityTier::Reduced),
            shadow_vertex_budget: 500,
        };
        let desktop = DeviceCapabilities {
            device_pixel_ratio: 2.0,
            ..Default::default()
        };
        let settings = quality.resolve(&desktop);
        assert_eq!(settings.tier, CapabilityTier::Reduced);
        assert_eq!(settings.shadow_vertex_budget, 500);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for toml in [
            "[scene]\nwindow_skip_probability = 1.5",
            "[scene]\nlamp_arms = 0",
            "[locomotion]\nboundary = -1.0",
            "[window]\nwidth = 0",
        ] {
            assert!(matches!(
                PiazzaConfig::from_toml_str(toml),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            PiazzaConfig::from_toml_str("[scene\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let result = PiazzaConfig::discover(Some(Path::new("/nonexistent/piazza.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
