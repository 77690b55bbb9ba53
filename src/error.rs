//! Error types for scene construction, configuration loading, and GPU setup.

use thiserror::Error;

/// Errors raised while building the scene graph.
///
/// Generators reject malformed parameters up front instead of producing
/// degenerate geometry that would only show up as a rendering artifact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("{shape}: {field} must be positive and finite, got {value}")]
    InvalidDimension {
        shape: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("{shape}: {field} must be at least {min}, got {value}")]
    InvalidSegments {
        shape: &'static str,
        field: &'static str,
        min: u32,
        value: u32,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised while reading `piazza.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised while bringing up the GPU.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats for this adapter")]
    UnsupportedSurface,
}
