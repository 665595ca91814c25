//! Error types for particle-field.
//!
//! This module provides error types for surface acquisition, configuration
//! validation, per-frame drawing, image export and the windowed viewer.

use std::fmt;

use crate::config::Interval;

/// Errors reported by a [`DrawingSurface`](crate::DrawingSurface).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface has zero width or height.
    ZeroArea { width: u32, height: u32 },
    /// The surface cannot produce a drawing context.
    ContextUnavailable,
    /// The surface was detached from its host and can no longer be drawn to.
    Detached,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::ZeroArea { width, height } => {
                write!(f, "Surface has zero area ({}x{})", width, height)
            }
            SurfaceError::ContextUnavailable => write!(f, "Surface drawing context is not available"),
            SurfaceError::Detached => write!(f, "Surface was detached from its host"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Errors found while validating or loading a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Particle count must be at least 1.
    ZeroParticles,
    /// Connection distance must be positive and finite.
    InvalidDistance(f32),
    /// Maximum connections per particle must be at least 1.
    ZeroMaxConnections,
    /// Connection refresh interval must be at least 1 frame.
    ZeroRefreshInterval,
    /// Speed must be non-negative and finite.
    InvalidSpeed(f32),
    /// A random range is inverted, negative or not finite.
    InvalidRange { field: &'static str, range: Interval },
    /// A drift palette needs at least one color.
    EmptyPalette,
    /// Drift frame rate must be positive and finite.
    InvalidFrameRate(f32),
    /// Drift wander must be between 0 and 0.5 of the surface.
    InvalidWander(f32),
    /// Failed to read a configuration file.
    Io(std::io::Error),
    /// Failed to parse configuration JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroParticles => write!(f, "Particle count must be at least 1"),
            ConfigError::InvalidDistance(d) => {
                write!(f, "Connection distance must be positive and finite, got {}", d)
            }
            ConfigError::ZeroMaxConnections => {
                write!(f, "Maximum connections per particle must be at least 1")
            }
            ConfigError::ZeroRefreshInterval => {
                write!(f, "Connection refresh interval must be at least 1 frame")
            }
            ConfigError::InvalidSpeed(s) => {
                write!(f, "Speed must be non-negative and finite, got {}", s)
            }
            ConfigError::InvalidRange { field, range } => {
                write!(f, "Invalid {} range {}..{}", field, range.min, range.max)
            }
            ConfigError::EmptyPalette => write!(f, "Palette must contain at least one color"),
            ConfigError::InvalidFrameRate(r) => {
                write!(f, "Frame rate must be positive and finite, got {}", r)
            }
            ConfigError::InvalidWander(w) => write!(f, "Wander must be within 0..=0.5, got {}", w),
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when building or resizing a [`ParticleField`](crate::ParticleField).
#[derive(Debug)]
pub enum FieldError {
    /// The surface has zero area or no drawing context.
    InvalidSurface(SurfaceError),
    /// The configuration failed validation.
    InvalidConfig(ConfigError),
    /// The surface failed to reallocate its buffer on resize.
    Resize(SurfaceError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidSurface(e) => write!(f, "Invalid drawing surface: {}", e),
            FieldError::InvalidConfig(e) => write!(f, "Invalid field configuration: {}", e),
            FieldError::Resize(e) => write!(f, "Failed to resize drawing surface: {}", e),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::InvalidSurface(e) => Some(e),
            FieldError::InvalidConfig(e) => Some(e),
            FieldError::Resize(e) => Some(e),
        }
    }
}

impl From<ConfigError> for FieldError {
    fn from(e: ConfigError) -> Self {
        FieldError::InvalidConfig(e)
    }
}

/// Which part of the frame was being drawn when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    Clear,
    Particles,
    Connections,
}

impl fmt::Display for FrameStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameStep::Clear => write!(f, "clear"),
            FrameStep::Particles => write!(f, "particles"),
            FrameStep::Connections => write!(f, "connections"),
        }
    }
}

/// A surface failure raised while drawing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameError {
    /// Frame counter value of the failed frame.
    pub frame: u64,
    /// Step that failed.
    pub step: FrameStep,
    /// Underlying surface error.
    pub source: SurfaceError,
}

impl FrameError {
    pub(crate) fn new(frame: u64, step: FrameStep, source: SurfaceError) -> Self {
        Self { frame, step, source }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame {} failed while drawing {}: {}", self.frame, self.step, self.source)
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Errors that can occur when exporting a rendered frame.
#[derive(Debug)]
pub enum ExportError {
    /// The framebuffer has zero area.
    Empty,
    /// Failed to encode or write the image.
    Image(image::ImageError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Empty => write!(f, "Cannot export an empty framebuffer"),
            ExportError::Image(e) => write!(f, "Failed to write image: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Image(e) => Some(e),
            ExportError::Empty => None,
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the windowed viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The particle field could not be built for the window.
    Field(FieldError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::Field(e) => write!(f, "Particle field error: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::Field(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<FieldError> for ViewerError {
    fn from(e: FieldError) -> Self {
        ViewerError::Field(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_error_display_names_step() {
        let err = FrameError::new(42, FrameStep::Connections, SurfaceError::Detached);
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("connections"));
    }

    #[test]
    fn test_field_error_source_chain() {
        use std::error::Error;

        let err = FieldError::InvalidSurface(SurfaceError::ZeroArea { width: 0, height: 10 });
        let source = err.source().expect("source should be the surface error");
        assert_eq!(source.to_string(), "Surface has zero area (0x10)");
    }
}
