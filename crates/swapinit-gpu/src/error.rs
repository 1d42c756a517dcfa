//! GPU error types.

use ash::vk;
use swapinit_core::SelectError;
use thiserror::Error;

/// GPU-related errors.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Vulkan error.
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::Result),

    /// The Vulkan loader could not be loaded.
    #[error("Failed to load Vulkan: {0}")]
    Loading(String),

    /// No physical device was enumerated.
    #[error("No Vulkan physical device found")]
    NoPhysicalDevice,

    /// Requested instance layer not available.
    #[error("Requested layer not available: {0}")]
    LayerNotSupported(String),

    /// Requested instance extension not available.
    #[error("Requested extension not supported: {0}")]
    ExtensionNotSupported(String),

    /// Surface creation failed.
    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    /// Capability selection failed.
    #[error("Queue family selection failed: {0}")]
    Selection(#[from] SelectError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, GpuError>;
