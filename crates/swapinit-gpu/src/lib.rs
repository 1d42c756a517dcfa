//! Vulkan setup layer for swapinit.
//!
//! This crate provides:
//! - Vulkan instance creation with layer and extension gathering
//! - Debug messenger routing validation output into `tracing`
//! - Physical device identification
//! - Queue family selection for graphics and presentation
//! - Surface creation for a window

pub mod capabilities;
pub mod context;
pub mod debug;
pub mod error;
pub mod instance;
pub mod queue;
pub mod surface;

pub use capabilities::{DeviceInfo, GpuVendor};
pub use context::{GpuContext, GpuContextBuilder};
pub use debug::DebugMessenger;
pub use error::{GpuError, Result};
pub use instance::{InstanceConfig, VulkanInstance};
pub use queue::{find_graphics_queue_family, find_queue_family, select_present_queue_family, PresentQueue};
pub use surface::SurfaceContext;
