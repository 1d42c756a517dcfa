//! Surface management for windowed presentation.
//!
//! Wraps `ash-window` so application code only deals in raw window handles.

use crate::error::{GpuError, Result};
use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use std::ffi::CStr;

/// Instance extensions needed to create surfaces on this display.
pub fn required_surface_extensions(display: RawDisplayHandle) -> Result<Vec<&'static CStr>> {
    let names = ash_window::enumerate_required_extensions(display)
        .map_err(|e| GpuError::SurfaceCreation(format!("Unsupported display: {e}")))?;

    Ok(names
        .iter()
        // SAFETY: ash-window returns pointers to static extension name constants
        .map(|&name| unsafe { CStr::from_ptr(name) })
        .collect())
}

/// A Vulkan surface for one window; destroyed on drop.
pub struct SurfaceContext {
    /// The Vulkan surface handle.
    pub surface: vk::SurfaceKHR,
    /// Surface extension loader.
    pub surface_loader: ash::khr::surface::Instance,
}

impl SurfaceContext {
    /// Create a surface from raw window handles.
    ///
    /// # Safety
    /// The instance must be valid, have the extensions from
    /// [`required_surface_extensions`] enabled, and outlive the surface. The
    /// handles must stay valid for the lifetime of the surface.
    pub unsafe fn new(
        entry: &ash::Entry,
        instance: &ash::Instance,
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<Self> {
        // SAFETY: forwarded from the caller
        let surface = unsafe { ash_window::create_surface(entry, instance, display, window, None) }
            .map_err(|e| GpuError::SurfaceCreation(e.to_string()))?;

        if surface == vk::SurfaceKHR::null() {
            return Err(GpuError::SurfaceCreation(
                "driver returned a null surface".to_string(),
            ));
        }

        tracing::info!("Surface created: {surface:?}");

        let surface_loader = ash::khr::surface::Instance::new(entry, instance);

        Ok(Self {
            surface,
            surface_loader,
        })
    }

    /// Whether a queue family of `physical_device` can present to this surface.
    pub fn supports_present(
        &self,
        physical_device: vk::PhysicalDevice,
        queue_family: u32,
    ) -> Result<bool> {
        // SAFETY: the surface is alive and the device belongs to its instance
        let supported = unsafe {
            self.surface_loader.get_physical_device_surface_support(
                physical_device,
                queue_family,
                self.surface,
            )
        }?;
        Ok(supported)
    }
}

impl Drop for SurfaceContext {
    fn drop(&mut self) {
        tracing::debug!("Destroying surface");
        unsafe {
            self.surface_loader.destroy_surface(self.surface, None);
        }
    }
}
