//! GPU context management.

use crate::capabilities::DeviceInfo;
use crate::debug::DebugMessenger;
use crate::error::{GpuError, Result};
use crate::instance::{create_instance, first_physical_device, InstanceConfig, VulkanInstance};
use crate::queue::{find_graphics_queue_family, select_present_queue_family, PresentQueue};
use crate::surface::SurfaceContext;
use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use std::ffi::{CStr, CString};

/// Instance, debug messenger and the chosen physical device.
pub struct GpuContext {
    // Entry must be kept alive for the lifetime of the context
    entry: ash::Entry,
    instance: ash::Instance,
    debug_messenger: Option<DebugMessenger>,
    physical_device: vk::PhysicalDevice,
    device_info: DeviceInfo,
    queue_families: Vec<vk::QueueFamilyProperties>,
    graphics_queue_family: u32,
    enabled_layers: Vec<CString>,
    enabled_extensions: Vec<CString>,
}

impl GpuContext {
    /// Get the Vulkan entry point.
    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    /// Get the Vulkan instance handle.
    pub fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    /// Get the physical device handle.
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Get what the physical device reports about itself.
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Queue family properties, indexed by queue family index.
    pub fn queue_families(&self) -> &[vk::QueueFamilyProperties] {
        &self.queue_families
    }

    /// Get the graphics queue family index.
    pub fn graphics_queue_family(&self) -> u32 {
        self.graphics_queue_family
    }

    /// Layers enabled on the instance.
    pub fn enabled_layers(&self) -> &[CString] {
        &self.enabled_layers
    }

    /// Extensions enabled on the instance.
    pub fn enabled_extensions(&self) -> &[CString] {
        &self.enabled_extensions
    }

    /// Whether validation output is routed through the debug messenger.
    pub fn has_debug_messenger(&self) -> bool {
        self.debug_messenger.is_some()
    }

    /// Create a surface for a window.
    ///
    /// # Safety
    /// The handles must stay valid for as long as the returned surface, and
    /// the surface must be dropped before this context.
    pub unsafe fn create_surface(
        &self,
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<SurfaceContext> {
        // SAFETY: forwarded from the caller; the instance is valid
        unsafe { SurfaceContext::new(&self.entry, &self.instance, display, window) }
    }

    /// Choose the queue family that presents to `surface`.
    pub fn select_present_queue_family(&self, surface: &SurfaceContext) -> Result<PresentQueue> {
        select_present_queue_family(
            &self.queue_families,
            self.graphics_queue_family,
            |family| surface.supports_present(self.physical_device, family),
        )
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        // Messenger goes before the instance it was created on
        drop(self.debug_messenger.take());
        tracing::debug!("Destroying instance");
        unsafe {
            self.instance.destroy_instance(None);
        }
    }
}

/// Builder for creating a GPU context.
#[derive(Default)]
pub struct GpuContextBuilder {
    config: InstanceConfig,
    surface_extensions: Vec<&'static CStr>,
}

impl GpuContextBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete instance configuration.
    pub fn config(mut self, config: InstanceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = name.into();
        self
    }

    /// Set the engine name.
    pub fn engine_name(mut self, name: impl Into<String>) -> Self {
        self.config.engine_name = name.into();
        self
    }

    /// Set the requested Vulkan API version.
    pub fn api_version(mut self, version: u32) -> Self {
        self.config.api_version = version;
        self
    }

    /// Enable or disable validation layers.
    pub fn validation(mut self, enable: bool) -> Self {
        self.config.validation = enable;
        self
    }

    /// Enable or disable the debug messenger.
    pub fn debug_messenger(mut self, enable: bool) -> Self {
        self.config.debug_messenger = enable;
        self
    }

    /// Require an instance layer.
    pub fn layer(mut self, name: &CStr) -> Self {
        self.config.layers.push(name.to_owned());
        self
    }

    /// Require an instance extension.
    pub fn extension(mut self, name: &CStr) -> Self {
        self.config.extensions.push(name.to_owned());
        self
    }

    /// Require the extensions a surface needs.
    pub fn surface_extensions(mut self, names: impl IntoIterator<Item = &'static CStr>) -> Self {
        self.surface_extensions.extend(names);
        self
    }

    /// Build the GPU context.
    pub fn build(self) -> Result<GpuContext> {
        // Load Vulkan entry point
        let entry = unsafe { ash::Entry::load() }.map_err(|e| GpuError::Loading(e.to_string()))?;

        // SAFETY: the entry was just loaded
        let VulkanInstance {
            instance,
            enabled_layers,
            enabled_extensions,
            debug_utils,
        } = unsafe { create_instance(&entry, &self.config, &self.surface_extensions) }?;

        // SAFETY: the instance was just created from this entry
        match unsafe { Self::select_device(&entry, &instance, debug_utils) } {
            Ok(selected) => Ok(GpuContext {
                entry,
                instance,
                debug_messenger: selected.debug_messenger,
                physical_device: selected.physical_device,
                device_info: selected.device_info,
                queue_families: selected.queue_families,
                graphics_queue_family: selected.graphics_queue_family,
                enabled_layers,
                enabled_extensions,
            }),
            Err(e) => {
                // SAFETY: nothing created from the instance survives a failed selection
                unsafe { instance.destroy_instance(None) };
                Err(e)
            }
        }
    }

    /// Install the messenger, pick the physical device and its graphics queue family.
    ///
    /// # Safety
    /// The instance must be valid and created from `entry`.
    unsafe fn select_device(
        entry: &ash::Entry,
        instance: &ash::Instance,
        debug_utils: bool,
    ) -> Result<SelectedDevice> {
        let debug_messenger = if debug_utils {
            // SAFETY: debug utils are enabled on this instance
            Some(unsafe { DebugMessenger::new(entry, instance) }?)
        } else {
            None
        };

        // SAFETY: caller guarantees the instance is valid
        let physical_device = unsafe { first_physical_device(instance) }?;
        let device_info = unsafe { DeviceInfo::query(instance, physical_device) };
        tracing::info!("Selected GPU: {}", device_info.summary());

        let queue_families =
            unsafe { instance.get_physical_device_queue_family_properties(physical_device) };
        for (index, family) in queue_families.iter().enumerate() {
            tracing::debug!(
                "Queue family {index}: {:?} x{}",
                family.queue_flags,
                family.queue_count
            );
        }

        let graphics_queue_family = find_graphics_queue_family(&queue_families)?;
        tracing::info!("Graphics queue family: {graphics_queue_family}");

        Ok(SelectedDevice {
            debug_messenger,
            physical_device,
            device_info,
            queue_families,
            graphics_queue_family,
        })
    }
}

struct SelectedDevice {
    debug_messenger: Option<DebugMessenger>,
    physical_device: vk::PhysicalDevice,
    device_info: DeviceInfo,
    queue_families: Vec<vk::QueueFamilyProperties>,
    graphics_queue_family: u32,
}
