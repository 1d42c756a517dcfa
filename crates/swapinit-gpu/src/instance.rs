//! Vulkan instance creation.
//!
//! Requested layers and extensions must all be available; the validation
//! layer and debug utilities are added on top only when the loader offers
//! them.

use crate::debug;
use crate::error::{GpuError, Result};
use ash::vk;
use std::ffi::{c_char, CStr, CString};

/// Standard validation layer.
pub const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Instance creation settings.
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    /// Application name reported to the driver.
    pub app_name: String,
    /// Engine name reported to the driver.
    pub engine_name: String,
    /// Requested Vulkan API version.
    pub api_version: u32,
    /// Layers that must be present.
    pub layers: Vec<CString>,
    /// Extensions that must be present.
    pub extensions: Vec<CString>,
    /// Add the validation layer when available.
    pub validation: bool,
    /// Add debug utilities and install the debug messenger when available.
    pub debug_messenger: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            app_name: "05_InitSwapchainRAII".to_string(),
            engine_name: "swapinit".to_string(),
            api_version: vk::API_VERSION_1_0,
            layers: Vec::new(),
            extensions: Vec::new(),
            validation: cfg!(debug_assertions),
            debug_messenger: cfg!(debug_assertions),
        }
    }
}

/// A created instance together with what was enabled on it.
///
/// The instance is not destroyed on drop; ownership passes to
/// [`GpuContext`](crate::GpuContext).
pub struct VulkanInstance {
    pub instance: ash::Instance,
    pub enabled_layers: Vec<CString>,
    pub enabled_extensions: Vec<CString>,
    /// Whether `VK_EXT_debug_utils` ended up enabled.
    pub debug_utils: bool,
}

/// Collect names from a list of layer properties.
pub fn layer_names(properties: &[vk::LayerProperties]) -> Vec<CString> {
    properties
        .iter()
        // SAFETY: layer_name is a NUL-terminated string filled in by the loader
        .map(|props| unsafe { CStr::from_ptr(props.layer_name.as_ptr()) }.to_owned())
        .collect()
}

/// Collect names from a list of extension properties.
pub fn extension_names(properties: &[vk::ExtensionProperties]) -> Vec<CString> {
    properties
        .iter()
        // SAFETY: extension_name is a NUL-terminated string filled in by the loader
        .map(|props| unsafe { CStr::from_ptr(props.extension_name.as_ptr()) }.to_owned())
        .collect()
}

/// Check the requested names against what is available and append `implicit`
/// when it is available and not already requested.
fn gather<'a>(
    requested: &[&'a CStr],
    available: &[CString],
    implicit: Option<&'a CStr>,
    missing: impl Fn(String) -> GpuError,
) -> Result<Vec<&'a CStr>> {
    let is_available = |name: &CStr| available.iter().any(|a| a.as_c_str() == name);

    let mut enabled: Vec<&'a CStr> = Vec::with_capacity(requested.len() + 1);
    for &name in requested {
        if !is_available(name) {
            return Err(missing(name.to_string_lossy().into_owned()));
        }
        if !enabled.contains(&name) {
            enabled.push(name);
        }
    }

    if let Some(name) = implicit.filter(|name| !enabled.contains(name)) {
        if is_available(name) {
            enabled.push(name);
        } else {
            tracing::warn!("{} not available, continuing without it", name.to_string_lossy());
        }
    }

    Ok(enabled)
}

/// Resolve the layers to enable.
pub fn gather_layers<'a>(
    requested: &[&'a CStr],
    available: &[CString],
    validation: bool,
) -> Result<Vec<&'a CStr>> {
    gather(
        requested,
        available,
        validation.then_some(VALIDATION_LAYER),
        GpuError::LayerNotSupported,
    )
}

/// Resolve the extensions to enable.
pub fn gather_extensions<'a>(
    requested: &[&'a CStr],
    available: &[CString],
    debug_utils: bool,
) -> Result<Vec<&'a CStr>> {
    gather(
        requested,
        available,
        debug_utils.then_some(ash::ext::debug_utils::NAME),
        GpuError::ExtensionNotSupported,
    )
}

/// Create a Vulkan instance.
///
/// `surface_extensions` are added to the configured extensions.
///
/// # Safety
/// The entry must be a valid Vulkan entry point.
pub unsafe fn create_instance(
    entry: &ash::Entry,
    config: &InstanceConfig,
    surface_extensions: &[&CStr],
) -> Result<VulkanInstance> {
    let app_name = CString::new(config.app_name.as_str())
        .map_err(|e| GpuError::Other(format!("Invalid application name: {e}")))?;
    let engine_name = CString::new(config.engine_name.as_str())
        .map_err(|e| GpuError::Other(format!("Invalid engine name: {e}")))?;

    let app_info = vk::ApplicationInfo::default()
        .application_name(&app_name)
        .application_version(1)
        .engine_name(&engine_name)
        .engine_version(1)
        .api_version(config.api_version);

    // SAFETY: caller guarantees the entry is valid
    let available_layers = layer_names(&unsafe { entry.enumerate_instance_layer_properties() }?);
    let available_extensions =
        extension_names(&unsafe { entry.enumerate_instance_extension_properties(None) }?);

    tracing::debug!(
        "{} instance layers, {} instance extensions available",
        available_layers.len(),
        available_extensions.len()
    );

    let requested_layers: Vec<&CStr> = config.layers.iter().map(CString::as_c_str).collect();
    let mut requested_extensions: Vec<&CStr> =
        config.extensions.iter().map(CString::as_c_str).collect();
    requested_extensions.extend_from_slice(surface_extensions);

    // Required for MoltenVK on macOS
    #[cfg(target_os = "macos")]
    let create_flags = if available_extensions
        .iter()
        .any(|ext| ext.as_c_str() == ash::khr::portability_enumeration::NAME)
    {
        requested_extensions.push(ash::khr::portability_enumeration::NAME);
        vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
    } else {
        vk::InstanceCreateFlags::empty()
    };
    #[cfg(not(target_os = "macos"))]
    let create_flags = vk::InstanceCreateFlags::empty();

    let layers = gather_layers(&requested_layers, &available_layers, config.validation)?;
    let extensions = gather_extensions(
        &requested_extensions,
        &available_extensions,
        config.debug_messenger,
    )?;
    let debug_utils = extensions.contains(&ash::ext::debug_utils::NAME);

    let layer_ptrs: Vec<*const c_char> = layers.iter().map(|l| l.as_ptr()).collect();
    let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();

    let mut debug_info = debug::messenger_create_info();
    let mut create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_layer_names(&layer_ptrs)
        .enabled_extension_names(&extension_ptrs)
        .flags(create_flags);

    // Chained so that instance creation and destruction are reported too
    if debug_utils {
        create_info = create_info.push_next(&mut debug_info);
    }

    // SAFETY: every pointer in create_info outlives this call
    let instance = unsafe { entry.create_instance(&create_info, None) }?;

    for layer in &layers {
        tracing::info!("Enabled layer {}", layer.to_string_lossy());
    }
    for extension in &extensions {
        tracing::debug!("Enabled extension {}", extension.to_string_lossy());
    }

    Ok(VulkanInstance {
        instance,
        enabled_layers: layers.iter().map(|&l| l.to_owned()).collect(),
        enabled_extensions: extensions.iter().map(|&e| e.to_owned()).collect(),
        debug_utils,
    })
}

/// Pick the physical device to use: the first one enumerated.
///
/// # Safety
/// The instance must be valid.
pub unsafe fn first_physical_device(instance: &ash::Instance) -> Result<vk::PhysicalDevice> {
    // SAFETY: caller guarantees the instance is valid
    let devices = unsafe { instance.enumerate_physical_devices() }?;
    tracing::debug!("Found {} physical devices", devices.len());
    devices.first().copied().ok_or(GpuError::NoPhysicalDevice)
}
