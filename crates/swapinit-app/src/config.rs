//! Application configuration.

use ash::vk;
use swapinit_gpu::GpuContextBuilder;
use swapinit_platform::PlatformConfig;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Window title, also used as the Vulkan application name.
    pub title: String,
    /// Initial window width.
    pub width: u32,
    /// Initial window height.
    pub height: u32,
    /// Enable Vulkan validation layers (default: debug builds only).
    pub validation: bool,
    /// Install the debug messenger (default: debug builds only).
    pub debug_messenger: bool,
    /// Requested Vulkan API version.
    pub api_version: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let platform = PlatformConfig::default();
        Self {
            title: platform.title,
            width: platform.width,
            height: platform.height,
            validation: cfg!(debug_assertions),
            debug_messenger: cfg!(debug_assertions),
            api_version: vk::API_VERSION_1_0,
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable validation layers.
    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    /// Enable or disable the debug messenger.
    pub fn with_debug_messenger(mut self, debug_messenger: bool) -> Self {
        self.debug_messenger = debug_messenger;
        self
    }

    /// Set the requested Vulkan API version.
    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub(crate) fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            ..Default::default()
        }
    }

    pub(crate) fn gpu_builder(&self) -> GpuContextBuilder {
        GpuContextBuilder::new()
            .app_name(&self.title)
            .api_version(self.api_version)
            .validation(self.validation)
            .debug_messenger(self.debug_messenger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_defaults() {
        let config = AppConfig::default();
        let platform = PlatformConfig::default();
        assert_eq!(config.title, platform.title);
        assert_eq!((config.width, config.height), (64, 64));
        assert_eq!(config.api_version, vk::API_VERSION_1_0);
        assert_eq!(config.validation, cfg!(debug_assertions));
    }

    #[test]
    fn builder_methods() {
        let config = AppConfig::new("probe")
            .with_size(800, 600)
            .with_validation(true)
            .with_debug_messenger(false)
            .with_api_version(vk::API_VERSION_1_3);
        assert_eq!(config.title, "probe");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(config.validation);
        assert!(!config.debug_messenger);
        assert_eq!(config.api_version, vk::API_VERSION_1_3);
    }

    #[test]
    fn platform_config_carries_window_settings() {
        let platform = AppConfig::new("probe").with_size(100, 50).platform_config();
        assert_eq!(platform.title, "probe");
        assert_eq!((platform.width, platform.height), (100, 50));
        assert!(!platform.resizable);
    }
}
