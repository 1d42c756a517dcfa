//! Platform abstraction for swapinit.
//!
//! Provides window configuration and raw handle extraction via winit.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Event loop error: {0}")]
    EventLoop(String),
    #[error("Window handle unavailable: {0}")]
    Handle(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "05_InitSwapchainRAII".to_string(),
            width: 64,
            height: 64,
            resizable: false,
        }
    }
}

impl PlatformConfig {
    /// Window attributes for this configuration.
    pub fn window_attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width.max(1), self.height.max(1)))
            .with_resizable(self.resizable)
    }
}

/// Open a window on a running event loop.
pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Result<Window> {
    let window = event_loop
        .create_window(config.window_attributes())
        .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
    tracing::info!(
        "Window \"{}\" created ({}x{})",
        config.title,
        config.width,
        config.height
    );
    Ok(window)
}

/// Get the raw display handle of the event loop.
///
/// Available before any window exists, so instance extensions can be chosen
/// ahead of window creation.
pub fn raw_display_handle(event_loop: &ActiveEventLoop) -> Result<RawDisplayHandle> {
    event_loop
        .display_handle()
        .map(|handle| handle.as_raw())
        .map_err(|e| PlatformError::Handle(e.to_string()))
}

/// Get raw handles from a window for Vulkan surface creation.
pub fn raw_handles(window: &Window) -> Result<(RawDisplayHandle, RawWindowHandle)> {
    let display = window
        .display_handle()
        .map_err(|e| PlatformError::Handle(e.to_string()))?;
    let window = window
        .window_handle()
        .map_err(|e| PlatformError::Handle(e.to_string()))?;
    Ok((display.as_raw(), window.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_small_and_fixed() {
        let config = PlatformConfig::default();
        assert_eq!((config.width, config.height), (64, 64));
        assert!(!config.resizable);
    }

    #[test]
    fn attributes_follow_config() {
        let config = PlatformConfig {
            title: "probe".to_string(),
            width: 320,
            height: 0,
            resizable: true,
        };
        let attributes = config.window_attributes();
        assert_eq!(attributes.title, "probe");
        assert!(attributes.resizable);
        assert_eq!(
            attributes.inner_size,
            Some(PhysicalSize::new(320_u32, 1_u32).into())
        );
    }
}
