//! The setup sequence and its report.

use std::fmt;

use anyhow::Context;
use swapinit_gpu::surface::required_surface_extensions;
use swapinit_gpu::{GpuContext, PresentQueue, SurfaceContext};
use swapinit_platform::{create_window, raw_display_handle, raw_handles};
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::config::AppConfig;

/// What the setup sequence found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    /// One-line description of the physical device.
    pub device: String,
    /// Number of queue families the device exposes.
    pub queue_family_count: usize,
    /// First queue family supporting graphics.
    pub graphics_queue_family: u32,
    /// Queue family presenting to the window surface.
    pub present_queue: PresentQueue,
    /// Layers enabled on the instance.
    pub enabled_layers: Vec<String>,
    /// Extensions enabled on the instance.
    pub enabled_extensions: Vec<String>,
    /// Whether the debug messenger was installed.
    pub debug_messenger: bool,
}

impl fmt::Display for SetupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Device:                {}", self.device)?;
        writeln!(f, "Queue families:        {}", self.queue_family_count)?;
        writeln!(f, "Graphics queue family: {}", self.graphics_queue_family)?;
        write!(f, "Present queue family:  {}", self.present_queue.index)?;
        if self.present_queue.shared_with_graphics {
            writeln!(f, " (shared with graphics)")?;
        } else {
            writeln!(f, " (separate)")?;
        }
        writeln!(f, "Layers:                {}", list(&self.enabled_layers))?;
        writeln!(f, "Extensions:            {}", list(&self.enabled_extensions))?;
        write!(
            f,
            "Debug messenger:       {}",
            if self.debug_messenger { "on" } else { "off" }
        )
    }
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Everything the setup sequence created.
///
/// Fields drop in declaration order, which is the reverse of creation order:
/// the surface goes before the window it was made for, and both go before
/// the instance.
pub(crate) struct SetupState {
    surface: SurfaceContext,
    window: Window,
    gpu: GpuContext,
}

impl SetupState {
    /// Run the setup sequence.
    pub(crate) fn create(event_loop: &ActiveEventLoop, config: &AppConfig) -> anyhow::Result<Self> {
        let display = raw_display_handle(event_loop)?;
        let surface_extensions = required_surface_extensions(display)
            .context("Failed to determine surface extensions")?;

        let gpu = config
            .gpu_builder()
            .surface_extensions(surface_extensions)
            .build()
            .context("Failed to create Vulkan instance")?;

        let window = create_window(event_loop, &config.platform_config())?;
        let (display, window_handle) = raw_handles(&window)?;

        // SAFETY: the window outlives the surface, see field order
        let surface = unsafe { gpu.create_surface(display, window_handle) }
            .context("Failed to create window surface")?;

        Ok(Self {
            surface,
            window,
            gpu,
        })
    }

    /// Decide the present queue family and summarize the result.
    pub(crate) fn report(&self) -> anyhow::Result<SetupReport> {
        let present_queue = self
            .gpu
            .select_present_queue_family(&self.surface)
            .context("No queue family can present to the window surface")?;

        tracing::info!(
            "Present queue family: {} (window {:?})",
            present_queue.index,
            self.window.id()
        );

        Ok(SetupReport {
            device: self.gpu.device_info().summary(),
            queue_family_count: self.gpu.queue_families().len(),
            graphics_queue_family: self.gpu.graphics_queue_family(),
            present_queue,
            enabled_layers: to_strings(self.gpu.enabled_layers()),
            enabled_extensions: to_strings(self.gpu.enabled_extensions()),
            debug_messenger: self.gpu.has_debug_messenger(),
        })
    }
}

fn to_strings(names: &[std::ffi::CString]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}
