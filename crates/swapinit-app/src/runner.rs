//! Application runner and event loop.

use anyhow::anyhow;
use swapinit_platform::PlatformError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::config::AppConfig;
use crate::setup::{SetupReport, SetupState};

/// Run the setup sequence with the given configuration.
///
/// This function initializes logging, creates the event loop, performs the
/// setup once the loop is ready, releases every resource again and returns
/// what was found. The loop exits right after setup; nothing is rendered.
pub fn run_app(config: AppConfig) -> anyhow::Result<SetupReport> {
    // Initialize logging
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    info!("{} starting...", config.title);

    let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut runner = SetupRunner {
        config,
        outcome: None,
    };

    event_loop
        .run_app(&mut runner)
        .map_err(|e| PlatformError::EventLoop(e.to_string()))?;

    runner
        .outcome
        .unwrap_or_else(|| Err(anyhow!("Event loop exited before setup ran")))
}

/// Internal runner that implements winit's ApplicationHandler.
struct SetupRunner {
    config: AppConfig,
    outcome: Option<anyhow::Result<SetupReport>>,
}

impl SetupRunner {
    fn run_setup(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<SetupReport> {
        let state = SetupState::create(event_loop, &self.config)?;
        let report = state.report()?;

        info!("Setup complete, releasing resources");
        drop(state);

        Ok(report)
    }
}

impl ApplicationHandler for SetupRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.outcome.is_some() {
            return;
        }

        let outcome = self.run_setup(event_loop);
        if let Err(e) = &outcome {
            error!("Setup failed: {e:#}");
        }
        self.outcome = Some(outcome);

        event_loop.exit();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::CloseRequested) {
            info!("Close requested");
            event_loop.exit();
        }
    }
}
