//! Setup sequence for swapinit.
//!
//! Opens a window, creates a Vulkan instance and a presentable surface for
//! it, works out which queue families render and present, then tears
//! everything down again. There is no frame loop.
//!
//! # Example
//!
//! ```no_run
//! use swapinit_app::{run_app, AppConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let report = run_app(AppConfig::default().with_validation(true))?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

mod config;
mod runner;
mod setup;

pub use config::AppConfig;
pub use runner::run_app;
pub use setup::SetupReport;

// Re-export commonly used types for convenience
pub use swapinit_gpu::{GpuContext, GpuContextBuilder, PresentQueue};
