//! Core types for swapinit.
//!
//! This crate provides the pieces that do not touch the graphics API:
//! - Capability-qualified selection over enumerated capability tables
//! - Checked conversion of selected indices to device index types
//! - Common error types

pub mod error;
pub mod select;

pub use error::{Result, SelectError};
pub use select::{checked_index, confirm_or_select, select_first, try_select_first, Selection};
