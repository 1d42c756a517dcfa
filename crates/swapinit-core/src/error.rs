//! Error types for capability selection.

use thiserror::Error;

/// Selection error type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// The capability table has no records.
    #[error("Capability table is empty")]
    EmptyInput,

    /// No record in the table satisfies the predicate.
    #[error("No record satisfies the requested capability ({len} scanned)")]
    NotFound {
        /// Number of records scanned.
        len: usize,
    },

    /// A selected index does not fit the target index type.
    #[error("Index {0} does not fit in the device index type")]
    IndexOverflow(usize),
}

/// Result type alias using [`SelectError`].
pub type Result<T> = std::result::Result<T, SelectError>;
