//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `FlError` as one variant
//! via `#[from]` where they surface core failures.

use thiserror::Error;

use crate::UnitId;

/// Errors raised while constructing or looking up core records.
#[derive(Debug, Error)]
pub enum FlError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unknown unit status {0:?}")]
    UnknownStatus(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `fl-*` crates.
pub type FlResult<T> = Result<T, FlError>;
