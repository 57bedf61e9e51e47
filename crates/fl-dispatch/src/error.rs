use fl_core::FlError;
use fl_graph::GraphError;
use thiserror::Error;

/// Hard failures of a dispatch cycle.
///
/// Unreachable requests never surface here; they only cause a unit to be
/// skipped.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("road graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("invalid fleet record: {0}")]
    Record(#[from] FlError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
