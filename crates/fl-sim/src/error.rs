use fl_core::FlError;
use fl_dispatch::DispatchError;
use fl_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] FlError),

    #[error("road network error: {0}")]
    Graph(#[from] GraphError),

    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

pub type SimResult<T> = Result<T, SimError>;
