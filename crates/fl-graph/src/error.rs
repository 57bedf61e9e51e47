//! Graph-subsystem error type.

use thiserror::Error;

use fl_core::{LaneId, NodeId};

/// Errors produced by `fl-graph`.
///
/// Only [`Unreachable`](GraphError::Unreachable) describes a routing outcome;
/// every other variant means the graph or a query against it is malformed.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("no edge carries lane {0:?}")]
    UnknownLane(LaneId),

    #[error("lane {0:?} is carried by more than one edge")]
    DuplicateLane(LaneId),

    #[error("node name {0:?} is used more than once")]
    DuplicateNode(String),

    #[error("no node named {0:?}")]
    UnknownNode(String),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("lane {lane:?} has invalid weight {weight}")]
    InvalidWeight { lane: LaneId, weight: f64 },

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// `true` for the one recoverable routing failure.
    #[inline]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, GraphError::Unreachable { .. })
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
