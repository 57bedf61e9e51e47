//! Random transport-request generator.

use tracing::debug;

use fl_core::{NodeId, SimRng};
use fl_graph::RoadNetwork;

use crate::SimResult;

/// Draws pickup/drop-off node pairs from a seeded [`SimRng`].
///
/// Every pair has distinct nodes and the drop-off is reachable from the
/// pickup.  The same seed and network always yield the same sequence.
pub struct RequestGenerator {
    rng:          SimRng,
    max_attempts: u32,
}

impl RequestGenerator {
    /// Draws tried per request before giving up on that tick.
    pub const DEFAULT_ATTEMPTS: u32 = 16;

    pub fn new(rng: SimRng) -> Self {
        Self { rng, max_attempts: Self::DEFAULT_ATTEMPTS }
    }

    pub fn with_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Draw one `(start, end)` pair, or `None` if no valid pair turned up.
    pub fn draw(&mut self, network: &RoadNetwork) -> SimResult<Option<(NodeId, NodeId)>> {
        let n = network.node_count() as u32;
        if n < 2 {
            return Ok(None);
        }

        for _ in 0..self.max_attempts {
            let start = NodeId(self.rng.gen_range(0..n));
            let end   = NodeId(self.rng.gen_range(0..n));
            if start == end {
                continue;
            }
            match network.route(start, end) {
                Ok(_) => return Ok(Some((start, end))),
                Err(e) if e.is_unreachable() => continue,
                Err(e) => return Err(e.into()),
            }
        }

        debug!(attempts = self.max_attempts, "no reachable node pair drawn");
        Ok(None)
    }
}
