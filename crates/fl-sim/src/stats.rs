//! End-of-run and periodic fleet statistics.

use fl_dispatch::UnitStatus;

use crate::fleet::FleetState;

/// Counts and service times over a [`FleetState`].
///
/// Wait time is pickup minus creation; ride time is drop-off minus pickup.
/// Both means are `None` until the first delivery.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FleetStats {
    pub units:            usize,
    pub idle_units:       usize,
    pub en_route_units:   usize,
    pub delivering_units: usize,

    /// Active requests no unit has taken yet.
    pub open_requests:      usize,
    /// Active requests assigned to a unit (waiting for pickup or on board).
    pub assigned_requests:  usize,
    pub filled_requests:    usize,
    pub abandoned_requests: usize,

    pub mean_wait_ticks: Option<f64>,
    pub mean_ride_ticks: Option<f64>,
}

impl FleetStats {
    pub fn collect(fleet: &FleetState) -> Self {
        let mut stats = FleetStats { units: fleet.units().len(), ..Self::default() };

        for unit in fleet.units().values() {
            match unit.status {
                UnitStatus::Idle       => stats.idle_units += 1,
                UnitStatus::EnRoute    => stats.en_route_units += 1,
                UnitStatus::Delivering => stats.delivering_units += 1,
            }
        }

        stats.open_requests      = fleet.requests().iter().filter(|a| a.request.is_open()).count();
        stats.assigned_requests  = fleet.requests().len() - stats.open_requests;
        stats.filled_requests    = fleet.filled().len();
        stats.abandoned_requests = fleet.abandoned().len();

        stats.mean_wait_ticks = mean(fleet.filled().iter().map(|f| f.wait_ticks()));
        stats.mean_ride_ticks = mean(fleet.filled().iter().map(|f| f.ride_ticks()));
        stats
    }
}

fn mean(values: impl Iterator<Item = u64>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}
