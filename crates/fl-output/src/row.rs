//! Plain data row types written by output backends.
//!
//! Nodes and requests are recorded by their numeric ids; unit ids are
//! written as-is.

/// One dispatch command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRow {
    pub tick:           u64,
    pub unix_time_secs: i64,
    pub unit_id:        String,
    /// Index into the snapshot the command was computed from.
    pub request_index:  u64,
    pub request_id:     u32,
    pub goal_node:      u32,
}

/// Fleet counts at one output interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummaryRow {
    pub tick:               u64,
    pub unix_time_secs:     i64,
    pub idle_units:         u64,
    pub en_route_units:     u64,
    pub delivering_units:   u64,
    pub open_requests:      u64,
    pub assigned_requests:  u64,
    pub filled_requests:    u64,
    pub abandoned_requests: u64,
}

/// One delivered request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledRequestRow {
    pub request_id:    u32,
    pub unit_id:       String,
    pub start_node:    u32,
    pub end_node:      u32,
    pub creation_tick: u64,
    pub pickup_tick:   u64,
    pub end_tick:      u64,
}
