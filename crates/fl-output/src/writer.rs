//! The `OutputWriter` trait implemented by backend writers.

use crate::{CommandRow, CycleSummaryRow, FilledRequestRow, OutputResult};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write the commands of one dispatch cycle.
    fn write_commands(&mut self, rows: &[CommandRow]) -> OutputResult<()>;

    /// Write one cycle summary row.
    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()>;

    /// Write the requests delivered in one tick.
    fn write_filled(&mut self, rows: &[FilledRequestRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
