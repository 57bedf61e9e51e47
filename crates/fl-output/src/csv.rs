//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `commands.csv`
//! - `cycle_summaries.csv`
//! - `filled_requests.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CommandRow, CycleSummaryRow, FilledRequestRow, OutputResult};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    commands:  Writer<File>,
    summaries: Writer<File>,
    filled:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut commands = Writer::from_path(dir.join("commands.csv"))?;
        commands.write_record([
            "tick", "unix_time_secs", "unit_id", "request_index", "request_id", "goal_node",
        ])?;

        let mut summaries = Writer::from_path(dir.join("cycle_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "unix_time_secs",
            "idle_units",
            "en_route_units",
            "delivering_units",
            "open_requests",
            "assigned_requests",
            "filled_requests",
            "abandoned_requests",
        ])?;

        let mut filled = Writer::from_path(dir.join("filled_requests.csv"))?;
        filled.write_record([
            "request_id",
            "unit_id",
            "start_node",
            "end_node",
            "creation_tick",
            "pickup_tick",
            "end_tick",
            "wait_ticks",
            "ride_ticks",
        ])?;

        Ok(Self { commands, summaries, filled, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_commands(&mut self, rows: &[CommandRow]) -> OutputResult<()> {
        for row in rows {
            self.commands.write_record(&[
                row.tick.to_string(),
                row.unix_time_secs.to_string(),
                row.unit_id.clone(),
                row.request_index.to_string(),
                row.request_id.to_string(),
                row.goal_node.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.idle_units.to_string(),
            row.en_route_units.to_string(),
            row.delivering_units.to_string(),
            row.open_requests.to_string(),
            row.assigned_requests.to_string(),
            row.filled_requests.to_string(),
            row.abandoned_requests.to_string(),
        ])?;
        Ok(())
    }

    fn write_filled(&mut self, rows: &[FilledRequestRow]) -> OutputResult<()> {
        for row in rows {
            self.filled.write_record(&[
                row.request_id.to_string(),
                row.unit_id.clone(),
                row.start_node.to_string(),
                row.end_node.to_string(),
                row.creation_tick.to_string(),
                row.pickup_tick.to_string(),
                row.end_tick.to_string(),
                row.pickup_tick.saturating_sub(row.creation_tick).to_string(),
                row.end_tick.saturating_sub(row.pickup_tick).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.commands.flush()?;
        self.summaries.flush()?;
        self.filled.flush()?;
        Ok(())
    }
}
