//! `fl-output` — simulation output writers for the flock dispatcher.
//!
//! The CSV backend creates three files:
//!
//! | File                  | Written on                       | One row per            |
//! |-----------------------|----------------------------------|------------------------|
//! | `commands.csv`        | every dispatch                   | command                |
//! | `cycle_summaries.csv` | every `output_interval_ticks`    | output interval        |
//! | `filled_requests.csv` | every tick with deliveries       | delivered request      |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `fl_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fl_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{CommandRow, CycleSummaryRow, FilledRequestRow};
pub use writer::OutputWriter;
