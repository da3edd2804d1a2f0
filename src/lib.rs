//! cyclelog - Cycle-time analysis for SMT stencil printer logs
//!
//! This library turns batches of plain-text printer logs into per-stencil
//! cycle-time summaries (board count, actual/min/max/average cycle and peak
//! downtime) and persists them as tabular reports.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Timestamp parsing and event classification of log lines
//! - [`analysis`] - Per-stencil aggregation and summary reduction
//! - [`batch`] - Multi-file driver, progress reporting and folder scanning
//! - [`report`] - CSV/JSON report writing and reading
//! - [`settings`] - User settings persistence
//! - [`state`] - Log dialect constants and the report column contract

pub mod analysis;
pub mod batch;
pub mod parsers;
pub mod report;
pub mod settings;
pub mod state;

pub use analysis::SummaryRow;
pub use batch::{analyze_files, process_logs, BatchReport};
