//! Cycle-time analysis for SMT printer logs.
//!
//! Analysis runs in two stages:
//! - [`cycle`] folds timestamped events into per-stencil state, bucketing the
//!   gap between consecutive board prints as cycle or downtime
//! - [`summary`] reduces that state into one [`SummaryRow`] per stencil that
//!   produced at least one observable cycle

pub mod cycle;
pub mod summary;

pub use cycle::{classify_delta, CycleAggregator, DeltaKind, StencilState};
pub use summary::{format_hms, summarize, SummaryRow};
