//! Reduction of per-stencil state into summary rows.

use serde::{Deserialize, Serialize};

use super::cycle::StencilState;

/// One line of the cycle-time summary.
///
/// Field names on the wire are the report column names, so every report
/// backend reads and writes the same seven columns in the same order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Stencil")]
    pub stencil: String,
    #[serde(rename = "Total_Boards")]
    pub total_boards: u64,
    /// Most recently observed cycle, not the latest chronologically
    #[serde(rename = "Actual_Cycle")]
    pub actual_cycle: Option<String>,
    #[serde(rename = "Min_Cycle")]
    pub min_cycle: String,
    #[serde(rename = "Max_Cycle")]
    pub max_cycle: String,
    #[serde(rename = "Avg_Cycle")]
    pub avg_cycle: String,
    #[serde(rename = "Max_Downtime")]
    pub max_downtime: Option<String>,
}

impl SummaryRow {
    /// Build a row from one stencil's state, or `None` if it never produced a cycle
    pub fn from_state(state: &StencilState) -> Option<Self> {
        if !state.qualifies() {
            return None;
        }

        let cycles = &state.cycle_durations;
        let actual = *cycles.last()?;
        let min = *cycles.iter().min()?;
        let max = *cycles.iter().max()?;
        let avg = cycles.iter().sum::<i64>() as f64 / cycles.len() as f64;

        Some(Self {
            stencil: state.name.clone(),
            total_boards: state.board_count,
            actual_cycle: Some(format_hms(actual as f64)),
            min_cycle: format_hms(min as f64),
            max_cycle: format_hms(max as f64),
            avg_cycle: format_hms(avg),
            max_downtime: state
                .downtime_durations
                .iter()
                .max()
                .map(|&d| format_hms(d as f64)),
        })
    }

    /// Row values as display strings, absent values empty, in column order
    pub fn cells(&self) -> [String; 7] {
        [
            self.stencil.clone(),
            self.total_boards.to_string(),
            self.actual_cycle.clone().unwrap_or_default(),
            self.min_cycle.clone(),
            self.max_cycle.clone(),
            self.avg_cycle.clone(),
            self.max_downtime.clone().unwrap_or_default(),
        ]
    }
}

/// Reduce stencil states into summary rows, keeping their order.
///
/// Stencils with at most one board or no cycle gaps are left out.
pub fn summarize(states: &[StencilState]) -> Vec<SummaryRow> {
    states.iter().filter_map(SummaryRow::from_state).collect()
}

/// Format a duration in seconds as `HH:MM:SS`.
///
/// Seconds are rounded half-to-even and hours grow past 24 instead of wrapping.
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.round_ties_even().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
