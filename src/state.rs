//! Core constants shared by the parser, the aggregator and the report layer.
//!
//! These values describe the SMT printer log dialect and the fixed tabular
//! contract used by every report backend.

// ============================================================================
// Log Dialect
// ============================================================================

/// Gap between consecutive board prints (in seconds) above which the line is
/// considered to have stopped. A gap exactly equal to this value is still a cycle.
pub const DOWNTIME_THRESHOLD_SECS: i64 = 300;

/// Marker preceding the stencil name on a product change line
pub const PRODUCT_LOADED_MARKER: &str = "Product Loaded:";

/// Marker emitted by the printer for every printed board
pub const BOARD_PRINTED_MARKER: &str = "Printing board";

/// Format of the `date time` prefix once fractional seconds are dropped
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log file extensions picked up when scanning a folder
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "log"];

// ============================================================================
// Report Contract
// ============================================================================

/// Column names of a summary report, in write and read order
pub const REPORT_COLUMNS: [&str; 7] = [
    "Stencil",
    "Total_Boards",
    "Actual_Cycle",
    "Min_Cycle",
    "Max_Cycle",
    "Avg_Cycle",
    "Max_Downtime",
];

/// File name prefix for generated summary reports
pub const REPORT_FILE_PREFIX: &str = "Summary";
