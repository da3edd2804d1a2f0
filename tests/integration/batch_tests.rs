//! End-to-end batch tests
//!
//! Tests cover:
//! - The reference scenarios on synthetic logs
//! - Unreadable files and empty inputs
//! - Order and idempotence properties
//! - The example logs

use pretty_assertions::assert_eq;
use std::path::PathBuf;

use crate::common::assertions::assert_ordered_stats;
use crate::common::example_files::*;
use crate::common::synthetic::{loaded, other, printed};
use crate::common::{example_file_exists, write_log};
use cyclelog::batch::{analyze_files, no_progress, process_logs, FileError};
use cyclelog::state::DOWNTIME_THRESHOLD_SECS;
use cyclelog::SummaryRow;

fn row(
    stencil: &str,
    boards: u64,
    actual: &str,
    min: &str,
    max: &str,
    avg: &str,
    down: Option<&str>,
) -> SummaryRow {
    SummaryRow {
        stencil: stencil.to_string(),
        total_boards: boards,
        actual_cycle: Some(actual.to_string()),
        min_cycle: min.to_string(),
        max_cycle: max.to_string(),
        avg_cycle: avg.to_string(),
        max_downtime: down.map(str::to_string),
    }
}

// ============================================
// Reference Scenarios
// ============================================

#[test]
fn test_scenario_single_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "a.log",
        &[
            loaded("08:00:00", "StencilA"),
            printed("08:00:10"),
            printed("08:00:25"),
        ],
    );

    assert_eq!(
        analyze_files(&[log]),
        vec![row(
            "StencilA", 2, "00:00:15", "00:00:15", "00:00:15", "00:00:15", None
        )]
    );
}

#[test]
fn test_scenario_only_downtime_is_excluded() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "b.log",
        &[
            loaded("08:00:00", "StencilA"),
            printed("08:00:10"),
            printed("08:10:25"),
        ],
    );

    assert!(analyze_files(&[log]).is_empty());
}

#[test]
fn test_scenario_cycles_and_downtime() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "c.log",
        &[
            loaded("08:00:00", "StencilA"),
            printed("08:00:10"),
            printed("08:00:20"),
            printed("08:00:40"),
            printed("08:07:20"),
        ],
    );

    assert_eq!(
        analyze_files(&[log]),
        vec![row(
            "StencilA",
            4,
            "00:00:20",
            "00:00:10",
            "00:00:20",
            "00:00:15",
            Some("00:06:40")
        )]
    );
}

#[test]
fn test_scenario_unparseable_line_is_transparent() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "d.log",
        &[
            loaded("08:00:00", "StencilA"),
            printed("08:00:10"),
            "2024-13-45 99:99:99 Printing board".to_string(),
            printed("08:00:25"),
        ],
    );

    let report = process_logs(&[log], DOWNTIME_THRESHOLD_SECS, &mut no_progress);
    assert_eq!(report.files[0].skipped_lines, 1);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].total_boards, 2);
    assert_eq!(report.rows[0].min_cycle, "00:00:15");
}

#[test]
fn test_scenario_empty_file_list() {
    let files: Vec<PathBuf> = vec![];
    assert!(analyze_files(&files).is_empty());
}

// ============================================
// Failure Handling
// ============================================

#[test]
fn test_directory_and_missing_paths_do_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_log(
        dir.path(),
        "good.log",
        &[loaded("08:00:00", "A"), printed("08:00:10"), printed("08:00:40")],
    );
    let folder = dir.path().join("sub");
    std::fs::create_dir(&folder).unwrap();
    let missing = dir.path().join("missing.log");

    let report = process_logs(
        &[missing, folder, good],
        DOWNTIME_THRESHOLD_SECS,
        &mut no_progress,
    );

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.files.len(), 3);
    assert!(matches!(report.files[0].error, Some(FileError::Open { .. })));
    assert!(report.files[1].error.is_some());
    assert!(report.files[2].is_ok());
    assert_eq!(report.failed_files().count(), 2);
}

#[test]
fn test_file_without_events_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "quiet.log",
        &[other("08:00:00", "Printer ready"), other("08:01:00", "Idle")],
    );

    let report = process_logs(&[log], DOWNTIME_THRESHOLD_SECS, &mut no_progress);
    assert!(report.rows.is_empty());
    assert_eq!(report.files[0].lines, 2);
    assert_eq!(report.files[0].events, 0);
}

#[test]
fn test_threshold_override() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "t.log",
        &[
            loaded("08:00:00", "A"),
            printed("08:00:00"),
            printed("08:01:00"),
            printed("08:03:00"),
        ],
    );

    let report = process_logs(&[log], 90, &mut no_progress);
    assert_eq!(
        report.rows,
        vec![row(
            "A",
            3,
            "00:01:00",
            "00:01:00",
            "00:01:00",
            "00:01:00",
            Some("00:02:00")
        )]
    );
}

// ============================================
// Order Properties
// ============================================

fn two_shift_logs(dir: &std::path::Path) -> (PathBuf, PathBuf) {
    let first = write_log(
        dir,
        "first.log",
        &[
            loaded("08:00:00", "A"),
            printed("08:00:10"),
            printed("08:00:30"),
            printed("08:10:30"),
            printed("08:10:42"),
            loaded("08:11:00", "B"),
            printed("08:11:05"),
            printed("08:11:35"),
        ],
    );
    let second = write_log(
        dir,
        "second.log",
        &[
            loaded("14:00:00", "A"),
            printed("14:00:05"),
            printed("14:00:50"),
            printed("14:20:50"),
        ],
    );
    (first, second)
}

#[test]
fn test_batch_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (first, second) = two_shift_logs(dir.path());
    let files = [first, second];

    assert_eq!(analyze_files(&files), analyze_files(&files));
}

#[test]
fn test_reordering_files_only_changes_actual() {
    let dir = tempfile::tempdir().unwrap();
    let (first, second) = two_shift_logs(dir.path());

    let forward = analyze_files(&[first.clone(), second.clone()]);
    let backward = analyze_files(&[second, first]);

    let a_fwd = forward.iter().find(|r| r.stencil == "A").unwrap();
    let a_bwd = backward.iter().find(|r| r.stencil == "A").unwrap();

    // A's cycles: 20, 12 from the first file and 45 from the second
    assert_eq!(a_fwd.actual_cycle.as_deref(), Some("00:00:45"));
    assert_eq!(a_bwd.actual_cycle.as_deref(), Some("00:00:12"));

    assert_eq!(a_fwd.total_boards, a_bwd.total_boards);
    assert_eq!(a_fwd.min_cycle, a_bwd.min_cycle);
    assert_eq!(a_fwd.max_cycle, a_bwd.max_cycle);
    assert_eq!(a_fwd.avg_cycle, a_bwd.avg_cycle);
    assert_eq!(a_fwd.max_downtime, a_bwd.max_downtime);
    assert_eq!(a_fwd.max_downtime.as_deref(), Some("00:20:00"));
}

#[test]
fn test_rows_follow_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "order.log",
        &[
            loaded("08:00:00", "Zeta"),
            printed("08:00:10"),
            printed("08:00:20"),
            loaded("08:01:00", "Alpha"),
            printed("08:01:10"),
            printed("08:01:20"),
            loaded("08:02:00", "Zeta"),
            printed("08:02:10"),
        ],
    );

    let names: Vec<String> = analyze_files(&[log])
        .into_iter()
        .map(|r| r.stencil)
        .collect();
    assert_eq!(names, vec!["Zeta".to_string(), "Alpha".to_string()]);
}

// ============================================
// Example Logs
// ============================================

#[test]
fn test_example_logs() {
    if !example_file_exists(LINE1_SHIFT_A) || !example_file_exists(LINE1_SHIFT_B) {
        eprintln!("Skipping: example logs not found");
        return;
    }

    let mut progress: Vec<u8> = vec![];
    let report = process_logs(
        &[LINE1_SHIFT_A, LINE1_SHIFT_B],
        DOWNTIME_THRESHOLD_SECS,
        &mut |percent: u8, _: &str| progress.push(percent),
    );

    assert_eq!(progress, vec![50, 100]);
    assert_eq!(report.total_skipped_lines(), 1);
    assert_eq!(report.files[0].events, 11);
    assert_eq!(report.files[1].events, 7);
    assert_eq!(
        report.rows,
        vec![
            row(
                "TOP-5521-A",
                9,
                "00:00:30",
                "00:00:22",
                "00:00:30",
                "00:00:25",
                Some("00:08:20")
            ),
            row(
                "BOT-5521-B",
                3,
                "00:00:23",
                "00:00:22",
                "00:00:23",
                "00:00:22",
                None
            ),
        ]
    );
    for row in &report.rows {
        assert_ordered_stats(row);
    }
}
