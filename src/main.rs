//! cyclelog - Cycle-time analysis for SMT stencil printer logs
//!
//! Command line front end: collects log files, runs the batch analysis, prints
//! the summary table and saves it as a report under the configured folder.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cyclelog::batch::{process_logs, scan_folder, unique_paths};
use cyclelog::report::{read_report, render_table, report_path, write_report, ReportFormat};
use cyclelog::settings::UserSettings;

#[derive(Parser, Debug)]
#[command(
    name = "cyclelog",
    version,
    about = "Cycle-time and downtime analysis for SMT printer logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze log files and save a summary report
    Analyze {
        /// Log files to analyze, processed in the order given
        paths: Vec<PathBuf>,

        /// Also analyze every .txt/.log file in this folder
        #[arg(long)]
        folder: Option<PathBuf>,

        /// SMT line the logs come from (selects the report sub-folder)
        #[arg(long, default_value = "SMT Line 1")]
        line: String,

        /// Report format (defaults to the saved setting)
        #[arg(long)]
        format: Option<ReportFormat>,

        /// Downtime threshold in seconds (defaults to the saved setting)
        #[arg(long)]
        threshold: Option<i64>,

        /// Write the report here instead of the per-line report folder
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print the summary without saving a report
        #[arg(long)]
        no_save: bool,
    },

    /// Print a previously saved report
    Show {
        /// Report file (.csv or .json)
        report: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = UserSettings::load();

    match cli.command {
        Command::Analyze {
            paths,
            folder,
            line,
            format,
            threshold,
            output,
            no_save,
        } => {
            let mut files = paths;
            if let Some(folder) = folder {
                let found = scan_folder(&folder)
                    .with_context(|| format!("Failed to scan {}", folder.display()))?;
                files.extend(found);
            }
            let files = unique_paths(files);
            if files.is_empty() {
                bail!("No log files selected");
            }

            let threshold = threshold.unwrap_or(settings.downtime_threshold_secs);
            let report = process_logs(&files, threshold, &mut |percent: u8, message: &str| {
                tracing::info!("[{:>3}%] {}", percent, message)
            });

            for failed in report.failed_files() {
                if let Some(err) = &failed.error {
                    eprintln!("warning: {}", err);
                }
            }

            if report.rows.is_empty() {
                println!("No valid cycle times found.");
                return Ok(());
            }

            print!("{}", render_table(&report.rows));

            if !no_save {
                let format = format
                    .or_else(|| output.as_deref().and_then(ReportFormat::from_path))
                    .unwrap_or(settings.report_format);
                let path = output.unwrap_or_else(|| {
                    report_path(
                        &settings.report_dir,
                        &line,
                        format,
                        chrono::Local::now().naive_local(),
                    )
                });
                write_report(&path, &report.rows, format)
                    .with_context(|| format!("Failed to save report to {}", path.display()))?;
                println!("Saved → {}", path.display());
            }
        }

        Command::Show { report } => {
            let rows = read_report(&report)
                .with_context(|| format!("Failed to read report {}", report.display()))?;
            if rows.is_empty() {
                println!("No data found in report.");
            } else {
                print!("{}", render_table(&rows));
            }
        }
    }

    Ok(())
}
