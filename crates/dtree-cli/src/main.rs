//! dtree — walk a directory tree and apply one operation to every entry.
//!
//! This binary parses the command line, initialises logging on stderr,
//! hands the selected operation to `dtree-core`, and prints the summary.

mod cli;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dtree_core::{Operation, Report};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();

    let operation = cli.operation().unwrap_or_else(|e| e.exit());

    match execute(&cli, &operation) {
        Ok(report) => {
            if let Some(notice) = soft_failure_notice(&report) {
                eprintln!("{notice}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("dtree: error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// The stderr line that marks a run as only partially completed.
fn soft_failure_notice(report: &Report) -> Option<String> {
    (!report.is_complete()).then(|| {
        format!(
            "dtree: completed with {} soft failure(s)",
            report.summary.soft_failures
        )
    })
}

fn execute(cli: &Cli, operation: &Operation) -> anyhow::Result<Report> {
    let config = cli.walk_config();
    let stdout = io::stdout();

    let report = dtree_core::run(operation, &cli.root, &config, stdout.lock())
        .with_context(|| format!("{} of {} failed", operation.name(), cli.root.display()))?;

    let counters = &report.counters;
    match operation {
        Operation::CountFiles => println!("{}", counters.files),
        Operation::CountDirs => println!("{}", counters.dirs),
        Operation::Size => println!("{}", counters.bytes),
        Operation::CopyTree { destination, .. } => tracing::info!(
            files = counters.copied_files,
            bytes = counters.copied_bytes,
            dirs = counters.created_dirs,
            skipped = counters.skipped,
            "copied to {}",
            destination.display()
        ),
        Operation::MoveTree { destination } => {
            tracing::info!("moved to {}", destination.display())
        }
        Operation::DeleteByExtension(ext) => {
            tracing::info!(deleted = counters.deleted, "removed {ext} files")
        }
        Operation::List | Operation::FindByExtension(_) => {}
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtree_core::{Counters, WalkSummary};

    fn report(soft_failures: usize) -> Report {
        Report {
            counters: Counters::default(),
            summary: WalkSummary {
                visited: 4,
                soft_failures,
            },
        }
    }

    #[test]
    fn complete_run_has_no_notice() {
        assert_eq!(soft_failure_notice(&report(0)), None);
    }

    #[test]
    fn partial_run_is_announced() {
        assert_eq!(
            soft_failure_notice(&report(3)).as_deref(),
            Some("dtree: completed with 3 soft failure(s)")
        );
    }
}
