//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lms-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Administrative toolkit for the course experience services")]
pub(crate) struct Cli {
    /// Versioned configuration journal (the `instructor_task.journal` server setting)
    #[arg(short, long, global = true, default_value = "data/grade-reports-batch-size.jsonl")]
    pub journal: PathBuf,

    /// Print rows as JSON lines instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: AdminCommands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AdminCommands {
    /// Manage the grade report batch size
    BatchSize {
        #[command(subcommand)]
        action: BatchSizeAction,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum BatchSizeAction {
    /// Show the row currently in effect
    Get {},
    /// Append a new row and make it current
    Set {
        /// Learners processed per batch
        batch_size: u32,
        /// Who made the change
        #[arg(long)]
        changed_by: Option<String>,
        /// Store the row as disabled
        #[arg(long)]
        disabled: bool,
    },
    /// List every row, oldest first
    History {},
    /// Show how many batches a report over `learners` would run
    Plan {
        learners: usize,
    },
}
