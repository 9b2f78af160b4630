#![allow(clippy::print_stdout)]

mod args;

use crate::args::{AdminCommands, BatchSizeAction, Cli};
use anyhow::{Context, Result};
use clap::Parser;
use lms::features::instructor_task::{
    ConfigRecord, DEFAULT_CACHE_TTL, GradeReportsBatchSize, JournalConfigStore, VersionedConfig,
};
use lms_logger::{LevelFilter, Logger};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::builder(env!("CARGO_PKG_NAME")).level(LevelFilter::WARN).console(true).init()?;

    match cli.command {
        AdminCommands::BatchSize { action } => {
            let table = open(&cli.journal)?;
            match action {
                BatchSizeAction::Get {} => match table.current_record() {
                    Some(record) => print_record(&record, cli.json)?,
                    None => println!(
                        "batch_size={} (default, no rows)",
                        GradeReportsBatchSize::default().batch_size
                    ),
                },
                BatchSizeAction::Set { batch_size, changed_by, disabled } => {
                    let record = table
                        .update(GradeReportsBatchSize::new(batch_size), changed_by, !disabled)
                        .context("Failed to append batch size row")?;
                    print_record(&record, cli.json)?;
                },
                BatchSizeAction::History {} => {
                    for record in table.history() {
                        print_record(&record, cli.json)?;
                    }
                },
                BatchSizeAction::Plan { learners } => {
                    let batches: Vec<_> = table.current().batches(learners).collect();
                    println!("batches={}", batches.len());
                    for range in batches {
                        println!("{}..{}", range.start, range.end);
                    }
                },
            }
        },
    }

    Ok(())
}

fn open(journal: &Path) -> Result<VersionedConfig<GradeReportsBatchSize>> {
    let store = JournalConfigStore::open(journal)
        .with_context(|| format!("Failed to open journal {}", journal.display()))?;
    Ok(VersionedConfig::new(Arc::new(store), DEFAULT_CACHE_TTL))
}

fn print_record(record: &ConfigRecord<GradeReportsBatchSize>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(record)?);
    } else {
        println!(
            "#{} batch_size={} enabled={} changed_by={} at {}",
            record.id,
            record.value.batch_size,
            record.enabled,
            record.changed_by.as_deref().unwrap_or("-"),
            record.change_date.to_rfc3339(),
        );
    }
    Ok(())
}
