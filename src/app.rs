//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the historical sheet
//! - runs the analysis pipeline (window, stats, FRED context, events, merge)
//! - prints the report
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, ListArgs};
use crate::data::cache::FetchCache;
use crate::data::fred::{FredClient, RateSource};
use crate::domain::AnalyzeConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `srs` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::List(args) => handle_list(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analyze_config_from_args(&args);
    let table = crate::io::ingest::load_table(&config.csv_path)?;

    let structure = match &config.structure {
        Some(name) => name.clone(),
        None => table
            .structure_names()
            .first()
            .cloned()
            .ok_or_else(|| AppError::load("No selectable structure columns in sheet."))?,
    };

    // A missing API key degrades to an offline run rather than failing:
    // the analysis itself never depends on the fetch succeeding.
    let mut key_note = None;
    let source: Option<FetchCache<FredClient>> = if config.offline {
        None
    } else {
        match FredClient::from_env() {
            Ok(client) => Some(FetchCache::new(client)),
            Err(e) => {
                key_note = Some(e.to_string());
                None
            }
        }
    };
    let source_ref: Option<&dyn RateSource> = source.as_ref().map(|s| s as &dyn RateSource);

    let run = pipeline::run_analysis(&table, &structure, source_ref)?;

    if let Some(note) = key_note {
        eprintln!("note: {note}");
    }
    println!("{}", crate::report::format_analysis(&run, &table));

    if let Some(path) = &config.export {
        crate::io::export::write_frame_csv(path, &run.frame)?;
        println!("Merged frame for {} written to {}.", run.structure, path.display());
    }

    Ok(())
}

fn handle_list(args: ListArgs) -> Result<(), AppError> {
    let table = crate::io::ingest::load_table(&args.csv)?;
    print!("{}", crate::report::format_structure_list(&table));
    Ok(())
}

fn analyze_config_from_args(args: &AnalyzeArgs) -> AnalyzeConfig {
    AnalyzeConfig {
        csv_path: args.csv.clone(),
        structure: args.structure.clone(),
        offline: args.offline,
        export: args.export.clone(),
    }
}
