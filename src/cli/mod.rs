//! Command-line parsing for the structure analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "srs", version, about = "SR3-SR1 Structure Analyzer (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one structure column: window, statistics, market context.
    Analyze(AnalyzeArgs),
    /// List the selectable structure columns of a historical sheet.
    List(ListArgs),
}

/// Options for a single analysis run.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Path to the historical data sheet (CSV with a Timestamp column).
    pub csv: PathBuf,

    /// Structure column to analyze (defaults to the first selectable column).
    #[arg(short = 's', long)]
    pub structure: Option<String>,

    /// Skip the FRED fetch and run a structure-only analysis.
    #[arg(long)]
    pub offline: bool,

    /// Export the merged frame (date, structure, reference) to this CSV path.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for listing structures.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Path to the historical data sheet.
    pub csv: PathBuf,
}
