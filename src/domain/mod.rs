//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw observations and per-structure series (`TimePoint`, `StructureSeries`)
//! - the contract-derived analysis window (`AnalysisWindow`)
//! - derived outputs (`RateEvent`, `MergedRow`, `SeriesStats`, `Valuation`)
//! - the resolved run configuration (`AnalyzeConfig`)

pub mod types;

pub use types::*;
