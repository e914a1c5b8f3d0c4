//! Input/output helpers.
//!
//! - historical sheet ingest + validation (`ingest`)
//! - merged-frame CSV export/reload (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
