//! External market data access.
//!
//! - FRED observations client + the `RateSource` seam (`fred`)
//! - explicit fetch memoization (`cache`)

pub mod cache;
pub mod fred;

pub use cache::*;
pub use fred::*;
