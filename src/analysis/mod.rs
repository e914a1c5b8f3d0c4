//! Analysis core: window resolution, statistics, event detection, alignment.
//!
//! Everything in here is a pure transformation over in-memory series. No
//! module below performs I/O; the orchestration layer (`app::pipeline`) feeds
//! fetched data in as plain values.

pub mod align;
pub mod events;
pub mod stats;
pub mod window;

pub use align::*;
pub use events::*;
pub use stats::*;
pub use window::*;
