//! Publishing loop.
//!
//! - `Mutuber`: resolve the current playlist, scrape, publish the difference

pub mod mutuber;

pub use mutuber::{CycleReport, Mutuber};
