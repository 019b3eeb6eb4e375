//! Work counters for search runs.
//!
//! This module provides structures for collecting and aggregating metrics
//! about search effort, mainly nodes settled and edges relaxed, so the
//! queue backends can be compared on equal inputs.

mod stats;
pub use stats::*;
