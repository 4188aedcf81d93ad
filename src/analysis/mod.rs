//! Analysis modules.
//!
//! Statistics and grouping helpers shared by the council agents.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
