//! Core data models for the tournament dashboard.

mod ids;
mod stats;
mod tournament;

pub use ids::*;
pub use stats::*;
pub use tournament::*;
