//! Analytics engine.
//!
//! Pure functions over an immutable tournament snapshot:
//! - Game filtering against the current selection
//! - Cumulative per-team series (race chart)
//! - Standings and per-player summaries (damage analysis, scatter plot)

mod cumulative;
mod filter;
mod standings;

pub use cumulative::*;
pub use filter::*;
pub use standings::*;
