//! # Apex Dashboard
//!
//! Analytics backend for an esports tournament dashboard.
//!
//! ## Architecture
//!
//! - **models**: Tournament snapshot and derived statistics types
//! - **selection**: Which games are included in analysis
//! - **calculate**: Filtering, cumulative series, standings
//! - **fetch**: Remote data source with seeded synthetic fallback
//! - **store**: Dashboard state, derived views and load sequencing
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod selection;
pub mod store;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num.checked_mul(multiplier)?))
}
