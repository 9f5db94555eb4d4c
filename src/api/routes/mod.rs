pub mod analytics;
pub mod filters;
pub mod tournaments;
