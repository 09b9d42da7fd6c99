//! Core business logic abstractions

pub mod config;
pub mod fetch;
pub mod history;
pub mod log;

// Re-export main types for cleaner imports
pub use fetch::{FetchError, ProductFetcher, ProductSnapshot};
pub use history::{PriceHistory, PriceObservation, RecordOutcome};
