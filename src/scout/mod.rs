// src/scout/mod.rs

pub mod cache;
pub mod fetch;
pub mod report;

pub use cache::{CacheStats, ScoutCache};
pub use fetch::{FetchError, ScoutFetcher, ScoutSource, Transport};
pub use report::ScoutRecord;
