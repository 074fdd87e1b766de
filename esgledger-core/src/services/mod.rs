// src/services/mod.rs

pub mod advisor;    // opaque completion boundary for AI insights
pub mod aggregate;  // pure reductions for dashboards and reports
pub mod audit;      // JSONL action logbook
pub mod cache;      // bounded-staleness read cache
pub mod export;     // CSV + compliance report writers
pub mod store;      // the ONLY SQLite writer

// Public API
pub use advisor::CompletionClient;
pub use cache::RecordCache;
pub use store::MetricsStore;
