//! EsgLedger-Core: the persistence, aggregation, and export engine behind
//! an ESG reporting portal.
//!
//! - One SQLite table of ESG records, one row per (organization, year),
//!   written only through [`services::store::MetricsStore`] with bound
//!   parameters.
//! - Reads go through an explicit bounded-staleness cache
//!   ([`services::cache::RecordCache`]); writers invalidate it.
//! - Dashboards and reports consume pure reductions from
//!   [`services::aggregate`]; downloads come from [`services::export`].
//! - AI insights stay behind the opaque
//!   [`services::advisor::CompletionClient`] boundary.

pub mod config;
pub mod context;
pub mod error;
pub mod portal;
pub mod records;
pub mod services;

pub use config::CoreConfig;
pub use context::Session;
pub use error::StoreError;
pub use portal::Portal;
pub use records::{EsgRecord, RecordDraft, RecordPatch};
