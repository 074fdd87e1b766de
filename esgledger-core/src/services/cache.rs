// src/services/cache.rs
//! Bounded-staleness read cache for the full record set.
//!
//! Replaces ambient cached-query state with an explicit component: callers
//! get `get_or_refresh` and `invalidate`, and the staleness bound is the
//! configured TTL. Writers must invalidate on every successful mutation;
//! without that, readers may observe data up to one TTL old.

use std::time::{Duration, Instant};

use crate::error::StoreError;
use crate::records::EsgRecord;

pub struct RecordCache {
    ttl: Duration,
    slot: Option<Snapshot>,
}

struct Snapshot {
    fetched_at: Instant,
    records: Vec<EsgRecord>,
}

impl RecordCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    /// Serve the cached snapshot while it is younger than the TTL;
    /// otherwise run `fetch` and cache its result with a fresh timestamp.
    pub fn get_or_refresh<F>(&mut self, fetch: F) -> Result<&[EsgRecord], StoreError>
    where
        F: FnOnce() -> Result<Vec<EsgRecord>, StoreError>,
    {
        if !self.is_fresh() {
            let records = fetch()?;
            tracing::debug!(rows = records.len(), "record cache refreshed");
            self.slot = Some(Snapshot {
                fetched_at: Instant::now(),
                records,
            });
        }
        match &self.slot {
            Some(snap) => Ok(&snap.records),
            None => unreachable!("slot is filled on every miss"),
        }
    }

    /// Drop the snapshot. Called after every successful create/update/
    /// delete so the next read goes back to the store.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// True while a snapshot exists and is younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|s| s.fetched_at.elapsed() < self.ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
