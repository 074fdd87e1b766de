// src/portal.rs
//! Portal: the single entry point the presentation layer talks to.
//! Wires the store, the read cache, the acting session, and the logbook.
//! Mutations invalidate the cache synchronously before returning.

use anyhow::Result;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::CoreConfig;
use crate::context::Session;
use crate::error::StoreError;
use crate::records::{EsgRecord, RecordDraft, RecordPatch};
use crate::services::advisor::{self, CompletionClient};
use crate::services::aggregate::{self, SummaryStats};
use crate::services::audit::record_action;
use crate::services::cache::RecordCache;
use crate::services::export;
use crate::services::store::MetricsStore;

pub struct Portal {
    store: MetricsStore,
    cache: RecordCache,
    session: Session,
    logbook: Option<PathBuf>, // None when auditing is switched off
    advisor_model: String,
}

impl Portal {
    /// Load (or default) the config under `root` and open the portal there.
    pub fn open(root: &Path, session: Session) -> Result<Self> {
        let cfg = CoreConfig::load(root)?;
        Self::with_config(&cfg, session)
    }

    pub fn with_config(cfg: &CoreConfig, session: Session) -> Result<Self> {
        let store = MetricsStore::open(&cfg.database.path)?;
        let cache = RecordCache::new(Duration::from_secs(cfg.cache.ttl_secs));
        let logbook = cfg
            .services
            .audit_enabled
            .then(|| cfg.logbook.actions.clone());
        Ok(Self {
            store,
            cache,
            session,
            logbook,
            advisor_model: cfg.advisor.model.clone(),
        })
    }

    /// The full record set through the read cache. Within the TTL this does
    /// not see other writers; same-portal writes invalidate first, so
    /// read-after-own-write always holds.
    pub fn records(&mut self) -> Result<Vec<EsgRecord>> {
        let store = &self.store;
        let rows = self.cache.get_or_refresh(|| store.list_all())?;
        Ok(rows.to_vec())
    }

    /// Point lookup, straight from the store.
    pub fn record(&self, id: i64) -> Result<Option<EsgRecord>> {
        Ok(self.store.get(id)?)
    }

    pub fn create(&mut self, draft: &RecordDraft) -> Result<i64> {
        let id = self.store.create(draft, &self.session)?;
        self.cache.invalidate();
        self.log(
            "record_created",
            &json!({
                "id": id,
                "organization": draft.organization_name,
                "year": draft.reporting_year,
            }),
            "low",
        );
        Ok(id)
    }

    /// Partial update. A missing id surfaces as an error here; typo'd ids
    /// on an edit path are worth hearing about.
    pub fn update(&mut self, id: i64, patch: &RecordPatch) -> Result<()> {
        self.store.update(id, patch, &self.session)?;
        self.cache.invalidate();
        self.log("record_updated", &json!({ "id": id }), "low");
        Ok(())
    }

    /// Delete. A missing id is a logged no-op: deleting twice from two
    /// stale views should not error at the user.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        match self.store.delete(id) {
            Ok(()) => {
                self.cache.invalidate();
                self.log("record_deleted", &json!({ "id": id }), "low");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                self.log("delete_noop", &json!({ "id": id }), "medium");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cached records narrowed to the optional predicates, report order.
    pub fn filtered(
        &mut self,
        organization: Option<&str>,
        year: Option<i32>,
    ) -> Result<Vec<EsgRecord>> {
        let store = &self.store;
        let rows = self.cache.get_or_refresh(|| store.list_all())?;
        Ok(aggregate::filter(rows, organization, year))
    }

    pub fn summary(&mut self) -> Result<SummaryStats> {
        let store = &self.store;
        let rows = self.cache.get_or_refresh(|| store.list_all())?;
        Ok(aggregate::summary_stats(rows))
    }

    pub fn years(&self) -> Result<Vec<i32>> {
        Ok(self.store.distinct_years()?)
    }

    pub fn organizations(&self) -> Result<Vec<String>> {
        Ok(self.store.distinct_organizations()?)
    }

    pub fn export_csv(&mut self, organization: Option<&str>, year: Option<i32>) -> Result<Vec<u8>> {
        let rows = self.filtered(organization, year)?;
        let bytes = export::to_csv(&rows)?;
        self.log(
            "csv_exported",
            &json!({ "rows": rows.len(), "organization": organization, "year": year }),
            "low",
        );
        Ok(bytes)
    }

    pub fn compliance_report(
        &mut self,
        organization: Option<&str>,
        year: Option<i32>,
    ) -> Result<String> {
        let rows = self.filtered(organization, year)?;
        let org_label = organization.unwrap_or("All");
        let year_label = year.map_or_else(|| "All".to_string(), |y| y.to_string());
        let text = export::compliance_report(&rows, org_label, &year_label);
        self.log(
            "report_generated",
            &json!({ "rows": rows.len(), "organization": org_label, "year": year_label }),
            "low",
        );
        Ok(text)
    }

    /// Ask the advisory model a question over the current data. Client
    /// failures come back as text inside the answer, never as an Err.
    pub fn ask<C: CompletionClient>(&mut self, client: &C, question: &str) -> Result<String> {
        let rows = self.records()?;
        let answer = advisor::ask(client, &self.advisor_model, &rows, question);
        self.log(
            "advisor_asked",
            &json!({ "model": self.advisor_model, "question_chars": question.len() }),
            "low",
        );
        Ok(answer)
    }

    fn log(&self, action: &str, details: &serde_json::Value, severity: &str) {
        if let Some(path) = &self.logbook {
            record_action(path, "portal", action, details, severity);
        }
    }
}
