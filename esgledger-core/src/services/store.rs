// src/services/store.rs
//! Record access layer for the `esg_metrics` table.
//!
//! - Owns a single SQLite connection (WAL) to avoid multi-writer contention.
//! - Every statement binds its values as parameters. No value is ever
//!   interpolated into SQL text.
//! - Performs no business validation beyond the non-empty organization
//!   name; range rules on percentages belong to the layer above.
//! - Update/delete on a missing id return `StoreError::NotFound` rather
//!   than silently succeeding.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, Row, ToSql, params, params_from_iter};
use std::path::Path;

use crate::context::Session;
use crate::error::StoreError;
use crate::records::{COLUMNS, EsgRecord, RecordDraft, RecordPatch};

/// MetricsStore is the single authority for writing to SQLite.
pub struct MetricsStore {
    pub(crate) db: Connection,
}

impl MetricsStore {
    /// Open/create the SQLite DB and ensure schema.
    ///
    /// Behavior:
    /// - Creates the parent directory if missing.
    /// - Opens SQLite and enables WAL (good for 1 writer + many readers).
    /// - Creates the `esg_metrics` table if it doesn't exist. No secondary
    ///   indexes; the implicit rowid primary key is the only one.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }

        let db = Connection::open(db_path)
            .with_context(|| format!("opening database {}", db_path.display()))?;

        db.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS esg_metrics (
              id                          INTEGER PRIMARY KEY AUTOINCREMENT,
              organization_name           TEXT NOT NULL,
              reporting_year              INTEGER NOT NULL,
              reporting_date              TEXT,              -- ISO calendar date
              ghg_scope1_mtco2e           REAL,
              ghg_scope2_mtco2e           REAL,
              ghg_scope3_mtco2e           REAL,
              energy_consumption_mwh      REAL,
              renewable_energy_pct        REAL,
              water_consumption_m3        REAL,
              waste_generated_tons        REAL,
              waste_recycled_pct          REAL,
              total_employees             INTEGER,
              female_employees_pct        REAL,
              employee_turnover_pct       REAL,
              safety_incidents            INTEGER,
              training_hours_per_employee REAL,
              board_size                  INTEGER,
              board_independence_pct      REAL,
              board_female_pct            REAL,
              has_ethics_policy           INTEGER,           -- 0/1
              has_whistleblower_policy    INTEGER,           -- 0/1
              notes                       TEXT,
              created_by                  TEXT NOT NULL,     -- set once
              created_at                  TEXT NOT NULL,     -- RFC3339 UTC, set once
              updated_by                  TEXT,              -- set on every mutation
              updated_at                  TEXT               -- RFC3339 UTC
            );
            "#,
        )
        .context("creating esg_metrics schema")?;

        tracing::debug!(path = %db_path.display(), "metrics store opened");
        Ok(Self { db })
    }

    /// Every record, newest reporting year first, organization name as the
    /// tiebreaker. This is the ordering all list views and exports share.
    pub fn list_all(&self) -> Result<Vec<EsgRecord>, StoreError> {
        let sql = select_sql("ORDER BY reporting_year DESC, organization_name");
        let mut stmt = self.db.prepare(&sql)?;
        let rows = stmt.query_map([], record_from_row)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Point lookup. A missing row is `Ok(None)`, not an error.
    pub fn get(&self, id: i64) -> Result<Option<EsgRecord>, StoreError> {
        let sql = select_sql("WHERE id = ?1");
        let mut stmt = self.db.prepare(&sql)?;
        let mut rows = stmt.query_map([id], record_from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Insert a new record. `created_by`/`created_at` come from the session
    /// and the clock; the update audit columns start NULL. Returns the
    /// assigned id.
    pub fn create(&self, draft: &RecordDraft, session: &Session) -> Result<i64, StoreError> {
        if draft.organization_name.trim().is_empty() {
            return Err(StoreError::Validation(
                "organization name must not be empty".into(),
            ));
        }

        self.db.execute(
            r#"
            INSERT INTO esg_metrics (
              organization_name, reporting_year, reporting_date,
              ghg_scope1_mtco2e, ghg_scope2_mtco2e, ghg_scope3_mtco2e,
              energy_consumption_mwh, renewable_energy_pct,
              water_consumption_m3, waste_generated_tons, waste_recycled_pct,
              total_employees, female_employees_pct, employee_turnover_pct,
              safety_incidents, training_hours_per_employee,
              board_size, board_independence_pct, board_female_pct,
              has_ethics_policy, has_whistleblower_policy, notes,
              created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                      ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22,
                      ?23, ?24)
            "#,
            params![
                draft.organization_name,
                draft.reporting_year,
                draft.reporting_date,
                draft.ghg_scope1_mtco2e,
                draft.ghg_scope2_mtco2e,
                draft.ghg_scope3_mtco2e,
                draft.energy_consumption_mwh,
                draft.renewable_energy_pct,
                draft.water_consumption_m3,
                draft.waste_generated_tons,
                draft.waste_recycled_pct,
                draft.total_employees,
                draft.female_employees_pct,
                draft.employee_turnover_pct,
                draft.safety_incidents,
                draft.training_hours_per_employee,
                draft.board_size,
                draft.board_independence_pct,
                draft.board_female_pct,
                draft.has_ethics_policy,
                draft.has_whistleblower_policy,
                draft.notes,
                session.user,
                Utc::now(),
            ],
        )?;
        Ok(self.db.last_insert_rowid())
    }

    /// Overwrite exactly the supplied patch fields plus the update audit
    /// columns. An empty patch still refreshes `updated_by`/`updated_at`.
    /// The SET list is assembled from column names only; every value is
    /// bound.
    pub fn update(
        &self,
        id: i64,
        patch: &RecordPatch,
        session: &Session,
    ) -> Result<(), StoreError> {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = &patch.organization_name {
            push_set(&mut sets, &mut values, "organization_name", Box::new(v.clone()));
        }
        if let Some(v) = &patch.reporting_year {
            push_set(&mut sets, &mut values, "reporting_year", Box::new(*v));
        }
        if let Some(v) = &patch.reporting_date {
            push_set(&mut sets, &mut values, "reporting_date", Box::new(*v));
        }
        if let Some(v) = &patch.ghg_scope1_mtco2e {
            push_set(&mut sets, &mut values, "ghg_scope1_mtco2e", Box::new(*v));
        }
        if let Some(v) = &patch.ghg_scope2_mtco2e {
            push_set(&mut sets, &mut values, "ghg_scope2_mtco2e", Box::new(*v));
        }
        if let Some(v) = &patch.ghg_scope3_mtco2e {
            push_set(&mut sets, &mut values, "ghg_scope3_mtco2e", Box::new(*v));
        }
        if let Some(v) = &patch.energy_consumption_mwh {
            push_set(&mut sets, &mut values, "energy_consumption_mwh", Box::new(*v));
        }
        if let Some(v) = &patch.renewable_energy_pct {
            push_set(&mut sets, &mut values, "renewable_energy_pct", Box::new(*v));
        }
        if let Some(v) = &patch.water_consumption_m3 {
            push_set(&mut sets, &mut values, "water_consumption_m3", Box::new(*v));
        }
        if let Some(v) = &patch.waste_generated_tons {
            push_set(&mut sets, &mut values, "waste_generated_tons", Box::new(*v));
        }
        if let Some(v) = &patch.waste_recycled_pct {
            push_set(&mut sets, &mut values, "waste_recycled_pct", Box::new(*v));
        }
        if let Some(v) = &patch.total_employees {
            push_set(&mut sets, &mut values, "total_employees", Box::new(*v));
        }
        if let Some(v) = &patch.female_employees_pct {
            push_set(&mut sets, &mut values, "female_employees_pct", Box::new(*v));
        }
        if let Some(v) = &patch.employee_turnover_pct {
            push_set(&mut sets, &mut values, "employee_turnover_pct", Box::new(*v));
        }
        if let Some(v) = &patch.safety_incidents {
            push_set(&mut sets, &mut values, "safety_incidents", Box::new(*v));
        }
        if let Some(v) = &patch.training_hours_per_employee {
            push_set(&mut sets, &mut values, "training_hours_per_employee", Box::new(*v));
        }
        if let Some(v) = &patch.board_size {
            push_set(&mut sets, &mut values, "board_size", Box::new(*v));
        }
        if let Some(v) = &patch.board_independence_pct {
            push_set(&mut sets, &mut values, "board_independence_pct", Box::new(*v));
        }
        if let Some(v) = &patch.board_female_pct {
            push_set(&mut sets, &mut values, "board_female_pct", Box::new(*v));
        }
        if let Some(v) = &patch.has_ethics_policy {
            push_set(&mut sets, &mut values, "has_ethics_policy", Box::new(*v));
        }
        if let Some(v) = &patch.has_whistleblower_policy {
            push_set(&mut sets, &mut values, "has_whistleblower_policy", Box::new(*v));
        }
        if let Some(v) = &patch.notes {
            push_set(&mut sets, &mut values, "notes", Box::new(v.clone()));
        }

        push_set(&mut sets, &mut values, "updated_by", Box::new(session.user.clone()));
        push_set(&mut sets, &mut values, "updated_at", Box::new(Utc::now()));

        let sql = format!(
            "UPDATE esg_metrics SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len() + 1
        );
        values.push(Box::new(id));

        let changed = self
            .db
            .execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Hard delete. No tombstone; a missing row is `NotFound`.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .db
            .execute("DELETE FROM esg_metrics WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Reporting years present in the store, newest first. Feeds filter
    /// controls.
    pub fn distinct_years(&self) -> Result<Vec<i32>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT DISTINCT reporting_year FROM esg_metrics
             ORDER BY reporting_year DESC",
        )?;
        let rows = stmt.query_map([], |r| r.get::<_, i32>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Organization names present in the store, sorted ascending.
    pub fn distinct_organizations(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT DISTINCT organization_name FROM esg_metrics
             ORDER BY organization_name",
        )?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let mut stmt = self.db.prepare("SELECT COUNT(*) FROM esg_metrics")?;
        let cnt: i64 = stmt.query_row([], |r| r.get(0))?;
        Ok(cnt as u64)
    }
}

fn select_sql(tail: &str) -> String {
    format!("SELECT {} FROM esg_metrics {}", COLUMNS.join(", "), tail)
}

fn push_set(
    sets: &mut Vec<String>,
    values: &mut Vec<Box<dyn ToSql>>,
    column: &str,
    value: Box<dyn ToSql>,
) {
    values.push(value);
    sets.push(format!("{column} = ?{}", values.len()));
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<EsgRecord> {
    Ok(EsgRecord {
        id: row.get(0)?,
        organization_name: row.get(1)?,
        reporting_year: row.get(2)?,
        reporting_date: row.get(3)?,
        ghg_scope1_mtco2e: row.get(4)?,
        ghg_scope2_mtco2e: row.get(5)?,
        ghg_scope3_mtco2e: row.get(6)?,
        energy_consumption_mwh: row.get(7)?,
        renewable_energy_pct: row.get(8)?,
        water_consumption_m3: row.get(9)?,
        waste_generated_tons: row.get(10)?,
        waste_recycled_pct: row.get(11)?,
        total_employees: row.get(12)?,
        female_employees_pct: row.get(13)?,
        employee_turnover_pct: row.get(14)?,
        safety_incidents: row.get(15)?,
        training_hours_per_employee: row.get(16)?,
        board_size: row.get(17)?,
        board_independence_pct: row.get(18)?,
        board_female_pct: row.get(19)?,
        has_ethics_policy: row.get(20)?,
        has_whistleblower_policy: row.get(21)?,
        notes: row.get(22)?,
        created_by: row.get(23)?,
        created_at: row.get(24)?,
        updated_by: row.get(25)?,
        updated_at: row.get(26)?,
    })
}
