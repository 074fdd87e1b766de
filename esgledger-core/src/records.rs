//! Record types for the `esg_metrics` table.
//!
//! One row per (organization, reporting year). Metric columns are nullable;
//! a missing value means "not reported", never zero. Audit columns are
//! stamped by the store, not by callers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Column names in native table order. Shared by the store's SELECTs and
/// the CSV header so the two can never drift apart.
pub const COLUMNS: [&str; 27] = [
    "id",
    "organization_name",
    "reporting_year",
    "reporting_date",
    "ghg_scope1_mtco2e",
    "ghg_scope2_mtco2e",
    "ghg_scope3_mtco2e",
    "energy_consumption_mwh",
    "renewable_energy_pct",
    "water_consumption_m3",
    "waste_generated_tons",
    "waste_recycled_pct",
    "total_employees",
    "female_employees_pct",
    "employee_turnover_pct",
    "safety_incidents",
    "training_hours_per_employee",
    "board_size",
    "board_independence_pct",
    "board_female_pct",
    "has_ethics_policy",
    "has_whistleblower_policy",
    "notes",
    "created_by",
    "created_at",
    "updated_by",
    "updated_at",
];

/// A stored ESG record, identity and audit columns included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsgRecord {
    pub id: i64,
    pub organization_name: String,
    pub reporting_year: i32,
    pub reporting_date: Option<NaiveDate>,

    // Environmental
    pub ghg_scope1_mtco2e: Option<f64>,
    pub ghg_scope2_mtco2e: Option<f64>,
    pub ghg_scope3_mtco2e: Option<f64>,
    pub energy_consumption_mwh: Option<f64>,
    pub renewable_energy_pct: Option<f64>,
    pub water_consumption_m3: Option<f64>,
    pub waste_generated_tons: Option<f64>,
    pub waste_recycled_pct: Option<f64>,

    // Social
    pub total_employees: Option<i64>,
    pub female_employees_pct: Option<f64>,
    pub employee_turnover_pct: Option<f64>,
    pub safety_incidents: Option<i64>,
    pub training_hours_per_employee: Option<f64>,

    // Governance
    pub board_size: Option<i64>,
    pub board_independence_pct: Option<f64>,
    pub board_female_pct: Option<f64>,
    pub has_ethics_policy: Option<bool>,
    pub has_whistleblower_policy: Option<bool>,
    pub notes: Option<String>,

    // Audit. Creation columns are set once; update columns change on every
    // mutation and stay NULL until the first one.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable fields for `create`. Everything the data-entry form collects;
/// the store fills identity and audit columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordDraft {
    pub organization_name: String,
    pub reporting_year: i32,
    #[serde(default)]
    pub reporting_date: Option<NaiveDate>,
    #[serde(default)]
    pub ghg_scope1_mtco2e: Option<f64>,
    #[serde(default)]
    pub ghg_scope2_mtco2e: Option<f64>,
    #[serde(default)]
    pub ghg_scope3_mtco2e: Option<f64>,
    #[serde(default)]
    pub energy_consumption_mwh: Option<f64>,
    #[serde(default)]
    pub renewable_energy_pct: Option<f64>,
    #[serde(default)]
    pub water_consumption_m3: Option<f64>,
    #[serde(default)]
    pub waste_generated_tons: Option<f64>,
    #[serde(default)]
    pub waste_recycled_pct: Option<f64>,
    #[serde(default)]
    pub total_employees: Option<i64>,
    #[serde(default)]
    pub female_employees_pct: Option<f64>,
    #[serde(default)]
    pub employee_turnover_pct: Option<f64>,
    #[serde(default)]
    pub safety_incidents: Option<i64>,
    #[serde(default)]
    pub training_hours_per_employee: Option<f64>,
    #[serde(default)]
    pub board_size: Option<i64>,
    #[serde(default)]
    pub board_independence_pct: Option<f64>,
    #[serde(default)]
    pub board_female_pct: Option<f64>,
    #[serde(default)]
    pub has_ethics_policy: Option<bool>,
    #[serde(default)]
    pub has_whistleblower_policy: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update. The outer `Option` means "was this field supplied";
/// nullable columns nest a second `Option` so a patch can set NULL without
/// colliding with "leave alone".
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub organization_name: Option<String>,
    pub reporting_year: Option<i32>,
    pub reporting_date: Option<Option<NaiveDate>>,
    pub ghg_scope1_mtco2e: Option<Option<f64>>,
    pub ghg_scope2_mtco2e: Option<Option<f64>>,
    pub ghg_scope3_mtco2e: Option<Option<f64>>,
    pub energy_consumption_mwh: Option<Option<f64>>,
    pub renewable_energy_pct: Option<Option<f64>>,
    pub water_consumption_m3: Option<Option<f64>>,
    pub waste_generated_tons: Option<Option<f64>>,
    pub waste_recycled_pct: Option<Option<f64>>,
    pub total_employees: Option<Option<i64>>,
    pub female_employees_pct: Option<Option<f64>>,
    pub employee_turnover_pct: Option<Option<f64>>,
    pub safety_incidents: Option<Option<i64>>,
    pub training_hours_per_employee: Option<Option<f64>>,
    pub board_size: Option<Option<i64>>,
    pub board_independence_pct: Option<Option<f64>>,
    pub board_female_pct: Option<Option<f64>>,
    pub has_ethics_policy: Option<Option<bool>>,
    pub has_whistleblower_policy: Option<Option<bool>>,
    pub notes: Option<Option<String>>,
}

impl RecordPatch {
    /// True when no writable field was supplied. The store still refreshes
    /// the update audit columns for an empty patch.
    pub fn is_empty(&self) -> bool {
        self.organization_name.is_none()
            && self.reporting_year.is_none()
            && self.reporting_date.is_none()
            && self.ghg_scope1_mtco2e.is_none()
            && self.ghg_scope2_mtco2e.is_none()
            && self.ghg_scope3_mtco2e.is_none()
            && self.energy_consumption_mwh.is_none()
            && self.renewable_energy_pct.is_none()
            && self.water_consumption_m3.is_none()
            && self.waste_generated_tons.is_none()
            && self.waste_recycled_pct.is_none()
            && self.total_employees.is_none()
            && self.female_employees_pct.is_none()
            && self.employee_turnover_pct.is_none()
            && self.safety_incidents.is_none()
            && self.training_hours_per_employee.is_none()
            && self.board_size.is_none()
            && self.board_independence_pct.is_none()
            && self.board_female_pct.is_none()
            && self.has_ethics_policy.is_none()
            && self.has_whistleblower_policy.is_none()
            && self.notes.is_none()
    }
}
