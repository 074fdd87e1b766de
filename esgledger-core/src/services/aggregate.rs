// src/services/aggregate.rs
//! Pure reductions over the record set for dashboards and reports.
//!
//! Nothing here touches the store. Percentage means skip missing values
//! and report `None` for empty groups; sums treat missing values as zero.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::records::EsgRecord;

/// Headline numbers for the dashboard. Emissions and renewable figures are
/// restricted to the latest reporting year present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub total_organizations: usize,
    pub total_years: usize,
    pub latest_year: Option<i32>,
    /// Scope 1 + scope 2 for the latest year, missing scopes counted as 0.
    pub latest_emissions_mtco2e: f64,
    /// Mean renewable % for the latest year; `None` means no data, not 0.
    pub avg_renewable_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionsYear {
    pub year: i32,
    pub scope1_mtco2e: f64,
    pub scope2_mtco2e: f64,
    pub total_mtco2e: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityYear {
    pub year: i32,
    pub avg_female_pct: Option<f64>,
    pub total_employees: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardYear {
    pub year: i32,
    pub avg_independence_pct: Option<f64>,
    pub avg_female_pct: Option<f64>,
}

/// Policy adoption counts in the latest reporting year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyAdoption {
    pub year: i32,
    pub ethics_policy: usize,
    pub whistleblower_policy: usize,
}

/// Subset matching both predicates, ordered year-desc then name-asc.
/// `Some("All")` for the organization is the UI sentinel for "no filter".
pub fn filter(
    records: &[EsgRecord],
    organization: Option<&str>,
    year: Option<i32>,
) -> Vec<EsgRecord> {
    let organization = organization.filter(|o| *o != "All");
    let mut out: Vec<EsgRecord> = records
        .iter()
        .filter(|r| organization.is_none_or(|o| r.organization_name == o))
        .filter(|r| year.is_none_or(|y| r.reporting_year == y))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        b.reporting_year
            .cmp(&a.reporting_year)
            .then_with(|| a.organization_name.cmp(&b.organization_name))
    });
    out
}

pub fn summary_stats(records: &[EsgRecord]) -> SummaryStats {
    let mut organizations = BTreeSet::new();
    let mut years = BTreeSet::new();
    for r in records {
        organizations.insert(r.organization_name.as_str());
        years.insert(r.reporting_year);
    }
    let latest_year = years.iter().next_back().copied();

    let latest: Vec<&EsgRecord> = match latest_year {
        Some(y) => records.iter().filter(|r| r.reporting_year == y).collect(),
        None => Vec::new(),
    };
    let latest_emissions_mtco2e = latest
        .iter()
        .map(|r| r.ghg_scope1_mtco2e.unwrap_or(0.0) + r.ghg_scope2_mtco2e.unwrap_or(0.0))
        .sum();
    let avg_renewable_pct = mean(latest.iter().map(|r| r.renewable_energy_pct));

    SummaryStats {
        total_records: records.len(),
        total_organizations: organizations.len(),
        total_years: years.len(),
        latest_year,
        latest_emissions_mtco2e,
        avg_renewable_pct,
    }
}

/// Scope 1/2 sums per year, ascending. Missing scopes count as zero so the
/// stacked totals stay comparable across years.
pub fn emissions_by_year(records: &[EsgRecord]) -> Vec<EmissionsYear> {
    by_year(records)
        .into_iter()
        .map(|(year, group)| {
            let scope1: f64 = group.iter().filter_map(|r| r.ghg_scope1_mtco2e).sum();
            let scope2: f64 = group.iter().filter_map(|r| r.ghg_scope2_mtco2e).sum();
            EmissionsYear {
                year,
                scope1_mtco2e: scope1,
                scope2_mtco2e: scope2,
                total_mtco2e: scope1 + scope2,
            }
        })
        .collect()
}

/// Mean renewable-energy % per year, ascending. `None` = no data that year.
pub fn renewable_by_year(records: &[EsgRecord]) -> Vec<(i32, Option<f64>)> {
    by_year(records)
        .into_iter()
        .map(|(year, group)| (year, mean(group.iter().map(|r| r.renewable_energy_pct))))
        .collect()
}

pub fn diversity_by_year(records: &[EsgRecord]) -> Vec<DiversityYear> {
    by_year(records)
        .into_iter()
        .map(|(year, group)| DiversityYear {
            year,
            avg_female_pct: mean(group.iter().map(|r| r.female_employees_pct)),
            total_employees: group.iter().filter_map(|r| r.total_employees).sum(),
        })
        .collect()
}

/// Summed safety incidents per year, ascending.
pub fn safety_by_year(records: &[EsgRecord]) -> Vec<(i32, i64)> {
    by_year(records)
        .into_iter()
        .map(|(year, group)| (year, group.iter().filter_map(|r| r.safety_incidents).sum()))
        .collect()
}

pub fn board_by_year(records: &[EsgRecord]) -> Vec<BoardYear> {
    by_year(records)
        .into_iter()
        .map(|(year, group)| BoardYear {
            year,
            avg_independence_pct: mean(group.iter().map(|r| r.board_independence_pct)),
            avg_female_pct: mean(group.iter().map(|r| r.board_female_pct)),
        })
        .collect()
}

/// How many organizations reported each policy in the latest year.
/// `None` when the record set is empty.
pub fn policy_adoption(records: &[EsgRecord]) -> Option<PolicyAdoption> {
    let year = records.iter().map(|r| r.reporting_year).max()?;
    let latest = records.iter().filter(|r| r.reporting_year == year);
    let mut ethics = 0;
    let mut whistleblower = 0;
    for r in latest {
        if r.has_ethics_policy == Some(true) {
            ethics += 1;
        }
        if r.has_whistleblower_policy == Some(true) {
            whistleblower += 1;
        }
    }
    Some(PolicyAdoption {
        year,
        ethics_policy: ethics,
        whistleblower_policy: whistleblower,
    })
}

/// Arithmetic mean over the non-missing values; `None` when every value is
/// missing. Callers must render that as "no data", never as zero.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values.into_iter().flatten() {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

fn by_year(records: &[EsgRecord]) -> BTreeMap<i32, Vec<&EsgRecord>> {
    let mut groups: BTreeMap<i32, Vec<&EsgRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.reporting_year).or_default().push(r);
    }
    groups
}
