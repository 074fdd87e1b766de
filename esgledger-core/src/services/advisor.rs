// src/services/advisor.rs
//! Advisory boundary: natural-language Q&A over the aggregated data via a
//! hosted completion model. The model is an opaque external capability
//! behind `CompletionClient`; nothing here is under this system's control,
//! and no data flows back into the store from this path.

use anyhow::Result;

use crate::records::EsgRecord;
use crate::services::aggregate::{self, mean};

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet";

/// One synchronous call to a hosted text-completion service. Implemented
/// by the hosting environment; tests use scripted stubs.
pub trait CompletionClient {
    fn complete(&self, model: &str, prompt: &str) -> Result<String>;
}

/// Complete the analyst prompt for `question`. A client failure is embedded
/// in the returned text rather than raised, matching the display-only role
/// of this path.
pub fn ask<C: CompletionClient>(
    client: &C,
    model: &str,
    records: &[EsgRecord],
    question: &str,
) -> String {
    let prompt = analyst_prompt(&data_summary(records), question);
    match client.complete(model, &prompt) {
        Ok(text) => text,
        Err(e) => format!("Error querying completion model: {e}"),
    }
}

/// Text summary of the record set, embedded in prompts as data context.
pub fn data_summary(records: &[EsgRecord]) -> String {
    if records.is_empty() {
        return "No ESG data available.".to_string();
    }

    let stats = aggregate::summary_stats(records);
    let min_year = records.iter().map(|r| r.reporting_year).min();
    let max_year = records.iter().map(|r| r.reporting_year).max();

    let mut parts = vec![
        "ESG Data Summary:".to_string(),
        format!("- Total records: {}", stats.total_records),
        format!("- Organizations: {}", stats.total_organizations),
    ];
    if let (Some(first), Some(last)) = (min_year, max_year) {
        parts.push(format!("- Years covered: {first} to {last}"));
    }
    parts.push(format!(
        "- Latest year total GHG emissions: {:.0} mtCO2e",
        stats.latest_emissions_mtco2e
    ));
    if let Some(avg) = stats.avg_renewable_pct {
        parts.push(format!("- Latest year avg renewable energy: {avg:.1}%"));
    }

    if let Some(year) = stats.latest_year {
        let latest: Vec<&EsgRecord> = records
            .iter()
            .filter(|r| r.reporting_year == year)
            .collect();
        let employees: i64 = latest.iter().filter_map(|r| r.total_employees).sum();
        if employees > 0 {
            parts.push(format!("- Latest year total employees: {employees}"));
        }
        if let Some(avg) = mean(latest.iter().map(|r| r.female_employees_pct)) {
            parts.push(format!("- Latest year avg female representation: {avg:.1}%"));
        }
    }

    // Scope-1 trend from the first to the last reporting year.
    if let (Some(first), Some(last)) = (min_year, max_year) {
        if first != last {
            let sum_for = |year: i32| -> f64 {
                records
                    .iter()
                    .filter(|r| r.reporting_year == year)
                    .filter_map(|r| r.ghg_scope1_mtco2e)
                    .sum()
            };
            let first_emissions = sum_for(first);
            let last_emissions = sum_for(last);
            let change = if first_emissions > 0.0 {
                (last_emissions - first_emissions) / first_emissions * 100.0
            } else {
                0.0
            };
            parts.push(format!(
                "- Emissions trend ({first} to {last}): {change:+.1}%"
            ));
        }
    }

    parts.join("\n")
}

/// The ESG-analyst prompt wrapping the data context and the user question.
pub fn analyst_prompt(data_context: &str, question: &str) -> String {
    format!(
        "You are an ESG (Environmental, Social, Governance) analyst.\n\
         Based on the following ESG data summary, answer the user's question.\n\
         Be specific, cite numbers when available, and provide actionable insights.\n\
         \n\
         {data_context}\n\
         \n\
         User Question: {question}\n\
         \n\
         Provide a clear, professional response:"
    )
}
