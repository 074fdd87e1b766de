// src/services/export.rs
//! Outward file formats: CSV for spreadsheet tools, a fixed-layout plain
//! text report for regulatory submission. Write-only; nothing here parses
//! these formats back.

use anyhow::Result;
use chrono::Utc;

use crate::records::{COLUMNS, EsgRecord};
use crate::services::aggregate::mean;

const RULE_WIDTH: usize = 60;

/// UTF-8 CSV bytes, no BOM. Header row is the table's native column order;
/// NULL becomes an empty cell.
pub fn to_csv(records: &[EsgRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(COLUMNS)?;
        for r in records {
            wtr.write_record(csv_row(r))?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

/// The compliance report layout: banner, header lines, a summary block,
/// certification footer. A metric section is omitted entirely when its
/// source fields are all missing in the record set.
pub fn compliance_report(
    records: &[EsgRecord],
    organization_label: &str,
    year_label: &str,
) -> String {
    let banner = "=".repeat(RULE_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);

    let mut lines: Vec<String> = vec![
        banner.clone(),
        "ESG COMPLIANCE REPORT".into(),
        banner.clone(),
        String::new(),
        format!("Generated: {}", Utc::now().format("%Y-%m-%d")),
        format!("Organization: {organization_label}"),
        format!("Reporting Period: {year_label}"),
        String::new(),
        rule.clone(),
        "SUMMARY STATISTICS".into(),
        rule.clone(),
        String::new(),
        format!("Total Records: {}", records.len()),
    ];

    if records
        .iter()
        .any(|r| r.ghg_scope1_mtco2e.is_some() || r.ghg_scope2_mtco2e.is_some())
    {
        let scope1: f64 = records.iter().filter_map(|r| r.ghg_scope1_mtco2e).sum();
        let scope2: f64 = records.iter().filter_map(|r| r.ghg_scope2_mtco2e).sum();
        lines.push(String::new());
        lines.push("ENVIRONMENTAL METRICS:".into());
        lines.push(format!(
            "  - Total Scope 1 Emissions: {} mtCO2e",
            grouped(scope1, 2)
        ));
        lines.push(format!(
            "  - Total Scope 2 Emissions: {} mtCO2e",
            grouped(scope2, 2)
        ));
        lines.push(format!(
            "  - Combined Emissions: {} mtCO2e",
            grouped(scope1 + scope2, 2)
        ));
    }

    if let Some(avg) = mean(records.iter().map(|r| r.renewable_energy_pct)) {
        lines.push(format!("  - Average Renewable Energy: {avg:.1}%"));
    }

    if records.iter().any(|r| r.total_employees.is_some()) {
        let workforce: i64 = records.iter().filter_map(|r| r.total_employees).sum();
        let avg_female = mean(records.iter().map(|r| r.female_employees_pct)).unwrap_or(0.0);
        lines.push(String::new());
        lines.push("SOCIAL METRICS:".into());
        lines.push(format!(
            "  - Total Workforce: {}",
            grouped(workforce as f64, 0)
        ));
        lines.push(format!(
            "  - Average Female Representation: {avg_female:.1}%"
        ));
    }

    if records.iter().any(|r| r.board_size.is_some()) {
        let avg_board =
            mean(records.iter().map(|r| r.board_size.map(|n| n as f64))).unwrap_or(0.0);
        let avg_independence =
            mean(records.iter().map(|r| r.board_independence_pct)).unwrap_or(0.0);
        lines.push(String::new());
        lines.push("GOVERNANCE METRICS:".into());
        lines.push(format!("  - Average Board Size: {avg_board:.0}"));
        lines.push(format!(
            "  - Average Board Independence: {avg_independence:.1}%"
        ));
    }

    lines.extend([
        String::new(),
        rule.clone(),
        "CERTIFICATION".into(),
        rule,
        String::new(),
        "This report has been generated from the ESG Reporting Portal.".into(),
        "Data should be verified before regulatory submission.".into(),
        String::new(),
        banner,
    ]);

    lines.join("\n")
}

/// Deterministic download name. Spaces become underscores; the "All"
/// sentinel maps to the fixed All_Orgs / All_Years parts.
pub fn report_filename(organization_label: &str, year_label: &str, extension: &str) -> String {
    let org_part = if organization_label == "All" {
        "All_Orgs".to_string()
    } else {
        organization_label.replace(' ', "_")
    };
    let year_part = if year_label == "All" {
        "All_Years".to_string()
    } else {
        year_label.replace(' ', "_")
    };
    format!("ESG_Report_{org_part}_{year_part}.{extension}")
}

fn csv_row(r: &EsgRecord) -> Vec<String> {
    vec![
        r.id.to_string(),
        r.organization_name.clone(),
        r.reporting_year.to_string(),
        r.reporting_date.map(|d| d.to_string()).unwrap_or_default(),
        cell_f64(r.ghg_scope1_mtco2e),
        cell_f64(r.ghg_scope2_mtco2e),
        cell_f64(r.ghg_scope3_mtco2e),
        cell_f64(r.energy_consumption_mwh),
        cell_f64(r.renewable_energy_pct),
        cell_f64(r.water_consumption_m3),
        cell_f64(r.waste_generated_tons),
        cell_f64(r.waste_recycled_pct),
        cell_i64(r.total_employees),
        cell_f64(r.female_employees_pct),
        cell_f64(r.employee_turnover_pct),
        cell_i64(r.safety_incidents),
        cell_f64(r.training_hours_per_employee),
        cell_i64(r.board_size),
        cell_f64(r.board_independence_pct),
        cell_f64(r.board_female_pct),
        cell_bool(r.has_ethics_policy),
        cell_bool(r.has_whistleblower_policy),
        r.notes.clone().unwrap_or_default(),
        r.created_by.clone(),
        r.created_at.to_rfc3339(),
        r.updated_by.clone().unwrap_or_default(),
        r.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
    ]
}

fn cell_f64(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn cell_i64(v: Option<i64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn cell_bool(v: Option<bool>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Fixed-point rendering with thousands grouping, e.g. 12345.678 with two
/// decimals -> "12,345.68".
fn grouped(value: f64, decimals: usize) -> String {
    let rendered = format!("{value:.decimals$}");
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", int_part),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{out}.{f}"),
        None => format!("{sign}{out}"),
    }
}
