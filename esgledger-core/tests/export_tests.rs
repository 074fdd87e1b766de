// tests/export_tests.rs
// Outward formats: CSV fidelity, report layout, filename determinism.

use chrono::Utc;

use esgledger_core::records::{COLUMNS, EsgRecord};
use esgledger_core::services::export::{compliance_report, report_filename, to_csv};

fn rec(id: i64, org: &str, year: i32) -> EsgRecord {
    EsgRecord {
        id,
        organization_name: org.to_string(),
        reporting_year: year,
        reporting_date: None,
        ghg_scope1_mtco2e: None,
        ghg_scope2_mtco2e: None,
        ghg_scope3_mtco2e: None,
        energy_consumption_mwh: None,
        renewable_energy_pct: None,
        water_consumption_m3: None,
        waste_generated_tons: None,
        waste_recycled_pct: None,
        total_employees: None,
        female_employees_pct: None,
        employee_turnover_pct: None,
        safety_incidents: None,
        training_hours_per_employee: None,
        board_size: None,
        board_independence_pct: None,
        board_female_pct: None,
        has_ethics_policy: None,
        has_whistleblower_policy: None,
        notes: None,
        created_by: "tester".to_string(),
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    }
}

#[test]
fn csv_parses_back_with_same_header_and_row_count() {
    let records = vec![
        EsgRecord {
            ghg_scope1_mtco2e: Some(100.5),
            total_employees: Some(250),
            has_ethics_policy: Some(true),
            notes: Some("contains, a comma".to_string()),
            ..rec(1, "Acme Corp", 2023)
        },
        rec(2, "Borealis", 2022),
    ];

    let bytes = to_csv(&records).expect("csv");
    let mut rdr = csv::Reader::from_reader(bytes.as_slice());

    let headers = rdr.headers().expect("headers").clone();
    assert_eq!(headers.len(), COLUMNS.len());
    for (got, want) in headers.iter().zip(COLUMNS) {
        assert_eq!(got, want);
    }

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), records.len());

    // Quoting holds for embedded commas; values land under their column.
    assert_eq!(&rows[0][1], "Acme Corp");
    assert_eq!(&rows[0][22], "contains, a comma");
    assert_eq!(&rows[0][20], "true");
}

#[test]
fn csv_renders_missing_values_as_empty_cells() {
    let bytes = to_csv(&[rec(7, "Acme Corp", 2023)]).expect("csv");
    let mut rdr = csv::Reader::from_reader(bytes.as_slice());
    let row = rdr.records().next().expect("one row").expect("row");

    assert_eq!(&row[0], "7");
    assert_eq!(&row[4], "", "missing scope 1 is an empty cell");
    assert_eq!(&row[20], "", "missing policy flag is an empty cell");
    assert_eq!(&row[25], "", "no updater yet");
}

#[test]
fn csv_of_empty_set_is_header_only() {
    let bytes = to_csv(&[]).expect("csv");
    let text = String::from_utf8(bytes).expect("utf-8");
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("id,organization_name,reporting_year"));
}

#[test]
fn filenames_are_deterministic() {
    assert_eq!(
        report_filename("Acme Corp", "2023", "csv"),
        "ESG_Report_Acme_Corp_2023.csv"
    );
    assert_eq!(
        report_filename("All", "All", "csv"),
        "ESG_Report_All_Orgs_All_Years.csv"
    );
    assert_eq!(
        report_filename("All", "2022", "txt"),
        "ESG_Report_All_Orgs_2022.txt"
    );
}

#[test]
fn report_carries_summary_block_and_certification() {
    let records = vec![
        EsgRecord {
            ghg_scope1_mtco2e: Some(12_345.678),
            ghg_scope2_mtco2e: Some(4_200.0),
            renewable_energy_pct: Some(30.0),
            total_employees: Some(1_200),
            female_employees_pct: Some(45.0),
            board_size: Some(9),
            board_independence_pct: Some(55.5),
            ..rec(1, "Acme Corp", 2023)
        },
        EsgRecord {
            ghg_scope1_mtco2e: Some(100.0),
            renewable_energy_pct: Some(50.0),
            total_employees: Some(800),
            female_employees_pct: Some(39.0),
            board_size: Some(7),
            board_independence_pct: Some(44.5),
            ..rec(2, "Borealis", 2023)
        },
    ];

    let text = compliance_report(&records, "All", "2023");

    assert!(text.starts_with(&"=".repeat(60)));
    assert!(text.contains("ESG COMPLIANCE REPORT"));
    assert!(text.contains("Organization: All"));
    assert!(text.contains("Reporting Period: 2023"));
    assert!(text.contains("Total Records: 2"));

    assert!(text.contains("ENVIRONMENTAL METRICS:"));
    assert!(text.contains("Total Scope 1 Emissions: 12,445.68 mtCO2e"));
    assert!(text.contains("Total Scope 2 Emissions: 4,200.00 mtCO2e"));
    assert!(text.contains("Combined Emissions: 16,645.68 mtCO2e"));
    assert!(text.contains("Average Renewable Energy: 40.0%"));

    assert!(text.contains("SOCIAL METRICS:"));
    assert!(text.contains("Total Workforce: 2,000"));
    assert!(text.contains("Average Female Representation: 42.0%"));

    assert!(text.contains("GOVERNANCE METRICS:"));
    assert!(text.contains("Average Board Size: 8"));
    assert!(text.contains("Average Board Independence: 50.0%"));

    assert!(text.contains("CERTIFICATION"));
    assert!(text.contains("Data should be verified before regulatory submission."));
    assert!(text.ends_with(&"=".repeat(60)));
}

#[test]
fn report_matches_the_combined_emissions_example() {
    let records = vec![
        EsgRecord {
            ghg_scope1_mtco2e: Some(100.0),
            ghg_scope2_mtco2e: Some(50.0),
            ..rec(1, "OrgA", 2023)
        },
        EsgRecord {
            ghg_scope1_mtco2e: Some(200.0),
            ghg_scope2_mtco2e: None,
            ..rec(2, "OrgB", 2023)
        },
    ];
    let text = compliance_report(&records, "All", "2023");
    assert!(text.contains("Combined Emissions: 350.00 mtCO2e"));
}

#[test]
fn report_omits_sections_without_source_data() {
    // Environmental figures only: the social and governance blocks must be
    // absent, not zero-filled.
    let records = vec![EsgRecord {
        ghg_scope1_mtco2e: Some(10.0),
        ..rec(1, "Acme Corp", 2023)
    }];
    let text = compliance_report(&records, "Acme Corp", "2023");
    assert!(text.contains("ENVIRONMENTAL METRICS:"));
    assert!(!text.contains("Average Renewable Energy"));
    assert!(!text.contains("SOCIAL METRICS:"));
    assert!(!text.contains("GOVERNANCE METRICS:"));

    let empty = compliance_report(&[], "All", "All");
    assert!(empty.contains("Total Records: 0"));
    assert!(!empty.contains("ENVIRONMENTAL METRICS:"));
    assert!(!empty.contains("SOCIAL METRICS:"));
    assert!(!empty.contains("GOVERNANCE METRICS:"));
    assert!(empty.contains("CERTIFICATION"));
}
