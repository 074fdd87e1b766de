// tests/portal_tests.rs
// End-to-end through the facade: cache behavior, logbook lines, advisory
// boundary, config wiring.

use std::cell::{Cell, RefCell};
use std::fs;
use std::time::Duration;

use anyhow::{Result, anyhow};
use serde_json::Value;
use tempfile::TempDir;

use esgledger_core::records::RecordDraft;
use esgledger_core::services::advisor::CompletionClient;
use esgledger_core::services::cache::RecordCache;
use esgledger_core::{Portal, Session};

fn draft(org: &str, year: i32) -> RecordDraft {
    RecordDraft {
        organization_name: org.to_string(),
        reporting_year: year,
        ghg_scope1_mtco2e: Some(100.0),
        renewable_energy_pct: Some(40.0),
        ..Default::default()
    }
}

fn open_portal(root: &TempDir) -> Portal {
    Portal::open(root.path(), Session::new("auditor")).expect("open portal")
}

// ----------------------- Advisory stubs -----------------------

struct ScriptedClient {
    reply: String,
    seen: RefCell<Vec<(String, String)>>,
}

impl ScriptedClient {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl CompletionClient for ScriptedClient {
    fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        self.seen
            .borrow_mut()
            .push((model.to_string(), prompt.to_string()));
        Ok(self.reply.clone())
    }
}

struct FailingClient;

impl CompletionClient for FailingClient {
    fn complete(&self, _model: &str, _prompt: &str) -> Result<String> {
        Err(anyhow!("completion endpoint unavailable"))
    }
}

// ----------------------- Tests ----------------------------

#[test]
fn create_update_delete_flow_reads_back_through_cache() {
    let root = TempDir::new().expect("tempdir");
    let mut portal = open_portal(&root);

    assert!(portal.records().expect("records").is_empty());

    let id = portal.create(&draft("Acme Corp", 2023)).expect("create");
    // The write invalidated the cache, so the new row is visible at once.
    let rows = portal.records().expect("records");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].created_by, "auditor");

    portal.delete(id).expect("delete");
    assert!(portal.records().expect("records").is_empty());

    // Deleting a row that is already gone is a quiet no-op at this layer.
    portal.delete(id).expect("repeat delete is fine");
}

#[test]
fn update_of_missing_id_surfaces_an_error() {
    let root = TempDir::new().expect("tempdir");
    let mut portal = open_portal(&root);
    let patch = esgledger_core::RecordPatch {
        reporting_year: Some(2024),
        ..Default::default()
    };
    assert!(portal.update(404, &patch).is_err());
}

#[test]
fn filtered_and_summary_run_over_the_cached_set() {
    let root = TempDir::new().expect("tempdir");
    let mut portal = open_portal(&root);
    portal.create(&draft("Acme Corp", 2023)).expect("create");
    portal.create(&draft("Borealis", 2023)).expect("create");
    portal.create(&draft("Acme Corp", 2022)).expect("create");

    let acme = portal.filtered(Some("Acme Corp"), None).expect("filter");
    assert_eq!(acme.len(), 2);
    assert_eq!(acme[0].reporting_year, 2023);

    let stats = portal.summary().expect("summary");
    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.latest_year, Some(2023));
    assert_eq!(stats.latest_emissions_mtco2e, 200.0);

    assert_eq!(portal.years().expect("years"), vec![2023, 2022]);
    assert_eq!(
        portal.organizations().expect("orgs"),
        vec!["Acme Corp".to_string(), "Borealis".to_string()]
    );
}

#[test]
fn record_cache_honors_ttl_and_invalidation() {
    let mut cache = RecordCache::new(Duration::from_millis(50));
    let fetches = Cell::new(0u32);
    let fetch = || {
        fetches.set(fetches.get() + 1);
        Ok(Vec::new())
    };

    cache.get_or_refresh(fetch).expect("miss populates");
    assert_eq!(fetches.get(), 1);
    assert!(cache.is_fresh());

    // Inside the TTL the snapshot is served as-is.
    cache
        .get_or_refresh(|| {
            fetches.set(fetches.get() + 1);
            Ok(Vec::new())
        })
        .expect("fresh hit");
    assert_eq!(fetches.get(), 1);

    std::thread::sleep(Duration::from_millis(60));
    assert!(!cache.is_fresh());
    cache
        .get_or_refresh(|| {
            fetches.set(fetches.get() + 1);
            Ok(Vec::new())
        })
        .expect("expired snapshot refetches");
    assert_eq!(fetches.get(), 2);

    cache.invalidate();
    cache
        .get_or_refresh(|| {
            fetches.set(fetches.get() + 1);
            Ok(Vec::new())
        })
        .expect("invalidate forces refetch");
    assert_eq!(fetches.get(), 3);
}

#[test]
fn logbook_records_mutations_and_noops() {
    let root = TempDir::new().expect("tempdir");
    let mut portal = open_portal(&root);

    let id = portal.create(&draft("Acme Corp", 2023)).expect("create");
    portal.delete(id).expect("delete");
    portal.delete(id).expect("noop delete");

    let text =
        fs::read_to_string(root.path().join("logbook/actions.jsonl")).expect("logbook exists");
    let actions: Vec<String> = text
        .lines()
        .map(|line| {
            let v: Value = serde_json::from_str(line).expect("valid JSON line");
            assert!(v["id"].is_string());
            assert!(v["timestamp"].is_string());
            assert_eq!(v["agent"], "portal");
            v["action"].as_str().expect("action").to_string()
        })
        .collect();

    assert_eq!(actions, vec!["record_created", "record_deleted", "delete_noop"]);
}

#[test]
fn advisor_answers_with_data_context_in_the_prompt() {
    let root = TempDir::new().expect("tempdir");
    let mut portal = open_portal(&root);
    portal.create(&draft("Acme Corp", 2023)).expect("create");

    let client = ScriptedClient::new("Emissions are trending down.");
    let answer = portal
        .ask(&client, "What are the key trends?")
        .expect("ask");
    assert_eq!(answer, "Emissions are trending down.");

    let seen = client.seen.borrow();
    assert_eq!(seen.len(), 1);
    let (model, prompt) = &seen[0];
    assert_eq!(model, "claude-3-5-sonnet");
    assert!(prompt.contains("ESG Data Summary:"));
    assert!(prompt.contains("- Total records: 1"));
    assert!(prompt.contains("User Question: What are the key trends?"));
}

#[test]
fn advisor_failure_is_embedded_in_the_answer() {
    let root = TempDir::new().expect("tempdir");
    let mut portal = open_portal(&root);

    let answer = portal.ask(&FailingClient, "anything").expect("ask");
    assert!(answer.contains("Error querying completion model"));
    assert!(answer.contains("completion endpoint unavailable"));
}

#[test]
fn config_file_redirects_the_database_path() {
    let root = TempDir::new().expect("tempdir");
    fs::write(
        root.path().join("config.toml"),
        "[database]\npath = \"alt/metrics.db\"\n\n[cache]\nttl_secs = 120\n",
    )
    .expect("write config");

    let mut portal = open_portal(&root);
    portal.create(&draft("Acme Corp", 2023)).expect("create");

    assert!(root.path().join("alt/metrics.db").exists());
}

#[test]
fn export_paths_run_through_the_portal() {
    let root = TempDir::new().expect("tempdir");
    let mut portal = open_portal(&root);
    portal.create(&draft("Acme Corp", 2023)).expect("create");

    let bytes = portal.export_csv(Some("Acme Corp"), None).expect("csv");
    let text = String::from_utf8(bytes).expect("utf-8");
    assert_eq!(text.lines().count(), 2, "header plus one row");

    let report = portal
        .compliance_report(None, Some(2023))
        .expect("report");
    assert!(report.contains("Organization: All"));
    assert!(report.contains("Reporting Period: 2023"));
    assert!(report.contains("Total Records: 1"));
}
