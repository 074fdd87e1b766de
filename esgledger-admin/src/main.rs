use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use esgledger_core::records::RecordDraft;
use esgledger_core::services::export::report_filename;
use esgledger_core::{CoreConfig, Portal, Session};

#[derive(Parser)]
#[command(
    name = "esgledger-admin",
    about = "Operator helpers for the ESG metrics portal"
)]
struct Cli {
    /// Data directory holding config.toml, the database, and the logbook
    #[arg(long, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create the database and logbook layout under --root
    Init,
    /// List records, optionally narrowed to one organization and/or year
    List {
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Print summary statistics for the dashboard headline numbers
    Stats,
    /// Write a CSV or compliance-report artifact
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Output file; defaults to the deterministic report filename
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Create records from a JSON array of drafts
    Import { file: PathBuf },
    /// Delete one record by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Report,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::ambient();
    match cli.cmd {
        Cmd::Init => init(&cli.root, session),
        Cmd::List { org, year } => list(&cli.root, session, org.as_deref(), year),
        Cmd::Stats => stats(&cli.root, session),
        Cmd::Export {
            format,
            org,
            year,
            out,
        } => export(&cli.root, session, format, org.as_deref(), year, out),
        Cmd::Import { file } => import(&cli.root, session, &file),
        Cmd::Delete { id } => delete(&cli.root, session, id),
    }
}

fn init(root: &PathBuf, session: Session) -> Result<()> {
    fs::create_dir_all(root).with_context(|| format!("mkdir -p {root:?}"))?;
    let cfg = CoreConfig::load(root)?;
    let _portal = Portal::with_config(&cfg, session)?;
    println!("initialized data directory at {}", root.display());
    println!("  database: {}", cfg.database.path.display());
    println!("  logbook:  {}", cfg.logbook.actions.display());
    Ok(())
}

fn list(root: &PathBuf, session: Session, org: Option<&str>, year: Option<i32>) -> Result<()> {
    let mut portal = Portal::open(root, session)?;
    let rows = portal.filtered(org, year)?;
    if rows.is_empty() {
        println!("no records match");
        return Ok(());
    }
    println!(
        "{:>5}  {:<28} {:>6} {:>12} {:>8} {:>10}  {}",
        "id", "organization", "year", "scope1", "renew%", "employees", "created"
    );
    for r in &rows {
        println!(
            "{:>5}  {:<28} {:>6} {:>12} {:>8} {:>10}  {} ({})",
            r.id,
            r.organization_name,
            r.reporting_year,
            opt(r.ghg_scope1_mtco2e),
            opt(r.renewable_energy_pct),
            opt(r.total_employees),
            r.created_at.format("%Y-%m-%d"),
            r.created_by,
        );
    }
    println!("{} record(s)", rows.len());
    Ok(())
}

fn stats(root: &PathBuf, session: Session) -> Result<()> {
    let mut portal = Portal::open(root, session)?;
    let stats = portal.summary()?;
    println!("ESG metrics as of {}", Utc::now().format("%Y-%m-%d"));
    println!("Total records:    {}", stats.total_records);
    println!("Organizations:    {}", stats.total_organizations);
    println!("Years covered:    {}", stats.total_years);
    match stats.latest_year {
        Some(year) => {
            println!("Latest year:      {year}");
            println!(
                "Latest emissions: {:.2} mtCO2e (scope 1 + 2)",
                stats.latest_emissions_mtco2e
            );
            match stats.avg_renewable_pct {
                Some(avg) => println!("Avg renewable:    {avg:.1}%"),
                None => println!("Avg renewable:    n/a"),
            }
        }
        None => println!("Latest year:      n/a"),
    }
    Ok(())
}

fn export(
    root: &PathBuf,
    session: Session,
    format: Format,
    org: Option<&str>,
    year: Option<i32>,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut portal = Portal::open(root, session)?;
    let org_label = org.unwrap_or("All");
    let year_label = year.map_or_else(|| "All".to_string(), |y| y.to_string());

    let (bytes, default_name) = match format {
        Format::Csv => (
            portal.export_csv(org, year)?,
            report_filename(org_label, &year_label, "csv"),
        ),
        Format::Report => (
            portal.compliance_report(org, year)?.into_bytes(),
            report_filename(org_label, &year_label, "txt"),
        ),
    };

    let path = out.unwrap_or_else(|| PathBuf::from(default_name));
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn import(root: &PathBuf, session: Session, file: &PathBuf) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let drafts: Vec<RecordDraft> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {} as a JSON array of records", file.display()))?;

    let mut portal = Portal::open(root, session)?;
    for draft in &drafts {
        let id = portal.create(draft)?;
        println!(
            "created record {id} ({} {})",
            draft.organization_name, draft.reporting_year
        );
    }
    println!("{} record(s) imported", drafts.len());
    Ok(())
}

fn delete(root: &PathBuf, session: Session, id: i64) -> Result<()> {
    let mut portal = Portal::open(root, session)?;
    portal.delete(id)?;
    println!("deleted record {id} (no-op if it was already gone)");
    Ok(())
}

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |x| x.to_string())
}
