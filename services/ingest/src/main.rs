//! Ingest Pipeline - Loads published mortgage statistics into the warehouse
//!
//! Responsibilities:
//! - Bootstrap dimension and fact tables on first run (region seed included)
//! - Fetch the published XLSX files from the bank's statistics directory
//! - Normalize sheet labels, header dates and zero sentinels
//! - Resolve series/parameter dimensions with get-or-create semantics
//! - Batch-insert observations under the (series, link, date, value) constraint
//!
//! The run either completes every configured dataset or stops at the first
//! fatal condition; re-running after a fix is the supported recovery path
//! and relies on the uniqueness constraint to keep the warehouse free of
//! duplicate observations.
//!
//! Usage:
//!   # All enabled datasets:
//!   cargo run --bin ingest
//!
//!   # One source file (also enables it if disabled in the registry):
//!   cargo run --bin ingest -- --dataset 02_02_Mortgage.xlsx
//!
//!   # Fetch and normalize without touching the database:
//!   cargo run --bin ingest -- --dry-run

mod datasets;
mod dimensions;
mod load;
mod normalize;
mod regions;
mod schema;
mod workbook;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use datasets::{builtin_datasets, Dataset, DatasetsConfig};
use dimensions::Dimensions;
use schema::SchemaState;

#[derive(Parser, Debug)]
#[command(name = "ingest", about = "Loads published mortgage statistics into the warehouse")]
struct Args {
    /// Only process this source file (may be repeated)
    #[arg(long)]
    dataset: Vec<String>,

    /// Path to a JSON datasets config overriding the built-in registry
    #[arg(long)]
    config: Option<String>,

    /// Fetch and normalize only - don't touch the database
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[derive(Debug, Clone)]
struct Config {
    db_url: Option<String>,
    base_url: String,
}

impl Config {
    fn from_env() -> Self {
        Self {
            db_url: std::env::var("DB_URL").ok(),
            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| {
                "https://www.cbr.ru/vfs/statistics/BankSector/Mortgage/".to_string()
            }),
        }
    }
}

/// Fetch one published file; any non-success status is fatal for the run.
async fn fetch_workbook(
    client: &reqwest::Client,
    base_url: &str,
    file: &str,
) -> Result<Vec<u8>> {
    let url = format!("{base_url}{file}");
    println!("  Fetching: {url}");

    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("fetch failed for {url}"))?
        .error_for_status()
        .with_context(|| format!("fetch failed for {url}"))?;

    let bytes = resp.bytes().await.with_context(|| format!("fetch failed for {url}"))?;
    println!("  Downloaded: {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

/// Built-in registry, JSON config, or either filtered by `--dataset`.
/// An explicit filter also enables the matched entries.
async fn load_datasets(args: &Args) -> Result<Vec<Dataset>> {
    let mut datasets = match &args.config {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read datasets config {path}"))?;
            let config: DatasetsConfig =
                serde_json::from_str(&content).context("failed to parse datasets config")?;
            config.datasets
        }
        None => builtin_datasets(),
    };

    if !args.dataset.is_empty() {
        datasets.retain(|d| args.dataset.iter().any(|f| f == &d.file));
        if datasets.is_empty() {
            bail!("no configured dataset matches the --dataset filter");
        }
        for dataset in &mut datasets {
            dataset.enabled = true;
        }
    }

    datasets.retain(|d| d.enabled);
    if datasets.is_empty() {
        bail!("no datasets enabled");
    }
    Ok(datasets)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = Config::from_env();

    println!("=== Mortgage Statistics Ingest ===");
    println!("Base URL: {}", config.base_url);
    println!("Mode: {}", if args.dry_run { "dry-run" } else { "live" });

    let datasets = load_datasets(&args).await?;
    println!("\nDatasets ({}):", datasets.len());
    for dataset in &datasets {
        println!(
            "  {} -> {} [{}]",
            dataset.file,
            dataset.table_name(),
            dataset.kind.label()
        );
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .user_agent("mortgage-ingest/0.1")
        .build()?;

    if args.dry_run {
        for dataset in &datasets {
            println!("\n[{}]", dataset.file);
            let bytes = fetch_workbook(&client, &config.base_url, &dataset.file).await?;
            let sheets = workbook::open_workbook(&bytes)?;
            for sheet in &sheets {
                let drafts = workbook::normalize_sheet(&sheet.range, dataset.kind);
                println!("  Sheet {:?}: {} drafts", sheet.name, drafts.len());
            }
        }
        println!("\nDry run - nothing written");
        return Ok(());
    }

    let db_url = config.db_url.as_deref().context("DB_URL env var missing")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context("Failed to connect to database")?;

    let state = schema::ensure_schema(&pool, &datasets).await?;
    println!(
        "\nSchema: {}",
        match state {
            SchemaState::FirstRun => "bootstrapped (first run)",
            SchemaState::Ready => "ready",
        }
    );

    let mut dims = Dimensions::preload(&pool).await?;
    println!(
        "Dimensions preloaded: {} series, {} parameters, {} regions",
        dims.series_count(),
        dims.parameter_count(),
        dims.region_count()
    );

    let mut total_sheets = 0usize;
    let mut total_rows = 0u64;

    for dataset in &datasets {
        println!("\n[{}] -> {}", dataset.file, dataset.table_name());
        let bytes = fetch_workbook(&client, &config.base_url, &dataset.file).await?;
        let sheets = workbook::open_workbook(&bytes)?;

        for sheet in &sheets {
            let series_id = dims.resolve_series(&pool, &sheet.name).await?;
            let drafts = workbook::normalize_sheet(&sheet.range, dataset.kind);
            let inserted = load::load_sheet(&pool, &mut dims, dataset, series_id, &drafts)
                .await
                .with_context(|| format!("sheet {:?} of {}", sheet.name, dataset.file))?;
            println!("  Sheet {:?}: {} rows inserted", sheet.name, inserted);
            total_sheets += 1;
            total_rows += inserted;
        }
    }

    println!("\n=== Ingest Complete ===");
    println!("Datasets: {}", datasets.len());
    println!("Sheets: {total_sheets}");
    println!("Rows inserted: {total_rows}");

    Ok(())
}
