use std::env;
use std::fs::File;
use std::path::PathBuf;

use analytics::{AnalyticsEngine, ClientReport, ReportBundle, ReportingWindow};
use anyhow::Context;
use api_client::{GeminiClient, ModelCapability, ReasoningApi};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use core_types::BaselineSource;
use indicatif::{ProgressBar, ProgressStyle};
use narrator::Narrator;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Meridian reporting application.
#[tokio::main]
async fn main() {
    // Load environment variables from a .env file, if one exists.
    dotenvy::dotenv().ok();
    init_tracing();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => {
            if let Err(e) = handle_report(args).await {
                eprintln!("Error during report run: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Per-client, month-over-month marketing performance reports with
/// AI-written executive summaries.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the report bundle for every client in a dataset.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Path to the marketing dataset (CSV export).
    #[arg(long)]
    dataset: PathBuf,

    /// Where to write the JSON report bundle.
    /// Defaults to client_reports_<period>.json in the configured output directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip narrative generation even if a credential is present.
    #[arg(long)]
    demo: bool,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Handles the orchestration of one report run: ingest, analyze, discover a
/// model, narrate, render.
async fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let settings = configuration::load_config()?;

    let records =
        ingestion::load_records(&args.dataset).context("failed to ingest the dataset")?;

    // All periods anchor to the latest observation, not wall-clock time.
    let last_date = records
        .iter()
        .map(|r| r.date)
        .max()
        .context("dataset has no observation dates")?;
    let window = ReportingWindow::resolve(last_date)?;
    tracing::info!(period = %window.label, "running month-over-month analysis");

    let engine = AnalyticsEngine::new();
    let mut reports = engine.analyze(&records, &window)?;
    if reports.is_empty() {
        tracing::warn!("no client has current-period activity; writing an empty bundle");
    }

    // Capability discovery runs once per run, before the client loop. A run
    // without credential or model proceeds in demo mode instead of failing.
    let api_key = env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty());
    let client = match (&api_key, args.demo) {
        (Some(key), false) => Some(GeminiClient::new(key.clone(), &settings.api)?),
        (None, false) => {
            tracing::warn!("GEMINI_API_KEY is not set; narratives will use demo copy");
            None
        }
        _ => None,
    };
    let capability = match &client {
        Some(client) => api_client::discover_model(client).await,
        None => ModelCapability::unavailable(),
    };
    let model_name = capability.model.clone();

    let narrator = Narrator::new(
        client.as_ref().map(|c| c as &dyn ReasoningApi),
        capability,
        settings.generation,
    );

    // Narratives are generated sequentially, one bounded call per client.
    let progress = ProgressBar::new(reports.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    for report in &mut reports {
        progress.set_message(format!("Summarizing {}...", report.company));
        narrator.narrate(report, &window.label).await;
        progress.inc(1);
    }
    progress.finish_with_message("narratives complete");

    for report in &reports {
        print_client_summary(report, &window.label);
    }

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&settings.report.output_dir, &window.label));
    let bundle = ReportBundle {
        period: window.label.clone(),
        model: model_name,
        reports,
    };
    let file = File::create(&output_path)
        .with_context(|| format!("could not create {}", output_path.display()))?;
    serde_json::to_writer_pretty(file, &bundle)?;

    tracing::info!(
        path = %output_path.display(),
        clients = bundle.reports.len(),
        "report bundle written"
    );
    Ok(())
}

fn default_output_path(output_dir: &str, period_label: &str) -> PathBuf {
    let slug = period_label.replace(' ', "_").to_lowercase();
    PathBuf::from(output_dir).join(format!("client_reports_{slug}.json"))
}

// ==============================================================================
// Console Rendering
// ==============================================================================

/// Prints one client's KPI comparison table and narrative.
fn print_client_summary(report: &ClientReport, period_label: &str) {
    let baseline_note = match report.baseline {
        BaselineSource::Observed => "",
        BaselineSource::Sentinel => " (insufficient prior data)",
    };
    println!(
        "\n{} | {}{}",
        report.company.to_uppercase(),
        period_label,
        baseline_note
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["METRIC", "THIS MONTH", "LAST MONTH", "% CHANGE"]);
    table.add_row(vec![
        "Total Ad Spend".to_string(),
        format!("${}", narrator::format_thousands(report.current.spend)),
        format!("${}", narrator::format_thousands(report.previous.spend)),
        format_delta(report.delta.spend_pct),
    ]);
    table.add_row(vec![
        "ROAS (ROI)".to_string(),
        format!("{:.2}x", report.current.roi),
        format!("{:.2}x", report.previous.roi),
        format_delta(report.delta.roi_pct),
    ]);
    table.add_row(vec![
        "Conversion Rate".to_string(),
        format!("{:.1}%", report.current.conversion_pct),
        format!("{:.1}%", report.previous.conversion_pct),
        format_delta(report.delta.conversion_pct),
    ]);
    table.add_row(vec![
        "Best Channel".to_string(),
        format!("{} ({:.2}x)", report.best_channel, report.best_channel_roi),
        String::new(),
        String::new(),
    ]);
    println!("{table}");
    println!("{}", report.narrative);
}

/// Renders a delta with an explicit sign; an undefined delta is shown as
/// "n/a" rather than a fabricated number.
fn format_delta(delta: Option<Decimal>) -> String {
    match delta {
        Some(pct) if pct >= Decimal::ZERO => format!("+{:.1}%", pct),
        Some(pct) => format!("{:.1}%", pct),
        None => "n/a".to_string(),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
