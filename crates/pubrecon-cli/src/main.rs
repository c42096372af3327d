use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pubrecon_core::metrics;
use pubrecon_sources::{ReconcilePipeline, SourcesConfig};

mod report;
mod roster;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "pubrecon",
    about = "Reconcile researcher publication records from ORCID, Crossref, and OpenAlex",
    version
)]
struct Cli {
    /// Roster CSV with `orcid` and `name` columns.
    #[arg(long)]
    input: PathBuf,

    /// Directory the CSV reports are written to.
    #[arg(long, default_value = "reports")]
    output: PathBuf,

    /// Courtesy pause between researchers, in milliseconds.
    #[arg(long, default_value = "1000")]
    delay_ms: u64,

    /// Skip the identifier search for title-only records.
    #[arg(long)]
    no_backfill: bool,

    /// Email advertised to polite API pools (overrides the environment).
    #[arg(long)]
    polite_email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SourcesConfig::from_env();
    if cli.polite_email.is_some() {
        config.polite_email = cli.polite_email.clone();
    }

    let roster = roster::load(&cli.input)
        .with_context(|| format!("failed to read roster {}", cli.input.display()))?;
    if roster.is_empty() {
        bail!("no valid ORCID iDs in {}", cli.input.display());
    }

    let pipeline = ReconcilePipeline::from_config(&config)?.with_backfill(!cli.no_backfill);
    pipeline
        .authenticate()
        .await
        .context("claims-registry authentication failed")?;

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;

    let today = Utc::now().date_naive();
    let mut combined = Vec::new();
    let mut summaries = Vec::new();
    let mut activity = Vec::new();

    for (index, researcher) in roster.iter().enumerate() {
        if index > 0 && cli.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(cli.delay_ms)).await;
        }
        info!(orcid = %researcher.orcid, name = %researcher.name, "processing researcher");

        let works = pipeline.process_researcher(researcher).await?;
        summaries.push(metrics::summarize_coverage(researcher, &works));
        activity.push(metrics::compute_metrics(researcher, &works, today));

        let per_researcher = cli.output.join(format!("works_{}.csv", researcher.orcid));
        report::write_works(&per_researcher, &works)?;
        combined.extend(works);
    }

    report::write_works(&cli.output.join("works.csv"), &combined)?;
    report::write_summaries(&cli.output.join("summary.csv"), &summaries)?;
    report::write_metrics(&cli.output.join("metrics.csv"), &activity)?;

    info!(
        researchers = roster.len(),
        works = combined.len(),
        output = %cli.output.display(),
        "run complete"
    );
    Ok(())
}
