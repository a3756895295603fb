//! seo-audit main entry point
//!
//! This is the command-line interface for the seo-audit pipeline.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use seo_audit::config::{load_config_with_hash, Config};
use seo_audit::report::{render, write_markdown_report, ReportFormat};
use seo_audit::{normalize_domain, AuditPipeline};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// seo-audit: on-page, technical and content SEO audits
///
/// Fetches a site's homepage, scores its SEO signals and enriches the result
/// with performance metrics, backlinks and keyword rankings from the
/// providers configured in the TOML file.
#[derive(Parser, Debug)]
#[command(name = "seo-audit")]
#[command(version)]
#[command(about = "On-page, technical and content SEO audits", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Audit a domain's homepage
    Audit {
        /// Domain or URL to audit
        domain: String,

        /// Report format: json or markdown
        #[arg(short, long, default_value = "json")]
        format: ReportFormat,

        /// Write a markdown report to this file as well
        #[arg(long, value_name = "PATH")]
        markdown: Option<PathBuf>,

        /// Return without waiting for a background performance measurement
        #[arg(long)]
        no_wait: bool,
    },

    /// Measure page performance metrics for a URL
    Metrics {
        url: String,
    },

    /// Look up backlink counts for a domain
    Backlinks {
        domain: String,
    },

    /// Find a domain's search position for a keyword
    Rank {
        keyword: String,
        domain: String,

        /// Search location passed to the provider
        #[arg(long)]
        location: Option<String>,
    },

    /// Extract the top keywords of a domain's homepage
    Keywords {
        domain: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;
    let pipeline =
        AuditPipeline::from_config(&config).context("Failed to initialize audit pipeline")?;

    match cli.command {
        Command::Audit {
            domain,
            format,
            markdown,
            no_wait,
        } => handle_audit(&pipeline, &domain, format, markdown.as_deref(), no_wait).await,
        Command::Metrics { url } => handle_metrics(&pipeline, &url).await,
        Command::Backlinks { domain } => handle_backlinks(&pipeline, &domain).await,
        Command::Rank {
            keyword,
            domain,
            location,
        } => {
            let location = location.or_else(|| config.audit.ranking_location.clone());
            handle_rank(&pipeline, &keyword, &domain, location.as_deref()).await
        }
        Command::Keywords { domain, limit } => handle_keywords(&pipeline, &domain, limit).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_audit=info,warn"),
            1 => EnvFilter::new("seo_audit=debug,info"),
            2 => EnvFilter::new("seo_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads and validates the configuration, or falls back to defaults
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults (no enrichment providers)");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the audit command: runs the pipeline and prints the report
async fn handle_audit(
    pipeline: &AuditPipeline,
    domain: &str,
    format: ReportFormat,
    markdown: Option<&Path>,
    no_wait: bool,
) -> anyhow::Result<()> {
    let run = match pipeline.start_audit(domain).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", render(&run.result, format)?);

    if let Some(path) = markdown {
        write_markdown_report(&run.result, path)?;
        tracing::info!("Markdown report written to {}", path.display());
    }

    if let Some(task) = run.enrichment {
        if no_wait {
            task.cancel();
        } else {
            tracing::info!("Waiting for background performance measurement...");
            match task.wait().await {
                Some(technical) => tracing::info!(
                    "Late metrics stored for record {}: LCP {:?}s, FCP {:?}s",
                    run.record_id.unwrap_or_default(),
                    technical.lcp,
                    technical.fcp
                ),
                None => tracing::info!("Background performance measurement produced no metrics"),
            }
        }
    }

    Ok(())
}

/// Handles the metrics command
async fn handle_metrics(pipeline: &AuditPipeline, url: &str) -> anyhow::Result<()> {
    match pipeline.get_performance_metrics(url).await {
        Some(metrics) => {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
            Ok(())
        }
        None => bail!(
            "No performance metrics available for {} (is [providers.pagespeed] configured?)",
            url
        ),
    }
}

/// Handles the backlinks command
async fn handle_backlinks(pipeline: &AuditPipeline, domain: &str) -> anyhow::Result<()> {
    let domain = normalize_domain(domain)?;
    if pipeline.backlinks().is_empty() {
        tracing::warn!("No backlink sources configured");
    }

    let data = pipeline.backlinks().get_backlinks(&domain).await;
    if data.is_no_data() {
        println!("No backlink data available for {}", domain);
    } else {
        println!("{}", serde_json::to_string_pretty(&data)?);
    }
    Ok(())
}

/// Handles the rank command
async fn handle_rank(
    pipeline: &AuditPipeline,
    keyword: &str,
    domain: &str,
    location: Option<&str>,
) -> anyhow::Result<()> {
    let domain = normalize_domain(domain)?;
    let ranking = pipeline
        .tracker()
        .get_ranking(keyword, &domain, location)
        .await
        .with_context(|| format!("Ranking lookup for '{}' failed", keyword))?;

    println!("{}", serde_json::to_string_pretty(&ranking)?);
    Ok(())
}

/// Handles the keywords command
async fn handle_keywords(pipeline: &AuditPipeline, domain: &str, limit: usize) -> anyhow::Result<()> {
    let keywords = pipeline
        .keyword_extractor()
        .extract_keywords(domain, limit)
        .await?;

    for keyword in keywords {
        println!("{}", keyword);
    }
    Ok(())
}
