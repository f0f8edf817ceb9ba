use arena_client::{BackendConfig, HostedBackend};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use footer_patcher::{FooterPatcher, PatchConfig, PatchOutcome, Preset};
use harness::{audit, performance, rate_limit, report};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Smoke tests and maintenance scripts for the cricket arena booking site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BackendArgs {
    /// Origin serving the static site
    #[arg(long, env = "ARENA_SITE_URL")]
    site_url: Option<String>,
    /// Origin of the hosted backend
    #[arg(long, env = "ARENA_BACKEND_URL")]
    backend_url: String,
    /// Public API key for the backend
    #[arg(long, env = "ARENA_API_KEY", hide_env_values = true)]
    api_key: String,
    /// Per-request timeout in seconds
    #[arg(long, env = "ARENA_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,
}

impl BackendArgs {
    fn into_backend(self) -> CliResult<HostedBackend> {
        let site_url = self
            .site_url
            .unwrap_or_else(|| self.backend_url.clone());
        let config = BackendConfig::new()
            .with_site_url(site_url)
            .with_backend_url(self.backend_url)
            .with_api_key(self.api_key)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        Ok(HostedBackend::new(config)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Time page, asset, REST and function calls and print a summary
    Perf {
        #[command(flatten)]
        backend: BackendArgs,
        /// Print the raw records as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Check that the per-email booking throttle kicks in
    RateLimit {
        #[command(flatten)]
        backend: BackendArgs,
        /// Email shared by every request
        #[arg(long, default_value = "ratelimit@test.com")]
        email: String,
        /// Booking date (YYYY-MM-DD), defaults to two weeks out
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Requests the backend should accept before throttling
        #[arg(long, default_value = "5")]
        allowance: usize,
        /// Pause between requests in milliseconds
        #[arg(long, default_value = "300")]
        pause_ms: u64,
    },
    /// Send malformed and unauthenticated requests and report what got through
    Audit {
        #[command(flatten)]
        backend: BackendArgs,
        /// Booking date (YYYY-MM-DD), defaults to one week out
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Replace the footer block across the static pages
    Footers {
        /// Built-in page set: action-arena or cricket-nets
        #[arg(long, conflicts_with = "config", required_unless_present = "config")]
        preset: Option<Preset>,
        /// TOML file with root, pages and template
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory holding the pages (overrides the preset/config root)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error running tests: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::Perf { backend, json } => {
            if backend.site_url.is_none() {
                return Err("--site-url (or ARENA_SITE_URL) is required for perf".into());
            }
            run_perf(backend.into_backend()?, json).await
        }
        Commands::RateLimit {
            backend,
            email,
            date,
            allowance,
            pause_ms,
        } => {
            let mut plan = rate_limit::RateLimitPlan {
                email,
                allowance,
                pause: Duration::from_millis(pause_ms),
                ..Default::default()
            };
            if let Some(date) = date {
                plan.booking_date = date;
            }
            run_rate_limit(backend.into_backend()?, plan).await
        }
        Commands::Audit { backend, date } => run_audit(backend.into_backend()?, date).await,
        Commands::Footers {
            preset,
            config,
            root,
        } => run_footers(preset, config, root),
    }
}

async fn run_perf(backend: HostedBackend, json: bool) -> CliResult<()> {
    let mut out = io::stdout();

    if !json {
        report::banner(&mut out)?;
    }

    let records = performance::run(&backend, performance::PerfPlan::default()).await;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
    } else {
        let summary = report::render(&records, &mut out)?;
        info!(
            "Performance run finished: {}/{} passed",
            summary.passed,
            summary.total()
        );
    }

    Ok(())
}

async fn run_rate_limit(backend: HostedBackend, plan: rate_limit::RateLimitPlan) -> CliResult<()> {
    plan.validate()?;

    let mut out = io::stdout();
    rate_limit::banner(&plan, &mut out)?;

    let report = rate_limit::RateLimitProbe::new(&backend, plan)
        .run(&mut out)
        .await?;

    rate_limit::footer(&report, &mut out)?;
    Ok(())
}

async fn run_audit(backend: HostedBackend, date: Option<NaiveDate>) -> CliResult<()> {
    let audit = match date {
        Some(date) => audit::ValidationAudit::with_date(&backend, date),
        None => audit::ValidationAudit::new(&backend),
    };
    let report = audit.run().await;

    let mut out = io::stdout();
    audit::render(&report, &mut out)?;
    Ok(())
}

fn run_footers(
    preset: Option<Preset>,
    config: Option<PathBuf>,
    root: Option<PathBuf>,
) -> CliResult<()> {
    let mut patch_config = match (preset, config) {
        (_, Some(path)) => PatchConfig::from_toml_file(&path)?,
        (Some(preset), None) => preset.config(),
        (None, None) => return Err("either --preset or --config is required".into()),
    };
    if let Some(root) = root {
        patch_config = patch_config.with_root(root);
    }

    let patcher = FooterPatcher::new(patch_config)?;
    let report = patcher.patch_all();

    for (page, result) in &report.entries {
        match result {
            Ok(PatchOutcome::Replaced) => println!("Updated {}", page),
            Ok(PatchOutcome::Unchanged) => println!("Unchanged {}", page),
            Err(e) => println!("Error updating {}: {}", page, e),
        }
    }

    if report.is_clean() {
        println!("All footers updated!");
    } else {
        println!(
            "Footers updated with {} error(s) out of {} page(s)",
            report.failed(),
            report.entries.len()
        );
    }

    Ok(())
}
