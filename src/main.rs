//! Pingstep CLI
//!
//! Serve the ping API, or run smoke checks against a running instance and
//! write the report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pingstep::api;
use pingstep::checks::{
    Check, CheckContext, enabled_checks, get_check, list_checks, parse_check_list, run_checks,
};
use pingstep::client::PingClient;
use pingstep::config::Config;
use pingstep::report::{FileSystemResultsWriter, ReportLifecycle};

/// Pingstep - ping service and step-reporting smoke checks
#[derive(Debug, Parser)]
#[command(name = "pingstep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the ping API until Ctrl+C
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run smoke checks against a running service
    Check {
        /// Base URL of the service
        #[arg(short, long)]
        target: Option<String>,

        /// Specific checks to run (comma-separated)
        #[arg(short = 'C', long)]
        checks: Option<String>,

        /// Directory receiving report results
        #[arg(short, long)]
        results_dir: Option<PathBuf>,
    },

    /// List available checks
    List,

    /// Generate a default configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "pingstep.yaml")]
        output: PathBuf,
    },
}

fn setup_logging(verbose: bool, json: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.json);

    match cli.command {
        Commands::Serve { host, port } => {
            let config = load_config(cli.config.as_deref())?;
            serve(config, host, port).await
        }

        Commands::Check {
            target,
            checks,
            results_dir,
        } => {
            let config = load_config(cli.config.as_deref())?;
            check(config, target, checks.as_deref(), results_dir).await
        }

        Commands::List => {
            print_checks();
            Ok(())
        }

        Commands::Init { output } => init_config(&output),
    }
}

/// Load the configuration file, or defaults when none is given
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::info!(config = %path.display(), "Loading configuration");
            Config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

/// Run the API until Ctrl+C
async fn serve(config: Config, host: Option<IpAddr>, port: Option<u16>) -> Result<()> {
    let addr = config.server.with_overrides(host, port).socket_addr();

    api::start_api_server(addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
        tracing::info!("Shutting down");
    })
    .await
    .context("API server failed")
}

/// Run smoke checks and write their results
async fn check(
    config: Config,
    target: Option<String>,
    check_filter: Option<&str>,
    results_dir: Option<PathBuf>,
) -> Result<()> {
    let base_url = target.unwrap_or_else(|| config.client.base_url.clone());
    let results_dir = results_dir.unwrap_or_else(|| config.report.results_dir.clone());

    std::fs::create_dir_all(&results_dir).with_context(|| {
        format!(
            "Failed to create results directory {}",
            results_dir.display()
        )
    })?;
    let writer = FileSystemResultsWriter::new(&results_dir);
    let lifecycle = Arc::new(ReportLifecycle::new(Arc::new(writer)));

    let mut client = PingClient::with_timeout(&base_url, config.client.timeout)
        .with_context(|| format!("Invalid target {base_url}"))?;
    if config.client.report_http {
        client = client.with_reporter(lifecycle.clone());
    }

    let checks = select_checks(&config, check_filter)?;
    if checks.is_empty() {
        anyhow::bail!("No checks to run");
    }

    tracing::info!(
        target = %client.base_url(),
        checks = checks.len(),
        results_dir = %results_dir.display(),
        "Running checks"
    );

    let ctx = CheckContext::new(client, lifecycle);
    let results = run_checks(&ctx, &checks).await;

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed == 0 {
        tracing::info!("All checks PASSED");
        Ok(())
    } else {
        tracing::error!(failed, "Some checks FAILED");
        anyhow::bail!("{failed} of {} checks FAILED", results.len())
    }
}

/// Checks named on the command line, or every check enabled in the config
fn select_checks(config: &Config, filter: Option<&str>) -> Result<Vec<Arc<dyn Check>>> {
    match filter {
        Some(list) => parse_check_list(list).context("Invalid --checks"),
        None => Ok(enabled_checks(config)),
    }
}

/// Generate a default configuration file
fn init_config(output: &std::path::Path) -> Result<()> {
    let config = Config::default_config();
    let yaml = config.to_yaml().context("Failed to serialize config")?;

    std::fs::write(output, &yaml)
        .with_context(|| format!("Failed to write config to {}", output.display()))?;

    tracing::info!(path = %output.display(), "Configuration file created");
    println!("Created {}", output.display());
    println!();
    println!("Edit the file to point at your service, then run:");
    println!("  pingstep --config {} check", output.display());

    Ok(())
}

/// List available checks
fn print_checks() {
    println!("Available checks:");
    println!();

    for name in list_checks() {
        if let Some(check) = get_check(name) {
            println!("  {name:20} - {}", check.description());
        }
    }

    println!();
    println!("Run specific checks with:");
    println!("  pingstep check --checks ping,unknown-route");
}
