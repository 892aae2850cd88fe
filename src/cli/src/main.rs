//! CLI for bumpbot.
//!
//! Refreshes open dependency update pull requests that fell behind their base
//! branch, or opens a new pull request for a single named dependency.

use bumpbot::{
    load_settings, EcosystemRegistry, RequestContext, RunSummary, Runner, RunnerConfig,
    RunnerError, UpdateResult, DEFAULT_SETTINGS_FILE,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// bumpbot - Keep dependency update pull requests current.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    /// Token for the hosting API, used for credentials without their own secret.
    #[arg(long, env = "GITHUB_OAUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild open automation pull requests for outdated dependencies.
    UpdateExisting {
        /// Comma separated names of dependencies known to be outdated.
        #[arg(long, value_delimiter = ',', required = true)]
        outdated: Vec<String>,

        /// Push the rebuilt commits. Without this flag nothing is written.
        #[arg(long, env = "FORCE_PR_UPDATE")]
        force_pr_update: bool,
    },

    /// Open a pull request updating one dependency.
    UpdateNamed {
        /// Exact dependency name as declared in the dependency files.
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_skips() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Installs the global subscriber: compact single-line output, `RUST_LOG`
/// filtering with an `info` fallback.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let settings = load_settings(&args.config)?;
    let context = RequestContext::from_settings(&settings, args.token.as_deref())?;
    let registry = EcosystemRegistry::from_helpers(&settings.helpers);
    let config = RunnerConfig::from_settings(&settings);

    match args.command {
        Command::UpdateExisting {
            outdated,
            force_pr_update,
        } => {
            let config = config.with_force_pr_update(force_pr_update);
            let runner = Runner::new(config, context, &registry)?;
            runner.update_existing(&outdated).await
        }
        Command::UpdateNamed { name } => {
            let runner = Runner::new(config, context, &registry)?;
            runner.update_named(&name).await
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!(
        "  Eligible pull requests: {}",
        summary.eligible_pull_requests
    );
    println!("  Candidates: {}", summary.candidates);

    if summary.dry_run {
        println!("  Updates previewed: {}", summary.previewed);
    } else {
        println!("  PRs created: {}", summary.prs_created);
        println!("  PRs updated: {}", summary.prs_updated);
    }
    println!("  Skipped: {}", summary.skipped);

    for result in &summary.results {
        match result {
            UpdateResult::Applied { dependency, status } => match status.url() {
                Some(url) => println!("    {dependency}: {} {url}", status.as_str()),
                None => println!("    {dependency}: {}", status.as_str()),
            },
            UpdateResult::Previewed {
                dependency,
                number,
                files,
            } => println!("    {dependency}: would update #{number} ({files} files)"),
            UpdateResult::Skipped { dependency, reason } => {
                println!("    {dependency}: skipped, {reason}");
            }
        }
    }
}
