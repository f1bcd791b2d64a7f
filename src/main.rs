mod cli;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::RecipeOptions;
use compose_plan::{Error as PlanError, LoaderSettings};
use output::CliOutput;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        if let Some(plan_error) = e.downcast_ref::<PlanError>() {
            eprintln!("Error: {}", plan_error);
            if let Some(suggestion) = plan_error.suggestion() {
                eprintln!("\nHint: {}", suggestion);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let options = RecipeOptions {
        settings: build_settings(&cli)?,
        token: cli.token.clone(),
    };
    let out = CliOutput;

    match cli.command {
        Commands::Order {
            ref recipe,
            ref content_type,
            json,
            layers,
        } => commands::run_order(recipe, content_type, json, layers, &options, &out).await,
        Commands::Validate {
            ref recipe,
            ref content_type,
        } => commands::run_validate(recipe, content_type, &options, &out).await,
    }
}

/// Settings file first, then command-line and environment overrides.
fn build_settings(cli: &Cli) -> anyhow::Result<LoaderSettings> {
    let mut settings = match cli.settings {
        Some(ref path) => LoaderSettings::load(path)?,
        None => LoaderSettings::default(),
    };

    if let Some(ref endpoint) = cli.api_endpoint {
        let url = url::Url::parse(endpoint)
            .with_context(|| format!("Invalid API endpoint '{}'", endpoint))?;
        settings = settings.with_api_endpoint(url);
    }

    if let Some(ref timeout) = cli.fetch_timeout {
        settings = settings.with_fetch_timeout(timeout.clone());
    }

    settings.validate()?;
    Ok(settings)
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
