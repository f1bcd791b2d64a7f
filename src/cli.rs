use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cplan")]
#[command(about = "Compose Plan - Parse environment recipes and compute service start order")]
pub struct Cli {
    /// Loader settings file (YAML)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Platform API endpoint; recipes on its host receive the token
    #[arg(long, env = "CPLAN_API_ENDPOINT", global = true)]
    pub api_endpoint: Option<String>,

    /// Token of the caller, used for private recipes on the API host
    #[arg(long, env = "CPLAN_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Recipe download timeout (e.g. "30s", "500ms")
    #[arg(long, env = "CPLAN_FETCH_TIMEOUT", global = true)]
    pub fetch_timeout: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the order in which services start
    Order {
        /// Recipe file path or http(s) URL
        recipe: String,

        /// Declared content type of the recipe
        #[arg(long, default_value = "application/x-yaml")]
        content_type: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Group services that can start concurrently
        #[arg(long)]
        layers: bool,
    },
    /// Parse and validate a recipe
    Validate {
        /// Recipe file path or http(s) URL
        recipe: String,

        /// Declared content type of the recipe
        #[arg(long, default_value = "application/x-yaml")]
        content_type: String,
    },
}
