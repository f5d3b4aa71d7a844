//! # archscope CLI
//!
//! ## Usage
//!
//! ```bash
//! archscope --config ./config/archscope.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `archscope list` | Fetch the listing and print it as cards |
//! | `archscope show <n>` | Detail view of card `n` |
//! | `archscope submit <url>` | Scrape a URL, then print the refreshed listing |
//! | `archscope ping` | Check the service answers |
//! | `archscope shell` | Interactive session |
//!
//! Log verbosity is controlled with `RUST_LOG` (default `warn`); logs go to
//! stderr so stdout stays machine-readable with `--json`.

use std::path::PathBuf;

use archscope::config;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// archscope: submit URLs to an AWS architecture scraper and inspect what it found.
#[derive(Parser)]
#[command(
    name = "archscope",
    about = "Submit URLs to an AWS architecture scraping service and inspect the results",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/archscope.toml`. A missing file means built-in
    /// defaults; `API_URL` overrides `api.url` either way.
    #[arg(long, global = true, default_value = "./config/archscope.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List architectures as cards.
    List {
        /// Number of records to skip.
        #[arg(long)]
        skip: Option<u32>,

        /// Maximum number of records (defaults to `api.page_size`).
        #[arg(long)]
        limit: Option<u32>,

        /// Print cards as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the detail view of one architecture.
    ///
    /// `n` is the card number printed by `list`.
    Show {
        /// Card number (1-based).
        n: usize,

        /// Print the raw content exactly as received.
        #[arg(long, conflicts_with = "json")]
        raw: bool,

        /// Print the detail view as JSON.
        #[arg(long)]
        json: bool,

        /// Number of records skipped when numbering.
        #[arg(long)]
        skip: Option<u32>,
    },

    /// Submit a URL for scraping, then list architectures.
    Submit {
        /// The URL to scrape.
        url: String,

        /// Print the refreshed cards as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check that the service is reachable.
    Ping,

    /// Start an interactive session.
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::List { skip, limit, json } => {
            archscope::list::run_list(&cfg, skip, limit, json).await?;
        }
        Commands::Show {
            n,
            raw,
            json,
            skip,
        } => {
            archscope::list::run_show(&cfg, n, raw, json, skip).await?;
        }
        Commands::Submit { url, json } => {
            archscope::submit::run_submit(&cfg, &url, json).await?;
        }
        Commands::Ping => {
            archscope::submit::run_ping(&cfg).await?;
        }
        Commands::Shell => {
            archscope::shell::run_shell(&cfg).await?;
        }
    }

    Ok(())
}
