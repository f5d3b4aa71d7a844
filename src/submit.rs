//! `archscope submit` and `archscope ping`.

use anyhow::{bail, Result};

use crate::client::{open_workflow, HttpBackend};
use crate::config::Config;
use crate::list::{cards_for, print_cards};

/// Submit `url` for scraping, then print the refreshed listing.
pub async fn run_submit(config: &Config, url: &str, json: bool) -> Result<()> {
    let ts_format = config.timestamp_format()?;
    let mut workflow = open_workflow(config, None, None)?;

    workflow.submit(url).await;
    if let Some(message) = workflow.error() {
        bail!("{}", message);
    }

    if !json {
        println!("Scraped {}", url.trim());
        println!();
    }
    let cards = cards_for(&workflow, &ts_format);
    print_cards(&mut std::io::stdout().lock(), &cards, json)
}

/// Check that the configured service answers.
pub async fn run_ping(config: &Config) -> Result<()> {
    let backend = HttpBackend::from_config(&config.api)?;
    match backend.ping().await {
        Ok(greeting) => {
            println!("{}: {}", backend.base_url(), greeting);
            Ok(())
        }
        Err(e) => bail!("{} is not reachable: {}", backend.base_url(), e),
    }
}
