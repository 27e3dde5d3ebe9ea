use anyhow::Context;
use clap::Parser;

use storefront::commands::{self, Cli};
use storefront::config::StorefrontConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env().context("invalid configuration")?;
    storefront_observability::init_with(config.log_format);

    let catalog = commands::load_catalog(&config)?;
    tracing::debug!(products = catalog.len(), page_size = config.page_size, "storefront ready");

    let output = commands::run(&cli.command, &config, &catalog)?;
    let rendered = serde_json::to_string_pretty(&output).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
