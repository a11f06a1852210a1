mod cli;
mod commands;

use std::io::Write;

use anyhow::Context;
use clap::Parser;

use storefront_catalog::StorefrontConfig;

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let cli = Cli::parse();

    let mut config = StorefrontConfig::from_env();
    if let Some(prefix) = cli.path_prefix {
        config = config.with_product_path_prefix(prefix);
    }

    let output = match cli.command {
        Commands::Page { slug, picks } => {
            let catalog = commands::load_catalog(cli.catalog.as_deref(), cli.demo)?;
            let report = commands::run_page(&catalog, &config, &slug, &picks)?;
            serde_json::to_string_pretty(&report)?
        }
        Commands::Seed { suffix } => {
            let products = commands::run_seed(suffix.as_deref())?;
            serde_json::to_string_pretty(&products)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}").context("failed to write output")?;
    Ok(())
}
