use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storefront CLI - inspect product pages and variant selection
#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Resolve storefront product pages and replay variant option clicks")]
#[command(version)]
pub struct Cli {
    /// JSON catalog file (an array of products). Defaults to $STOREFRONT_CATALOG.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Add the demo t-shirt family to the catalog.
    #[arg(long, global = true)]
    pub demo: bool,

    /// Product page path prefix (overrides $STOREFRONT_PRODUCT_PATH_PREFIX).
    #[arg(long, global = true)]
    pub path_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a product page and replay option clicks on it
    Page {
        /// Product slug
        slug: String,

        /// Option click as GROUP=OPTION; repeat for several clicks, applied in order
        #[arg(short, long = "select", value_parser = parse_pick)]
        picks: Vec<Pick>,
    },
    /// Print the demo family as a catalog file
    Seed {
        /// Suffix appended to every demo slug
        #[arg(long)]
        suffix: Option<String>,
    },
}

/// One option click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub group: String,
    pub option: String,
}

fn parse_pick(raw: &str) -> Result<Pick, String> {
    match raw.split_once('=') {
        Some((group, option)) if !group.is_empty() && !option.is_empty() => Ok(Pick {
            group: group.to_string(),
            option: option.to_string(),
        }),
        _ => Err(format!("expected GROUP=OPTION, got {raw:?}")),
    }
}
