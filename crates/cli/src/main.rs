//! shopcart CLI - inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show cart lines, quantity and total
//! cart-cli show
//!
//! # List the catalog with current cart quantities
//! cart-cli catalog
//!
//! # Change quantities
//! cart-cli increase 3
//! cart-cli decrease 3
//! cart-cli remove 3
//!
//! # Delete the persisted cart
//! cart-cli reset
//! ```
//!
//! The cart is read from and written to the same directory the storefront
//! uses (`SHOPCART_STORAGE_DIR`, default `.shopcart`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shopcart_core::{CurrencyCode, ItemId};
use shopcart_storefront::storage::DEFAULT_QUOTA_BYTES;

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "shopcart cart tools")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, env = "SHOPCART_STORAGE_DIR", default_value = ".shopcart", global = true)]
    storage_dir: PathBuf,

    /// Largest value the store accepts, in bytes
    #[arg(long, env = "SHOPCART_STORAGE_QUOTA_BYTES", default_value_t = DEFAULT_QUOTA_BYTES, global = true)]
    quota_bytes: usize,

    /// Catalog JSON file (bundled catalog when omitted)
    #[arg(long, env = "SHOPCART_CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    /// Currency the catalog prices are in
    #[arg(long, env = "SHOPCART_CURRENCY", default_value = "USD", global = true)]
    currency: CurrencyCode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cart lines and totals
    Show,
    /// List catalog items with their cart quantity
    Catalog,
    /// Add one unit of an item
    Increase {
        /// Catalog item ID
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
    },
    /// Remove one unit of an item
    Decrease {
        /// Catalog item ID
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
    },
    /// Remove an item entirely
    Remove {
        /// Catalog item ID
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
    },
    /// Delete the persisted cart
    Reset,
}

fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = commands::Context::open(
        &cli.storage_dir,
        cli.quota_bytes,
        cli.catalog.as_deref(),
        cli.currency,
    )?;

    match cli.command {
        Commands::Show => commands::cart::show(&ctx),
        Commands::Catalog => commands::catalog::list(&ctx),
        Commands::Increase { id } => commands::cart::increase(ctx, id)?,
        Commands::Decrease { id } => commands::cart::decrease(ctx, id)?,
        Commands::Remove { id } => commands::cart::remove(ctx, id)?,
        Commands::Reset => commands::cart::reset(&ctx)?,
    }
    Ok(())
}
