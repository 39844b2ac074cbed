//! Marketplace cart CLI - Inspect and edit a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart stored in ./cart-storage.json
//! cart-cli show
//!
//! # Use another storage file and key
//! cart-cli --storage-path ~/.cache/cart.json --key @Shop:cart show
//!
//! # Add a product
//! cart-cli add --id sku-1 --title "Shirt" --image-url https://img/shirt.png --price 12.50
//! ```
//!
//! # Commands
//!
//! - `show` - List lines and the subtotal
//! - `add` - Add one unit of a product
//! - `increment` / `decrement` - Change a line's quantity by one
//! - `remove` - Drop a line
//! - `clear` - Empty the cart
//!
//! Defaults come from `CART_STORAGE_PATH`, `CART_STORAGE_KEY` and
//! `CART_CURRENCY` (see `marketplace_cart::config`); flags override them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marketplace_cart::{CartConfig, CartProvider, FileStorage};
use marketplace_core::{NewCartItem, Price, ProductId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Marketplace cart tools")]
struct Cli {
    /// Storage file (overrides `CART_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage_path: Option<PathBuf>,

    /// Storage key (overrides `CART_STORAGE_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price (e.g. 12.50)
        #[arg(long)]
        price: Price,
    },
    /// Raise a product's quantity by one
    Increment {
        /// Product id
        id: ProductId,
    },
    /// Lower a product's quantity by one, removing it at zero
    Decrement {
        /// Product id
        id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marketplace_cart=info,marketplace_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = resolve_config(CartConfig::from_env()?, &cli)?;
    let storage = FileStorage::new(&config.storage_path);
    tracing::debug!(
        path = %config.storage_path.display(),
        key = %config.storage_key,
        "Opening cart"
    );

    let mut provider = CartProvider::new();
    provider.mount(storage, &config).await?;
    let store = provider.use_cart_mut()?;

    let output = match cli.command {
        Commands::Show => commands::cart::show(store, config.currency),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(store, NewCartItem::new(id, title, image_url, price)).await?,
        Commands::Increment { id } => commands::cart::increment(store, &id).await?,
        Commands::Decrement { id } => commands::cart::decrement(store, &id).await?,
        Commands::Remove { id } => commands::cart::remove(store, &id).await?,
        Commands::Clear => commands::cart::clear(store).await?,
    };

    provider.unmount();
    Ok(output)
}

/// Apply command-line overrides on top of the environment configuration.
fn resolve_config(
    config: CartConfig,
    cli: &Cli,
) -> Result<CartConfig, marketplace_cart::ConfigError> {
    let config = match &cli.storage_path {
        Some(path) => config.with_storage_path(path),
        None => config,
    };
    match &cli.key {
        Some(key) => config.with_storage_key(key.as_str()),
        None => Ok(config),
    }
}
