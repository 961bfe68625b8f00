//! Sole Trader CLI - Command-line storefront client.
//!
//! # Usage
//!
//! ```bash
//! # Log in (stores the session durably)
//! sole account login -e asha@example.com -p secret
//!
//! # Browse the catalog
//! sole shop products
//! sole shop search --name runner --brand Hightop
//!
//! # Cart operations
//! sole cart add --product 42 --size 10 --quantity 2
//! sole cart show
//! sole cart set-quantity 12 3
//! sole cart clear
//!
//! # Wishlist and orders
//! sole wishlist toggle 42
//! sole orders checkout --address "12 Lake Rd" --payment cod
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_API_BASE_URL` - Base URL of the shop REST API (required)
//! - `SHOP_SESSION_FILE` - Durable session file path (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]
// This binary talks to a terminal.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use sole_trader_client::{Shop, ShopConfig};

mod commands;

#[derive(Parser)]
#[command(name = "sole")]
#[command(author, version, about = "Sole Trader command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the login session
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// View and mutate the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// View and toggle the wishlist
    Wishlist {
        #[command(subcommand)]
        action: commands::wishlist::WishlistAction,
    },
    /// Browse the catalog
    Shop {
        #[command(subcommand)]
        action: commands::shop::ShopAction,
    },
    /// View and place orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
    /// Back-office operations (admin accounts only)
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let shop = Shop::new(ShopConfig::from_env()?)?;
    shop.init().await?;

    match cli.command {
        Commands::Account { action } => commands::account::run(&shop, action).await?,
        Commands::Cart { action } => commands::cart::run(&shop, action).await?,
        Commands::Wishlist { action } => commands::wishlist::run(&shop, action).await?,
        Commands::Shop { action } => commands::shop::run(&shop, action).await?,
        Commands::Orders { action } => commands::orders::run(&shop, action).await?,
        Commands::Admin { action } => commands::admin::run(&shop, action).await?,
    }
    Ok(())
}
