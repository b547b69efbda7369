//! GoMarket CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart list
//!
//! # Add a product (repeat to bump its quantity)
//! gm-cart add --id 42 --title "Sneaker" --image-url https://img.example/42.png --price 199.90
//!
//! # Change quantities
//! gm-cart increment 42
//! gm-cart decrement 42
//!
//! # Empty the cart
//! gm-cart clear
//! ```
//!
//! # Commands
//!
//! - `list` - Show the cart contents
//! - `add` - Add one unit of a product
//! - `increment` / `decrement` - Change the quantity of a product in the cart
//! - `clear` - Empty the cart and delete the stored snapshot
//!
//! Storage location and behaviour are configured through `GOMARKET_*`
//! environment variables; see `gomarket_cart::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use gomarket_cart::CartConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "GoMarket cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart contents
    List,
    /// Add one unit of a product
    Add {
        /// Catalog product ID
        #[arg(short, long)]
        id: String,

        /// Product title
        #[arg(short, long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.90)
        #[arg(short, long)]
        price: String,
    },
    /// Add one unit of a product already in the cart
    Increment {
        /// Catalog product ID
        id: String,
    },
    /// Remove one unit of a product, dropping it at zero
    Decrement {
        /// Catalog product ID
        id: String,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarket_cart=info,gm_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    let code = match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            1
        }
    };

    // Flush pending Sentry events before exiting
    drop(sentry_guard);
    std::process::exit(code);
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = config.open_store().await?;

    match cli.command {
        Commands::List => commands::cart::list(&store),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            let product = commands::cart::parse_product(id, title, image_url, &price)?;
            commands::cart::add(&store, product).await?;
        }
        Commands::Increment { id } => commands::cart::increment(&store, id).await?,
        Commands::Decrement { id } => commands::cart::decrement(&store, id).await?,
        Commands::Clear => commands::cart::clear(&store).await?,
    }
    Ok(())
}
