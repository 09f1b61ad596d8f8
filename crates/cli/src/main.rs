//! Kiosk CLI - Terminal front end for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # List collections
//! kiosk catalog
//!
//! # Browse a category with a search term
//! kiosk browse -c Bars -s protein --more 1
//!
//! # One collection by handle
//! kiosk collection protein-bars
//!
//! # Interactive shop session (debounced search)
//! kiosk shop
//!
//! # Cart
//! kiosk cart add protein-bar
//! kiosk cart set gid://shopify/Product/1 3
//! kiosk cart
//!
//! # Account (prompts for the password, or reads it from piped stdin)
//! kiosk login -e asha@example.com
//! echo secret1 | kiosk login -e asha@example.com
//! kiosk orders
//!
//! # Checkout
//! kiosk checkout --name "Asha Rao" --address "12 MG Road, Indiranagar" --pincode 560038 --mobile 9876543210
//! ```
//!
//! Configuration comes from the environment; see `kiosk_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kiosk_storefront::config::StorefrontConfig;
use kiosk_storefront::error::Result;
use kiosk_storefront::services::account::{LoginForm, SignupForm};
use kiosk_storefront::services::checkout::{CheckoutForm, DeliveryOption, PaymentMethod};
use kiosk_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "kiosk")]
#[command(author, version, about = "Kiosk storefront")]
struct Cli {
    /// Extra catalog load attempts after a failure
    #[arg(long, global = true, default_value_t = 0)]
    retries: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List collections and their product counts
    Catalog,
    /// Show products for a category and search term
    Browse {
        /// Collection title
        #[arg(short, long, default_value = "All")]
        category: String,

        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Extra pages to reveal
        #[arg(long, default_value_t = 0)]
        more: u32,
    },
    /// Show one collection's products by handle
    Collection {
        handle: String,

        /// Number of products to fetch
        #[arg(long, default_value_t = 20)]
        first: i64,
    },
    /// Interactive shop session
    Shop,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Sign in; the password is prompted for or read from stdin
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Create an account and sign in; the password is prompted for or read from stdin
    Signup {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        phone: String,

        #[arg(short, long)]
        email: String,

        /// Street address
        #[arg(long)]
        address: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in customer
    Profile,
    /// Show recent orders
    Orders,
    /// Place an order for the cart
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        pincode: String,

        #[arg(long)]
        mobile: String,

        /// `standard` or `express`
        #[arg(long, default_value = "standard")]
        delivery: DeliveryOption,

        /// `cod` or `online`
        #[arg(long, default_value = "cod")]
        payment: PaymentMethod,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and total
    Show,
    /// Add a product by ID or handle
    Add { product: String },
    /// Remove a line
    Remove { product: String },
    /// Set a line's quantity (values below 1 remove it)
    Set {
        product: String,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
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

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kiosk_storefront=info,kiosk_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result = match AppState::new(config) {
        Ok(mut state) => run(cli, &mut state).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.report());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, state: &mut AppState) -> Result<()> {
    let retries = cli.retries;
    match cli.command {
        Commands::Catalog => commands::catalog::list(state, retries).await?,
        Commands::Browse {
            category,
            search,
            more,
        } => commands::catalog::browse(state, retries, &category, &search, more).await?,
        Commands::Collection { handle, first } => {
            commands::catalog::collection(state, &handle, first).await?;
        }
        Commands::Shop => commands::shop::run(state, retries).await?,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(state),
            CartAction::Add { product } => commands::cart::add(state, retries, &product).await?,
            CartAction::Remove { product } => commands::cart::remove(state, &product),
            CartAction::Set { product, quantity } => {
                commands::cart::set_quantity(state, &product, quantity);
            }
            CartAction::Clear => commands::cart::clear(state),
        },
        Commands::Login { email } => {
            let form = LoginForm {
                email,
                password: commands::account::read_password(false)?,
            };
            commands::account::login(state, &form).await?;
        }
        Commands::Signup {
            first_name,
            last_name,
            phone,
            email,
            address,
        } => {
            let form = SignupForm {
                first_name,
                last_name,
                phone,
                email,
                password: commands::account::read_password(true)?,
                address,
            };
            commands::account::signup(state, &form).await?;
        }
        Commands::Logout => commands::account::logout(state),
        Commands::Profile => commands::account::profile(state).await?,
        Commands::Orders => commands::account::orders(state).await?,
        Commands::Checkout {
            name,
            address,
            pincode,
            mobile,
            delivery,
            payment,
        } => {
            let form = CheckoutForm {
                name,
                address,
                pincode,
                mobile,
                delivery,
                payment,
            };
            commands::checkout::place(state, &form)?;
        }
    }
    Ok(())
}
