mod auth;
mod catalog;
mod coupons;
mod customers;
mod orders;
mod output;
mod products;

use clap::{Parser, Subcommand};
use storedash_client::{AdminClient, FileSessionStore, SessionContext};
use storedash_core::TransitionPolicy;
use storedash_sync::PageContext;
use tracing_subscriber::EnvFilter;

use crate::catalog::{CategoryCommands, SubcategoryCommands};
use crate::coupons::CouponCommands;
use crate::customers::CustomerCommands;
use crate::orders::OrderCommands;
use crate::products::ProductCommands;

#[derive(Debug, Parser)]
#[command(name = "storedash")]
#[command(about = "Store admin dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        #[arg(long, env = "STOREDASH_EMAIL")]
        email: String,
        #[arg(long, env = "STOREDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the session token
    Logout,
    /// Manage product categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage subcategories
    Subcategories {
        #[command(subcommand)]
        command: SubcategoryCommands,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage discount coupons
    Coupons {
        #[command(subcommand)]
        command: CouponCommands,
    },
    /// List customers and switch their status
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Work with the sample order table
    Orders {
        /// Only allow pending → processing → shipped → delivered, with
        /// cancellation before shipping
        #[arg(long)]
        lifecycle: bool,
        #[command(subcommand)]
        command: OrderCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storedash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("storedash ready; run `storedash --help` for commands");
        return Ok(());
    };

    let session = SessionContext::restore(FileSessionStore::new(config.session_path.clone()))?;
    let client = AdminClient::new(&config, session.clone())?;
    tracing::debug!(api = %config.api_base_url, env = %config.env, "client configured");

    match command {
        Commands::Login { email, password } => auth::run_login(&client, &email, &password).await,
        Commands::Logout => auth::run_logout(&client).await,
        command => {
            if let Err(err) = session.require_authenticated() {
                anyhow::bail!("{err}; please log in with `storedash login`");
            }
            run_page_command(&PageContext::new(client, &config), command).await
        }
    }
}

async fn run_page_command(ctx: &PageContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Categories { command } => catalog::run_categories(ctx, command).await,
        Commands::Subcategories { command } => catalog::run_subcategories(ctx, command).await,
        Commands::Products { command } => products::run_products(ctx, command).await,
        Commands::Coupons { command } => coupons::run_coupons(ctx, command).await,
        Commands::Customers { command } => customers::run_customers(ctx, command).await,
        Commands::Orders { lifecycle, command } => {
            let policy = if lifecycle {
                TransitionPolicy::Lifecycle
            } else {
                TransitionPolicy::Unconstrained
            };
            orders::run_orders(&ctx.clone().with_order_policy(policy), command)
        }
        // Session commands never reach the page layer.
        Commands::Login { .. } | Commands::Logout => Ok(()),
    }
}

#[cfg(test)]
mod tests;
