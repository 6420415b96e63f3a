//! Customer command handlers.

use clap::Subcommand;
use storedash_sync::{CustomersPage, PageContext};

use crate::output::{clip, ensure_loaded, finish, print_notices};

/// Sub-commands available under `customers`.
#[derive(Debug, Subcommand)]
pub enum CustomerCommands {
    /// List customers (admin accounts are hidden)
    List,
    /// Flip a customer between active and inactive
    Toggle { id: String },
}

/// Runs one `customers` sub-command against a freshly mounted page.
///
/// # Errors
///
/// Returns an error if the initial fetch fails or the toggle is refused.
pub(crate) async fn run_customers(
    ctx: &PageContext,
    command: CustomerCommands,
) -> anyhow::Result<()> {
    let page = CustomersPage::mount(ctx).await;
    if let Err(err) = ensure_loaded(&page.load_state()) {
        print_notices(page.take_notices());
        return Err(err);
    }

    let result = match command {
        CustomerCommands::List => {
            print_table(&page);
            Ok(())
        }
        CustomerCommands::Toggle { id } => page.toggle_status(&id).await.map(|status| {
            println!("{id} is now {status}");
        }),
    };

    print_notices(page.take_notices());
    finish(result)
}

fn print_table(page: &CustomersPage) {
    let items = page.items();
    if items.is_empty() {
        println!("no customers yet");
        return;
    }
    println!(
        "{:<26}{:<22}{:<30}{:<16}{:<10}{:>7}  ADDRESS",
        "ID", "NAME", "EMAIL", "PHONE", "STATUS", "ORDERS"
    );
    for customer in &items {
        println!(
            "{:<26}{:<22}{:<30}{:<16}{:<10}{:>7}  {}",
            customer.id,
            clip(&customer.name, 20),
            clip(&customer.email, 28),
            clip(&customer.phone, 14),
            customer.status.as_str(),
            customer.orders,
            customer.address.one_line()
        );
    }
}
