//! Order table commands. Orders are local sample data, so every run starts
//! from the same book.

use clap::Subcommand;
use storedash_core::{Order, OrderStatus};
use storedash_sync::{OrdersPage, PageContext};

use crate::output::{clip, finish, print_notices};

#[derive(Debug, Subcommand)]
pub enum OrderCommands {
    /// List orders, optionally filtered
    List {
        /// Only show orders with this status
        #[arg(long)]
        status: Option<OrderStatus>,
        /// Match against order id or customer name
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Change the status of one order
    SetStatus { id: String, status: OrderStatus },
    /// Change the status of several orders at once
    Bulk {
        status: OrderStatus,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Runs one `orders` sub-command.
///
/// # Errors
///
/// Returns an error if a status change is refused for any order.
pub(crate) fn run_orders(ctx: &PageContext, command: OrderCommands) -> anyhow::Result<()> {
    let mut page = OrdersPage::mount(ctx);
    match command {
        OrderCommands::List { status, search } => {
            page.set_status_filter(status);
            page.set_search(search);
            print_table(&page.visible());
            Ok(())
        }
        OrderCommands::SetStatus { id, status } => {
            let result = page.update_status(&id, status);
            print_notices(page.take_notices());
            finish(result)?;
            if let Some(order) = page.book().get(&id) {
                print_table(&[order]);
            }
            Ok(())
        }
        OrderCommands::Bulk { status, ids } => {
            for id in &ids {
                page.set_selected(id, true);
            }
            let outcome = page.bulk_update(status);
            print_notices(page.take_notices());
            if outcome.rejected.is_empty() {
                Ok(())
            } else {
                anyhow::bail!(
                    "{} of {} order(s) not updated",
                    outcome.rejected.len(),
                    ids.len()
                )
            }
        }
    }
}

fn print_table(orders: &[&Order]) {
    if orders.is_empty() {
        println!("no matching orders");
        return;
    }
    println!(
        "{:<10}{:<22}{:<12}{:>10}{:>7}  STATUS",
        "ID", "CUSTOMER", "DATE", "TOTAL", "ITEMS"
    );
    for order in orders {
        println!(
            "{:<10}{:<22}{:<12}{:>10}{:>7}  {}",
            order.id,
            clip(&order.customer, 20),
            order.date.to_string(),
            order.total.to_string(),
            order.items,
            order.status.as_str()
        );
    }
}
