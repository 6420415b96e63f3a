use storedash_core::{BulkOutcome, Order, OrderBook, OrderFilter, OrderStatus};

use super::PageContext;
use crate::error::SyncError;
use crate::notice::Notice;

/// The demo order table: local data, no server round trips.
#[derive(Debug)]
pub struct OrdersPage {
    book: OrderBook,
    filter: OrderFilter,
    selected: Vec<String>,
    notices: Vec<Notice>,
}

impl OrdersPage {
    #[must_use]
    pub fn mount(ctx: &PageContext) -> Self {
        Self::with_book(OrderBook::demo(ctx.order_policy))
    }

    #[must_use]
    pub fn with_book(book: OrderBook) -> Self {
        Self {
            book,
            filter: OrderFilter::default(),
            selected: Vec::new(),
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Orders matching the current filter, in book order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Order> {
        self.book.filtered(&self.filter).collect()
    }

    /// `None` shows every status.
    pub fn set_status_filter(&mut self, status: Option<OrderStatus>) {
        self.filter.status = status;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.search = query.into();
    }

    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Adds or removes `id` from the bulk selection.
    pub fn set_selected(&mut self, id: &str, selected: bool) {
        let present = self.selected.iter().any(|s| s == id);
        match (selected, present) {
            (true, false) => self.selected.push(id.to_string()),
            (false, true) => self.selected.retain(|s| s != id),
            _ => {}
        }
    }

    /// Selects every order, or clears the selection.
    pub fn select_all(&mut self, selected: bool) {
        self.selected = if selected {
            self.book.orders().iter().map(|o| o.id.clone()).collect()
        } else {
            Vec::new()
        };
    }

    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.book.orders().is_empty() && self.selected.len() == self.book.orders().len()
    }

    /// # Errors
    ///
    /// Returns [`SyncError::Order`] for unknown orders or refused
    /// transitions; an error notice is queued too.
    pub fn update_status(&mut self, id: &str, status: OrderStatus) -> Result<(), SyncError> {
        match self.book.update_status(id, status) {
            Ok(()) => {
                self.notices.push(Notice::Success(format!(
                    "Order {id} marked as {status}"
                )));
                Ok(())
            }
            Err(err) => {
                self.notices.push(Notice::Error(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Applies `status` to the selection. Refusals are reported per order.
    pub fn bulk_update(&mut self, status: OrderStatus) -> BulkOutcome {
        let outcome = self.book.bulk_update(&self.selected, status);
        if !outcome.updated.is_empty() {
            self.notices.push(Notice::Success(format!(
                "{} order(s) marked as {status}",
                outcome.updated.len()
            )));
        }
        for err in &outcome.rejected {
            self.notices.push(Notice::Error(err.to_string()));
        }
        tracing::debug!(
            updated = outcome.updated.len(),
            rejected = outcome.rejected.len(),
            %status,
            "bulk order update"
        );
        outcome
    }

    #[must_use]
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
