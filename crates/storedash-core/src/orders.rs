//! Demo order book.
//!
//! Orders have no API yet; the book is seeded locally and mutated in place.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer: String,
    pub date: NaiveDate,
    pub total: Decimal,
    pub items: u32,
    pub status: OrderStatus,
}

/// Which status changes the book accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may be set from any status.
    #[default]
    Unconstrained,
    /// pending → processing → shipped → delivered; cancellation only before
    /// shipping. Setting the current status again is a no-op.
    Lifecycle,
}

impl TransitionPolicy {
    #[must_use]
    pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::{Cancelled, Delivered, Pending, Processing, Shipped};
        match self {
            TransitionPolicy::Unconstrained => true,
            TransitionPolicy::Lifecycle => {
                from == to
                    || matches!(
                        (from, to),
                        (Pending, Processing)
                            | (Processing, Shipped)
                            | (Shipped, Delivered)
                            | (Pending | Processing, Cancelled)
                    )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("order {0} not found")]
    NotFound(String),

    #[error("order {id} cannot move from {from} to {to}")]
    IllegalTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// Status filter plus free-text search over customer name and order id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// `None` means all statuses.
    pub status: Option<OrderStatus>,
    pub search: String,
}

impl OrderFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || order.customer.to_lowercase().contains(&needle)
            || order.id.to_lowercase().contains(&needle)
    }
}

/// Result of a bulk update: which orders changed and which were refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub updated: Vec<String>,
    pub rejected: Vec<OrderError>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    policy: TransitionPolicy,
}

impl OrderBook {
    #[must_use]
    pub fn new(orders: Vec<Order>, policy: TransitionPolicy) -> Self {
        Self { orders, policy }
    }

    /// The three sample orders the dashboard ships with.
    #[must_use]
    pub fn demo(policy: TransitionPolicy) -> Self {
        let order = |id: &str, customer: &str, day: u32, cents: i64, items, status| Order {
            id: id.to_string(),
            customer: customer.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap_or_default(),
            total: Decimal::new(cents, 2),
            items,
            status,
        };
        Self::new(
            vec![
                order("ORD001", "John Doe", 15, 29_999, 3, OrderStatus::Pending),
                order("ORD002", "Jane Smith", 14, 15_999, 2, OrderStatus::Processing),
                order("ORD003", "Bob Johnson", 13, 49_999, 5, OrderStatus::Shipped),
            ],
            policy,
        )
    }

    #[must_use]
    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn filtered<'a>(&'a self, filter: &'a OrderFilter) -> impl Iterator<Item = &'a Order> {
        self.orders.iter().filter(move |o| filter.matches(o))
    }

    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown id and
    /// [`OrderError::IllegalTransition`] when the policy refuses the change.
    pub fn update_status(&mut self, id: &str, status: OrderStatus) -> Result<(), OrderError> {
        let policy = self.policy;
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        if !policy.allows(order.status, status) {
            return Err(OrderError::IllegalTransition {
                id: id.to_string(),
                from: order.status,
                to: status,
            });
        }
        tracing::debug!(order = id, from = %order.status, to = %status, "order status updated");
        order.status = status;
        Ok(())
    }

    /// Applies `status` to every selected order, reporting refusals per order.
    pub fn bulk_update<S: AsRef<str>>(&mut self, ids: &[S], status: OrderStatus) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for id in ids {
            let id = id.as_ref();
            match self.update_status(id, status) {
                Ok(()) => outcome.updated.push(id.to_string()),
                Err(err) => outcome.rejected.push(err),
            }
        }
        outcome
    }
}
