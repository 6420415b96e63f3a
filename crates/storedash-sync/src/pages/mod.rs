//! One composite per dashboard screen.
//!
//! A page owns the synchronizers for the collections it shows, its dialogs,
//! and its invalidation subscriptions. Mounting loads the collections;
//! dropping the page unmounts them so late responses are discarded.

mod categories;
mod coupons;
mod customers;
mod orders;
mod products;
mod subcategories;

pub use categories::CategoriesPage;
pub use coupons::CouponsPage;
pub use customers::CustomersPage;
pub use orders::OrdersPage;
pub use products::ProductsPage;
pub use subcategories::SubcategoriesPage;

use storedash_client::{AdminClient, ResourceBackend};
use storedash_core::{AppConfig, TransitionPolicy};

use crate::error::SyncError;
use crate::invalidation::InvalidationBus;
use crate::notice::Notice;
use crate::synchronizer::Synchronizer;

/// Shared dependencies handed to every page on mount.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub client: AdminClient,
    pub bus: InvalidationBus,
    pub gallery_max_images: usize,
    pub order_policy: TransitionPolicy,
}

impl PageContext {
    #[must_use]
    pub fn new(client: AdminClient, config: &AppConfig) -> Self {
        Self {
            client,
            bus: InvalidationBus::new(),
            gallery_max_images: config.gallery_max_images,
            order_policy: TransitionPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_order_policy(mut self, policy: TransitionPolicy) -> Self {
        self.order_policy = policy;
        self
    }
}

/// Loads on mount. A failure is already recorded in the load state and as a
/// notice, so it is only logged here.
async fn initial_load<B: ResourceBackend>(sync: &Synchronizer<B>) {
    if let Err(err) = sync.load().await {
        tracing::warn!(error = %err, "initial load failed");
    }
}

/// Turns form validation failures into error notices, one per message.
fn surface_validation<B: ResourceBackend>(
    sync: &Synchronizer<B>,
    result: Result<(), SyncError>,
) -> Result<(), SyncError> {
    if let Err(SyncError::Validation(errors)) = &result {
        for message in errors.messages() {
            sync.notify(Notice::Error(message.clone()));
        }
    }
    result
}

/// Resolves a referenced record's display name, falling back to
/// `Unknown (<id>)` when it is not loaded.
fn name_or_unknown(id: &str, found: Option<String>) -> String {
    found.unwrap_or_else(|| format!("Unknown ({id})"))
}
