use storedash_client::CustomersApi;
use storedash_core::{ActiveStatus, Customer};

use super::{initial_load, PageContext};
use crate::error::SyncError;
use crate::notice::{LoadState, Notice};
use crate::synchronizer::Synchronizer;

/// Non-admin user accounts with an optimistic status switch.
pub struct CustomersPage {
    customers: Synchronizer<CustomersApi>,
}

impl CustomersPage {
    pub async fn mount(ctx: &PageContext) -> Self {
        let customers = Synchronizer::new(CustomersApi::new(ctx.client.clone()));
        initial_load(&customers).await;
        Self { customers }
    }

    #[must_use]
    pub fn synchronizer(&self) -> &Synchronizer<CustomersApi> {
        &self.customers
    }

    #[must_use]
    pub fn items(&self) -> Vec<Customer> {
        self.customers.items()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.customers.load_state()
    }

    /// # Errors
    ///
    /// Returns the fetch error; the previous list is kept.
    pub async fn retry(&self) -> Result<(), SyncError> {
        self.customers.load().await
    }

    /// # Errors
    ///
    /// See [`Synchronizer::toggle_status`]. On failure the customer shows
    /// its previous status again.
    pub async fn toggle_status(&self, id: &str) -> Result<ActiveStatus, SyncError> {
        self.customers.toggle_status(id).await
    }

    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        self.customers.take_notices()
    }
}

impl Drop for CustomersPage {
    fn drop(&mut self) {
        self.customers.unmount();
    }
}
