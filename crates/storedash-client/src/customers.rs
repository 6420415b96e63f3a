//! Customer endpoints. Customers are the non-admin users of the store.

use reqwest::Method;
use serde_json::json;
use storedash_core::{customers_from_users, decode_collection, ActiveStatus, Customer, UserRecord};

use crate::backend::{confirmed_status, Confirmation, ResourceBackend, StatusBackend};
use crate::client::{shape_error, AdminClient};
use crate::error::ApiError;
use crate::routes;

/// Backend for `/api/profile/all` and the account status route.
#[derive(Debug, Clone)]
pub struct CustomersApi {
    client: AdminClient,
}

impl CustomersApi {
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }
}

impl ResourceBackend for CustomersApi {
    type Resource = Customer;

    async fn list(&self) -> Result<Vec<Customer>, ApiError> {
        let body = self.client.get_json(routes::USERS).await?;
        let users: Vec<UserRecord> =
            decode_collection(body, &["users", "data"]).map_err(shape_error(routes::USERS))?;
        let total = users.len();
        let customers = customers_from_users(users);
        tracing::debug!(total, customers = customers.len(), "filtered admin accounts");
        Ok(customers)
    }
}

impl StatusBackend for CustomersApi {
    /// The account endpoint may answer with only a message. The list is
    /// then reloaded so the server's status wins.
    async fn set_status(
        &self,
        current: &Customer,
        status: ActiveStatus,
    ) -> Result<Confirmation<ActiveStatus>, ApiError> {
        let body = self
            .client
            .send_json(
                Method::PUT,
                &routes::customer_status(&current.id),
                &json!({ "userId": current.id, "status": status }),
            )
            .await?;
        Ok(confirmed_status(&body, &["user", "data"])
            .map_or(Confirmation::Reload, Confirmation::Value))
    }
}
