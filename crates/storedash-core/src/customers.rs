use serde::{Deserialize, Serialize};

use crate::resource::{Resource, Toggleable};
use crate::status::ActiveStatus;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl Address {
    /// Placeholder shown for users who never filled in an address.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            street_address: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            state: UNKNOWN.to_string(),
        }
    }

    /// `"city, state, country"` on one line.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!("{}, {}, {}", self.city, self.state, self.country)
    }
}

/// A raw account from `/api/profile/all`. Admin accounts are filtered out
/// before anything reaches the customer store.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub status: Option<ActiveStatus>,
    #[serde(default)]
    pub orders: Option<u32>,
}

impl UserRecord {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

/// A shopper account as shown on the Customers page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub status: ActiveStatus,
    pub orders: u32,
}

impl From<UserRecord> for Customer {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address.unwrap_or_else(Address::unknown),
            status: user.status.unwrap_or(ActiveStatus::Inactive),
            orders: user.orders.unwrap_or(0),
        }
    }
}

/// Drops admin accounts and fills the customer defaults.
#[must_use]
pub fn customers_from_users(users: Vec<UserRecord>) -> Vec<Customer> {
    users
        .into_iter()
        .filter(|user| !user.is_admin())
        .map(Customer::from)
        .collect()
}

impl Resource for Customer {
    const LABEL: &'static str = "Customer";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Toggleable for Customer {
    fn active_status(&self) -> Option<ActiveStatus> {
        Some(self.status)
    }

    fn set_active_status(&mut self, status: ActiveStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn users() -> Vec<UserRecord> {
        serde_json::from_value(json!([
            {"_id": "a1", "name": "Root", "email": "root@shop.test", "role": "admin"},
            {
                "_id": "u1",
                "name": "Ada",
                "email": "ada@shop.test",
                "phone": "555-0100",
                "role": "user",
                "status": "active",
                "orders": 4,
                "address": {"country": "UK", "streetAddress": "1 Lane", "city": "London", "state": "LDN"}
            },
            {"_id": "u2", "name": "Bo", "email": "bo@shop.test"}
        ]))
        .unwrap()
    }

    #[test]
    fn admins_are_excluded() {
        let customers = customers_from_users(users());
        let ids: Vec<_> = customers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u2"]);
    }

    #[test]
    fn missing_fields_take_customer_defaults() {
        let customers = customers_from_users(users());
        let bo = &customers[1];
        assert_eq!(bo.address, Address::unknown());
        assert_eq!(bo.status, ActiveStatus::Inactive);
        assert_eq!(bo.orders, 0);
        assert_eq!(bo.phone, "");
    }

    #[test]
    fn present_fields_are_kept() {
        let customers = customers_from_users(users());
        let ada = &customers[0];
        assert_eq!(ada.status, ActiveStatus::Active);
        assert_eq!(ada.orders, 4);
        assert_eq!(ada.address.one_line(), "London, LDN, UK");
    }
}
