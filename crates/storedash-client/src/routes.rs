//! Admin API paths, relative to the configured base URL.

pub const LOGIN: &str = "/api/auth/login";
pub const LOGOUT: &str = "/api/auth/logout";

pub const CATEGORIES: &str = "/api/categories/";
pub const CREATE_CATEGORY: &str = "/api/categories/createcategory";

#[must_use]
pub fn edit_category(id: &str) -> String {
    format!("/api/categories/editCategory/{id}")
}

#[must_use]
pub fn delete_category(id: &str) -> String {
    format!("/api/categories/{id}")
}

#[must_use]
pub fn category_status(id: &str) -> String {
    format!("/api/categories/{id}/status")
}

pub const SUBCATEGORIES: &str = "/api/categories/getAllSubCategories/";
pub const CREATE_SUBCATEGORY: &str = "/api/categories/createSubcategory";

#[must_use]
pub fn edit_subcategory(id: &str) -> String {
    format!("/api/categories/editSubcategory/{id}")
}

#[must_use]
pub fn delete_subcategory(id: &str) -> String {
    format!("/api/categories/deleteSubcategory/{id}")
}

#[must_use]
pub fn subcategory_status(id: &str) -> String {
    format!("/api/categories/{id}/subStatus")
}

pub const PRODUCTS: &str = "/api/products";
pub const CREATE_PRODUCT: &str = "/api/products/add";

/// Update and delete share the same path.
#[must_use]
pub fn product(id: &str) -> String {
    format!("/api/products/{id}")
}

pub const COUPONS: &str = "/api/coupons";
pub const CREATE_COUPON: &str = "/api/coupons/add";

#[must_use]
pub fn coupon(id: &str) -> String {
    format!("/api/coupons/{id}")
}

#[must_use]
pub fn coupon_status(id: &str) -> String {
    format!("/api/coupons/{id}/status")
}

pub const USERS: &str = "/api/profile/all";

#[must_use]
pub fn customer_status(id: &str) -> String {
    format!("/api/auth/status/{id}")
}
