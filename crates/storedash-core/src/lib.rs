//! Domain types for the storedash admin dashboard.
//!
//! Entities mirror the admin API's records; drafts carry form state and the
//! client-side checks run before a request is sent.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod coupons;
pub mod customers;
pub mod orders;
pub mod products;
pub mod resource;
pub mod status;
pub mod validation;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{Category, CategoryDraft, EntityRef, Subcategory, SubcategoryDraft};
pub use config::{load_app_config, load_app_config_from_env};
pub use coupons::{Coupon, CouponDraft, DiscountType};
pub use customers::{customers_from_users, Address, Customer, UserRecord};
pub use orders::{
    BulkOutcome, Order, OrderBook, OrderError, OrderFilter, OrderStatus, TransitionPolicy,
};
pub use products::{ImageUpload, Product, ProductDraft, MAX_THUMBNAILS};
pub use resource::{
    decode_collection, decode_record, merge_record, Resource, ShapeError, Toggleable,
};
pub use status::{ActiveStatus, CouponStatus};
pub use validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
