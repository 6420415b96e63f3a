//! HTTP client for the storedash admin API.
//!
//! [`AdminClient`] owns the transport and the shared [`SessionContext`]; one
//! backend type per REST collection implements the [`backend`] traits the
//! synchronizer drives.

pub mod auth;
pub mod backend;
pub mod catalog;
pub mod client;
pub mod coupons;
pub mod customers;
pub mod error;
pub mod products;
pub mod routes;
pub mod session;

pub use backend::{
    Confirmation, CreateBackend, DeleteBackend, ResourceBackend, StatusBackend, UpdateBackend,
};
pub use catalog::{CategoriesApi, SubcategoriesApi};
pub use client::AdminClient;
pub use coupons::CouponsApi;
pub use customers::CustomersApi;
pub use error::{ApiError, ConflictReason, DeleteConflict, ErrorKind};
pub use products::{product_form, ProductsApi, SubcategoryField};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionContext, SessionError, SessionStore,
};
