//! Optimistic synchronization between dashboard pages and the admin API.
//!
//! [`Synchronizer`] is the generic store-plus-dispatcher every page builds
//! on; [`InvalidationBus`] tells pages when derived counts went stale; and
//! [`FormDialog`] tracks add/edit drafts until the server accepts them.

pub mod error;
pub mod form;
pub mod invalidation;
pub mod notice;
pub mod pages;
pub mod store;
pub mod synchronizer;

pub use error::SyncError;
pub use form::{FormDialog, FormState};
pub use invalidation::{Invalidation, InvalidationBus, Subscription};
pub use notice::{LoadState, Notice};
pub use pages::{
    CategoriesPage, CouponsPage, CustomersPage, OrdersPage, PageContext, ProductsPage,
    SubcategoriesPage,
};
pub use store::ResourceStore;
pub use synchronizer::Synchronizer;
