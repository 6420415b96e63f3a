//! Per-resource operations the synchronizer drives.
//!
//! Each REST collection gets one backend type implementing the subset of
//! these traits its endpoints support. Backends only talk HTTP; store updates
//! and notices happen in the synchronizer.

use std::future::Future;

use storedash_core::{ActiveStatus, Resource, Toggleable};

use crate::error::ApiError;

/// What a successful mutation response tells the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation<T> {
    /// The response carried the authoritative value.
    Value(T),
    /// The response is not a usable record; reload the collection.
    Reload,
}

impl<T> Confirmation<T> {
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Confirmation<U> {
        match self {
            Confirmation::Value(v) => Confirmation::Value(f(v)),
            Confirmation::Reload => Confirmation::Reload,
        }
    }
}

pub trait ResourceBackend: Send + Sync + 'static {
    type Resource: Resource;

    /// Fetches the whole collection in server order.
    fn list(&self) -> impl Future<Output = Result<Vec<Self::Resource>, ApiError>> + Send;
}

pub trait CreateBackend: ResourceBackend {
    type Draft: Send + Sync + 'static;

    fn create(
        &self,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<Confirmation<Self::Resource>, ApiError>> + Send;
}

pub trait UpdateBackend: ResourceBackend {
    type Patch: Send + Sync + 'static;

    /// `current` is the last confirmed record, for merging partial responses.
    fn update(
        &self,
        current: &Self::Resource,
        patch: &Self::Patch,
    ) -> impl Future<Output = Result<Confirmation<Self::Resource>, ApiError>> + Send;
}

pub trait DeleteBackend: ResourceBackend {
    /// # Errors
    ///
    /// Implementations return [`ApiError::Conflict`] when products block the
    /// delete.
    fn delete(
        &self,
        current: &Self::Resource,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

pub trait StatusBackend: ResourceBackend<Resource: Toggleable> {
    /// Asks the server to set `status`; returns the status it confirmed.
    fn set_status(
        &self,
        current: &Self::Resource,
        status: ActiveStatus,
    ) -> impl Future<Output = Result<Confirmation<ActiveStatus>, ApiError>> + Send;
}

/// Finds the `status` a toggle response confirmed, at the top level or inside
/// one of the envelope objects.
pub(crate) fn confirmed_status(
    body: &serde_json::Value,
    envelope_keys: &[&str],
) -> Option<ActiveStatus> {
    let read = |v: &serde_json::Value| {
        v.get("status")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse::<ActiveStatus>().ok())
    };
    read(body).or_else(|| {
        envelope_keys
            .iter()
            .filter_map(|key| body.get(*key))
            .find_map(read)
    })
}
