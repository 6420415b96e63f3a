//! Mutation dispatcher over one resource collection.
//!
//! A [`Synchronizer`] owns the confirmed [`ResourceStore`] plus an optimistic
//! overlay. Views read through the overlay; the confirmed store only changes
//! when the server answers. Every action sends exactly one request, is
//! refused while another change to the same entity is in flight, and is
//! dropped on the floor if the owning page was unmounted meanwhile.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use storedash_client::{
    ApiError, Confirmation, CreateBackend, DeleteBackend, DeleteConflict, ResourceBackend,
    StatusBackend, UpdateBackend,
};
use storedash_core::{ActiveStatus, Resource, Toggleable};
use tokio::sync::watch;

use crate::error::SyncError;
use crate::invalidation::{Invalidation, InvalidationBus};
use crate::notice::{LoadState, Notice};
use crate::store::ResourceStore;

struct State<R> {
    store: ResourceStore<R>,
    overlay: HashMap<String, R>,
    in_flight: HashSet<String>,
    pending_delete: Option<String>,
    conflict: Option<DeleteConflict>,
    load_state: LoadState,
    load_seq: u64,
    notices: Vec<Notice>,
    mounted: bool,
}

impl<R: Resource> State<R> {
    fn new() -> Self {
        Self {
            store: ResourceStore::new(),
            overlay: HashMap::new(),
            in_flight: HashSet::new(),
            pending_delete: None,
            conflict: None,
            load_state: LoadState::Idle,
            load_seq: 0,
            notices: Vec::new(),
            mounted: true,
        }
    }

    fn notify(&mut self, notice: Notice) {
        match &notice {
            Notice::Success(message) => tracing::info!(resource = R::LABEL, %message, "notice"),
            Notice::Error(message) => tracing::warn!(resource = R::LABEL, %message, "notice"),
        }
        self.notices.push(notice);
    }

    /// Claims `id` for a mutation and returns its confirmed record.
    fn claim(&mut self, id: &str) -> Result<R, SyncError> {
        if !self.mounted {
            return Err(SyncError::Unmounted);
        }
        if self.in_flight.contains(id) {
            self.notify(Notice::Error(format!(
                "A change to this {} is still in progress",
                R::LABEL.to_lowercase()
            )));
            return Err(SyncError::Busy {
                label: R::LABEL,
                id: id.to_string(),
            });
        }
        let current = self.store.get(id).cloned().ok_or_else(|| SyncError::NotFound {
            label: R::LABEL,
            id: id.to_string(),
        })?;
        self.in_flight.insert(id.to_string());
        Ok(current)
    }

    /// Releases `id` and reports whether the response should still be applied.
    fn release(&mut self, id: &str) -> Result<(), SyncError> {
        self.in_flight.remove(id);
        self.overlay.remove(id);
        if self.mounted {
            Ok(())
        } else {
            tracing::debug!(resource = R::LABEL, id, "response arrived after unmount; ignored");
            Err(SyncError::Unmounted)
        }
    }
}

/// Store plus dispatcher for one collection. Clones share state.
pub struct Synchronizer<B: ResourceBackend> {
    backend: Arc<B>,
    state: Arc<Mutex<State<B::Resource>>>,
    revision: Arc<watch::Sender<u64>>,
    on_delete: Option<(InvalidationBus, Invalidation)>,
}

impl<B: ResourceBackend> Clone for Synchronizer<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
            revision: Arc::clone(&self.revision),
            on_delete: self.on_delete.clone(),
        }
    }
}

impl<B: ResourceBackend> std::fmt::Debug for Synchronizer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Synchronizer")
            .field("resource", &B::Resource::LABEL)
            .field("len", &state.store.len())
            .field("load_state", &state.load_state)
            .field("in_flight", &state.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl<B: ResourceBackend> Synchronizer<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            backend: Arc::new(backend),
            state: Arc::new(Mutex::new(State::new())),
            revision: Arc::new(revision),
            on_delete: None,
        }
    }

    /// Publishes `event` on `bus` after every confirmed delete.
    #[must_use]
    pub fn publish_on_delete(mut self, bus: InvalidationBus, event: Invalidation) -> Self {
        self.on_delete = Some((bus, event));
        self
    }

    fn lock(&self) -> MutexGuard<'_, State<B::Resource>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the collection and replaces the confirmed store.
    ///
    /// On failure the store keeps its previous contents, the load state
    /// becomes [`LoadState::Failed`] and an error notice is queued. A load
    /// overtaken by a newer one is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the fetch fails and
    /// [`SyncError::Unmounted`] when the page went away meanwhile.
    pub async fn load(&self) -> Result<(), SyncError> {
        let seq = {
            let mut state = self.lock();
            if !state.mounted {
                return Err(SyncError::Unmounted);
            }
            state.load_seq += 1;
            state.load_state = LoadState::Loading;
            state.load_seq
        };

        let result = self.backend.list().await;

        {
            let mut state = self.lock();
            if !state.mounted {
                tracing::debug!(resource = B::Resource::LABEL, "list arrived after unmount; ignored");
                return Err(SyncError::Unmounted);
            }
            if seq != state.load_seq {
                tracing::debug!(resource = B::Resource::LABEL, seq, "superseded list ignored");
                return Ok(());
            }
            match result {
                Ok(items) => {
                    tracing::debug!(resource = B::Resource::LABEL, count = items.len(), "collection loaded");
                    state.store.replace(items);
                    state.load_state = LoadState::Ready;
                }
                Err(err) => {
                    let message = err.user_message();
                    state.load_state = LoadState::Failed {
                        message: message.clone(),
                    };
                    state.notify(Notice::Error(message));
                    return Err(err.into());
                }
            }
        }

        self.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    /// Stops applying responses. Pending requests still complete on the
    /// wire but their results are ignored.
    pub fn unmount(&self) {
        let mut state = self.lock();
        state.mounted = false;
        state.pending_delete = None;
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    /// The collection as the view shows it: confirmed records with optimistic
    /// values substituted.
    #[must_use]
    pub fn items(&self) -> Vec<B::Resource> {
        let state = self.lock();
        state
            .store
            .iter()
            .map(|item| state.overlay.get(item.id()).unwrap_or(item).clone())
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<B::Resource> {
        let state = self.lock();
        state
            .overlay
            .get(id)
            .or_else(|| state.store.get(id))
            .cloned()
    }

    /// The last server-confirmed record, ignoring optimistic values.
    #[must_use]
    pub fn confirmed(&self, id: &str) -> Option<B::Resource> {
        self.lock().store.get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.lock().load_state.clone()
    }

    #[must_use]
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.lock().in_flight.contains(id)
    }

    /// Number of completed loads so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that changes after every completed load.
    #[must_use]
    pub fn subscribe_revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn notify(&self, notice: Notice) {
        self.lock().notify(notice);
    }

    /// Drains queued notices, oldest first.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().notices)
    }

    /// Applies a confirmation that may ask for a reload.
    async fn settle(&self, confirmation: Confirmation<()>, success: String) -> Result<(), SyncError> {
        self.notify(Notice::Success(success));
        if confirmation == Confirmation::Reload {
            self.load().await?;
        }
        Ok(())
    }

    fn fail(&self, err: ApiError) -> SyncError {
        self.notify(Notice::Error(err.user_message()));
        SyncError::Api(err)
    }
}

impl<B: CreateBackend> Synchronizer<B> {
    /// Sends `draft` and appends the confirmed record.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the server refuses; the store is
    /// unchanged and an error notice is queued.
    pub async fn create(&self, draft: &B::Draft) -> Result<(), SyncError> {
        if !self.is_mounted() {
            return Err(SyncError::Unmounted);
        }
        let result = self.backend.create(draft).await;
        if !self.is_mounted() {
            tracing::debug!(resource = B::Resource::LABEL, "create response after unmount; ignored");
            return Err(SyncError::Unmounted);
        }
        let confirmation = result.map_err(|err| self.fail(err))?;
        let confirmation = match confirmation {
            Confirmation::Value(record) => {
                self.lock().store.apply_create(record);
                Confirmation::Value(())
            }
            Confirmation::Reload => Confirmation::Reload,
        };
        self.settle(confirmation, format!("{} added successfully", B::Resource::LABEL))
            .await
    }
}

impl<B: UpdateBackend> Synchronizer<B> {
    /// Sends `patch` for `id` and replaces the record with the server's.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Busy`] while another change to `id` is pending,
    /// or [`SyncError::Api`] when the server refuses.
    pub async fn update(&self, id: &str, patch: &B::Patch) -> Result<(), SyncError> {
        let current = self.lock().claim(id)?;
        let result = self.backend.update(&current, patch).await;
        self.lock().release(id)?;

        let confirmation = result.map_err(|err| self.fail(err))?;
        let confirmation = match confirmation {
            Confirmation::Value(record) => {
                self.lock().store.apply_update(id, record);
                Confirmation::Value(())
            }
            Confirmation::Reload => Confirmation::Reload,
        };
        self.settle(confirmation, format!("{} updated successfully", B::Resource::LABEL))
            .await
    }
}

impl<B: DeleteBackend> Synchronizer<B> {
    /// Stages `id` for deletion. Nothing is sent until
    /// [`confirm_delete`](Self::confirm_delete).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn request_delete(&self, id: &str) -> Result<(), SyncError> {
        let mut state = self.lock();
        if state.store.get(id).is_none() {
            return Err(SyncError::NotFound {
                label: B::Resource::LABEL,
                id: id.to_string(),
            });
        }
        state.pending_delete = Some(id.to_string());
        Ok(())
    }

    pub fn cancel_delete(&self) {
        self.lock().pending_delete = None;
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<String> {
        self.lock().pending_delete.clone()
    }

    /// The open conflict dialog, if the last delete was blocked.
    #[must_use]
    pub fn conflict(&self) -> Option<DeleteConflict> {
        self.lock().conflict.clone()
    }

    pub fn dismiss_conflict(&self) {
        self.lock().conflict = None;
    }

    /// Deletes the staged entity.
    ///
    /// A "remove products first" refusal opens the conflict dialog instead
    /// of queuing a notice. Either way a failed delete keeps the entity.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NothingStaged`] when no delete was requested,
    /// [`SyncError::Busy`] while another change is pending, or
    /// [`SyncError::Api`] when the server refuses.
    pub async fn confirm_delete(&self) -> Result<(), SyncError> {
        let (id, current) = {
            let mut state = self.lock();
            let id = state.pending_delete.clone().ok_or(SyncError::NothingStaged)?;
            let current = state.claim(&id)?;
            state.pending_delete = None;
            (id, current)
        };

        let result = self.backend.delete(&current).await;
        let released = self.lock().release(&id);

        // Listeners hear about a confirmed delete even after unmount.
        if result.is_ok() {
            if let Some((bus, event)) = &self.on_delete {
                bus.publish(*event);
            }
        }
        released?;

        match result {
            Ok(()) => {
                self.lock().store.apply_delete(&id);
                self.notify(Notice::Success(format!(
                    "{} deleted successfully",
                    B::Resource::LABEL
                )));
                Ok(())
            }
            Err(ApiError::Conflict(conflict)) => {
                tracing::info!(resource = B::Resource::LABEL, id = %id, "delete blocked; opening conflict dialog");
                self.lock().conflict = Some(conflict.clone());
                Err(SyncError::Api(ApiError::Conflict(conflict)))
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}

impl<B> Synchronizer<B>
where
    B: StatusBackend,
    B::Resource: Toggleable,
{
    /// Flips the status of `id`.
    ///
    /// The target is computed from the confirmed record and shown
    /// immediately. The server's answer then replaces it; a failure restores
    /// the confirmed record.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Frozen`] for records in a terminal state,
    /// [`SyncError::Busy`] while another change is pending, or
    /// [`SyncError::Api`] when the server refuses.
    pub async fn toggle_status(&self, id: &str) -> Result<ActiveStatus, SyncError> {
        let (current, target) = {
            let mut state = self.lock();
            let current = state.claim(id)?;
            let Some(status) = current.active_status() else {
                state.in_flight.remove(id);
                let message = current.frozen_message();
                state.notify(Notice::Error(message.clone()));
                return Err(SyncError::Frozen(message));
            };
            let target = status.toggled();
            let mut optimistic = current.clone();
            optimistic.set_active_status(target);
            state.overlay.insert(id.to_string(), optimistic);
            (current, target)
        };
        tracing::debug!(resource = B::Resource::LABEL, id, status = %target, "optimistic status change");

        let result = self.backend.set_status(&current, target).await;
        self.lock().release(id)?;

        let (confirmed, reload) = match result {
            Ok(Confirmation::Value(status)) => (status, false),
            Ok(Confirmation::Reload) => (target, true),
            Err(err) => {
                tracing::debug!(resource = B::Resource::LABEL, id, "status change rolled back");
                return Err(self.fail(err));
            }
        };
        if let Some(record) = self.lock().store.get_mut(id) {
            record.set_active_status(confirmed);
        }
        let confirmation = if reload {
            Confirmation::Reload
        } else {
            Confirmation::Value(())
        };
        self.settle(
            confirmation,
            format!("{} status updated successfully", B::Resource::LABEL),
        )
        .await?;
        Ok(confirmed)
    }
}

#[cfg(test)]
#[path = "synchronizer_test.rs"]
mod tests;
