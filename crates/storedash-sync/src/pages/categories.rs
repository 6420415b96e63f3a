use storedash_client::{CategoriesApi, DeleteConflict};
use storedash_core::{ActiveStatus, Category, CategoryDraft};

use super::{initial_load, surface_validation, PageContext};
use crate::error::SyncError;
use crate::form::FormDialog;
use crate::invalidation::{Invalidation, Subscription};
use crate::notice::{LoadState, Notice};
use crate::synchronizer::Synchronizer;

/// Category list with add, rename, status toggle and guarded delete.
///
/// Product deletions elsewhere change `productCount`, so the page refetches
/// whenever one is published.
pub struct CategoriesPage {
    categories: Synchronizer<CategoriesApi>,
    pub add_form: FormDialog<CategoryDraft>,
    pub edit_form: FormDialog<CategoryDraft>,
    _refetch: Subscription,
}

impl CategoriesPage {
    pub async fn mount(ctx: &PageContext) -> Self {
        let categories = Synchronizer::new(CategoriesApi::new(ctx.client.clone()));
        let refetch = ctx
            .bus
            .subscribe_refetch(categories.clone(), Invalidation::ProductRemoved);
        initial_load(&categories).await;
        Self {
            categories,
            add_form: FormDialog::new(),
            edit_form: FormDialog::new(),
            _refetch: refetch,
        }
    }

    #[must_use]
    pub fn synchronizer(&self) -> &Synchronizer<CategoriesApi> {
        &self.categories
    }

    #[must_use]
    pub fn items(&self) -> Vec<Category> {
        self.categories.items()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.categories.load_state()
    }

    /// # Errors
    ///
    /// Returns the fetch error; the previous list is kept.
    pub async fn retry(&self) -> Result<(), SyncError> {
        self.categories.load().await
    }

    pub fn open_add(&mut self) {
        self.add_form.open(CategoryDraft::default());
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn open_edit(&mut self, id: &str) -> Result<(), SyncError> {
        let category = self.categories.get(id).ok_or_else(|| SyncError::NotFound {
            label: "Category",
            id: id.to_string(),
        })?;
        self.edit_form.edit(id, CategoryDraft::new(category.name));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns validation or server errors; the form stays open.
    pub async fn submit_add(&mut self) -> Result<(), SyncError> {
        let sync = &self.categories;
        let result = self
            .add_form
            .submit(CategoryDraft::validate, |draft, _| async move {
                sync.create(&draft).await
            })
            .await;
        surface_validation(sync, result)
    }

    /// # Errors
    ///
    /// Returns validation or server errors; the form stays open.
    pub async fn submit_edit(&mut self) -> Result<(), SyncError> {
        let sync = &self.categories;
        let result = self
            .edit_form
            .submit(CategoryDraft::validate, |draft, target| async move {
                let id = target.ok_or(SyncError::FormNotOpen)?;
                sync.update(&id, &draft).await
            })
            .await;
        surface_validation(sync, result)
    }

    /// # Errors
    ///
    /// See [`Synchronizer::toggle_status`].
    pub async fn toggle_status(&self, id: &str) -> Result<ActiveStatus, SyncError> {
        self.categories.toggle_status(id).await
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn request_delete(&self, id: &str) -> Result<(), SyncError> {
        self.categories.request_delete(id)
    }

    pub fn cancel_delete(&self) {
        self.categories.cancel_delete();
    }

    /// # Errors
    ///
    /// See [`Synchronizer::confirm_delete`]; a conflict is also available
    /// from [`conflict`](Self::conflict).
    pub async fn confirm_delete(&self) -> Result<(), SyncError> {
        self.categories.confirm_delete().await
    }

    #[must_use]
    pub fn conflict(&self) -> Option<DeleteConflict> {
        self.categories.conflict()
    }

    pub fn dismiss_conflict(&self) {
        self.categories.dismiss_conflict();
    }

    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        self.categories.take_notices()
    }
}

impl Drop for CategoriesPage {
    fn drop(&mut self) {
        self.categories.unmount();
    }
}
