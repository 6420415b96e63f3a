use storedash_client::{CategoriesApi, DeleteConflict, SubcategoriesApi};
use storedash_core::{ActiveStatus, Category, CategoryDraft, Subcategory, SubcategoryDraft};

use super::{initial_load, name_or_unknown, surface_validation, PageContext};
use crate::error::SyncError;
use crate::form::FormDialog;
use crate::invalidation::{Invalidation, Subscription};
use crate::notice::{LoadState, Notice};
use crate::synchronizer::Synchronizer;

/// Subcategory list plus the categories offered as parents.
///
/// Only the subcategory collection refetches on product deletion; parent
/// categories are loaded once for the picker.
pub struct SubcategoriesPage {
    subcategories: Synchronizer<SubcategoriesApi>,
    categories: Synchronizer<CategoriesApi>,
    pub add_form: FormDialog<SubcategoryDraft>,
    pub rename_form: FormDialog<CategoryDraft>,
    _refetch: Subscription,
}

impl SubcategoriesPage {
    pub async fn mount(ctx: &PageContext) -> Self {
        let subcategories = Synchronizer::new(SubcategoriesApi::new(ctx.client.clone()));
        let categories = Synchronizer::new(CategoriesApi::new(ctx.client.clone()));
        let refetch = ctx
            .bus
            .subscribe_refetch(subcategories.clone(), Invalidation::ProductRemoved);
        futures::join!(initial_load(&subcategories), initial_load(&categories));
        Self {
            subcategories,
            categories,
            add_form: FormDialog::new(),
            rename_form: FormDialog::new(),
            _refetch: refetch,
        }
    }

    #[must_use]
    pub fn synchronizer(&self) -> &Synchronizer<SubcategoriesApi> {
        &self.subcategories
    }

    #[must_use]
    pub fn items(&self) -> Vec<Subcategory> {
        self.subcategories.items()
    }

    /// Parent choices for the add form.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.categories.items()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.subcategories.load_state()
    }

    /// # Errors
    ///
    /// Returns the first fetch error; lists that loaded are kept.
    pub async fn retry(&self) -> Result<(), SyncError> {
        let (subs, cats) = futures::join!(self.subcategories.load(), self.categories.load());
        subs.and(cats)
    }

    /// The parent's name from the populated reference, else from the loaded
    /// categories.
    #[must_use]
    pub fn parent_name(&self, subcategory: &Subcategory) -> String {
        let id = subcategory.category_id();
        let found = subcategory
            .category
            .name()
            .map(str::to_string)
            .or_else(|| self.categories.get(id).map(|c| c.name));
        name_or_unknown(id, found)
    }

    pub fn open_add(&mut self) {
        self.add_form.open(SubcategoryDraft::default());
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn open_rename(&mut self, id: &str) -> Result<(), SyncError> {
        let subcategory = self
            .subcategories
            .get(id)
            .ok_or_else(|| SyncError::NotFound {
                label: "Subcategory",
                id: id.to_string(),
            })?;
        self.rename_form.edit(id, CategoryDraft::new(subcategory.name));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns validation or server errors; the form stays open.
    pub async fn submit_add(&mut self) -> Result<(), SyncError> {
        let sync = &self.subcategories;
        let result = self
            .add_form
            .submit(SubcategoryDraft::validate, |draft, _| async move {
                sync.create(&draft).await
            })
            .await;
        surface_validation(sync, result)
    }

    /// # Errors
    ///
    /// Returns validation or server errors; the form stays open.
    pub async fn submit_rename(&mut self) -> Result<(), SyncError> {
        let sync = &self.subcategories;
        let result = self
            .rename_form
            .submit(validate_rename, |draft, target| async move {
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
        self.subcategories.toggle_status(id).await
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn request_delete(&self, id: &str) -> Result<(), SyncError> {
        self.subcategories.request_delete(id)
    }

    pub fn cancel_delete(&self) {
        self.subcategories.cancel_delete();
    }

    /// # Errors
    ///
    /// See [`Synchronizer::confirm_delete`].
    pub async fn confirm_delete(&self) -> Result<(), SyncError> {
        self.subcategories.confirm_delete().await
    }

    #[must_use]
    pub fn conflict(&self) -> Option<DeleteConflict> {
        self.subcategories.conflict()
    }

    pub fn dismiss_conflict(&self) {
        self.subcategories.dismiss_conflict();
    }

    /// Notices from both collections, subcategories first.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut notices = self.subcategories.take_notices();
        notices.extend(self.categories.take_notices());
        notices
    }
}

/// Renames reuse the category body but read as a subcategory in messages.
fn validate_rename(draft: &CategoryDraft) -> Result<(), storedash_core::ValidationErrors> {
    SubcategoryDraft::new(draft.name.clone(), "-").validate()
}

impl Drop for SubcategoriesPage {
    fn drop(&mut self) {
        self.subcategories.unmount();
        self.categories.unmount();
    }
}
