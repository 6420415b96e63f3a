use storedash_client::{CategoriesApi, ProductsApi, SubcategoriesApi};
use storedash_core::{
    Category, ImageUpload, Product, ProductDraft, Resource, Subcategory, ValidationErrors,
};

use super::{initial_load, name_or_unknown, surface_validation, PageContext};
use crate::error::SyncError;
use crate::form::FormDialog;
use crate::invalidation::Invalidation;
use crate::notice::{LoadState, Notice};
use crate::synchronizer::Synchronizer;

/// Product list with a shared add/edit form.
///
/// Categories and subcategories load first because drafts are validated
/// against them. A confirmed delete publishes
/// [`Invalidation::ProductRemoved`].
pub struct ProductsPage {
    products: Synchronizer<ProductsApi>,
    categories: Synchronizer<CategoriesApi>,
    subcategories: Synchronizer<SubcategoriesApi>,
    gallery_max_images: usize,
    pub form: FormDialog<ProductDraft>,
}

impl ProductsPage {
    pub async fn mount(ctx: &PageContext) -> Self {
        let products = Synchronizer::new(ProductsApi::new(ctx.client.clone()))
            .publish_on_delete(ctx.bus.clone(), Invalidation::ProductRemoved);
        let categories = Synchronizer::new(CategoriesApi::new(ctx.client.clone()));
        let subcategories = Synchronizer::new(SubcategoriesApi::new(ctx.client.clone()));
        futures::join!(initial_load(&categories), initial_load(&subcategories));
        initial_load(&products).await;
        Self {
            products,
            categories,
            subcategories,
            gallery_max_images: ctx.gallery_max_images,
            form: FormDialog::new(),
        }
    }

    #[must_use]
    pub fn synchronizer(&self) -> &Synchronizer<ProductsApi> {
        &self.products
    }

    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.products.items()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.categories.items()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.products.load_state()
    }

    /// # Errors
    ///
    /// Returns the product fetch error; the previous list is kept.
    pub async fn retry(&self) -> Result<(), SyncError> {
        self.products.load().await
    }

    /// Subcategories whose parent is `category_id`, for the form's picker.
    #[must_use]
    pub fn subcategories_for(&self, category_id: &str) -> Vec<Subcategory> {
        self.subcategories
            .items()
            .into_iter()
            .filter(|sub| sub.category_id() == category_id)
            .collect()
    }

    #[must_use]
    pub fn category_name(&self, product: &Product) -> String {
        let id = product.category_id();
        let found = product
            .category
            .name()
            .map(str::to_string)
            .or_else(|| self.categories.get(id).map(|c| c.name));
        name_or_unknown(id, found)
    }

    /// Empty when the product has no subcategory.
    #[must_use]
    pub fn subcategory_name(&self, product: &Product) -> String {
        let Some(id) = product.subcategory_id() else {
            return String::new();
        };
        let found = product
            .subcategory
            .as_ref()
            .and_then(|r| r.name().map(str::to_string))
            .or_else(|| self.subcategories.get(id).map(|s| s.name));
        name_or_unknown(id, found)
    }

    pub fn open_add(&mut self) {
        self.form.open(ProductDraft::default());
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn open_edit(&mut self, id: &str) -> Result<(), SyncError> {
        let product = self.products.get(id).ok_or_else(|| SyncError::NotFound {
            label: Product::LABEL,
            id: id.to_string(),
        })?;
        self.form.edit(id, ProductDraft::from_product(&product));
        Ok(())
    }

    /// Selecting a new category clears a subcategory that no longer fits.
    pub fn select_category(&mut self, category_id: &str) {
        let valid: Vec<String> = self
            .subcategories_for(category_id)
            .into_iter()
            .map(|s| s.id)
            .collect();
        if let Some(draft) = self.form.draft_mut() {
            draft.category_id = category_id.to_string();
            if draft
                .subcategory_id
                .as_ref()
                .is_some_and(|sub| !valid.contains(sub))
            {
                draft.subcategory_id = None;
            }
        }
    }

    pub fn add_gallery_images(&mut self, files: Vec<ImageUpload>) {
        let max = self.gallery_max_images;
        if let Some(draft) = self.form.draft_mut() {
            draft.add_gallery_images(files, max);
        }
    }

    /// Creates or updates depending on how the form was opened.
    ///
    /// # Errors
    ///
    /// Returns validation or server errors; the form stays open.
    pub async fn submit(&mut self) -> Result<(), SyncError> {
        let categories = self.categories.items();
        let max = self.gallery_max_images;
        let validate = |draft: &ProductDraft| -> Result<(), ValidationErrors> {
            draft.validate(&categories, max)
        };
        let sync = &self.products;
        let result = self
            .form
            .submit(validate, |draft, target| async move {
                match target {
                    Some(id) => sync.update(&id, &draft).await,
                    None => sync.create(&draft).await,
                }
            })
            .await;
        surface_validation(sync, result)
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn request_delete(&self, id: &str) -> Result<(), SyncError> {
        self.products.request_delete(id)
    }

    pub fn cancel_delete(&self) {
        self.products.cancel_delete();
    }

    /// # Errors
    ///
    /// See [`Synchronizer::confirm_delete`].
    pub async fn confirm_delete(&self) -> Result<(), SyncError> {
        self.products.confirm_delete().await
    }

    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut notices = self.products.take_notices();
        notices.extend(self.categories.take_notices());
        notices.extend(self.subcategories.take_notices());
        notices
    }
}

impl Drop for ProductsPage {
    fn drop(&mut self) {
        self.products.unmount();
        self.categories.unmount();
        self.subcategories.unmount();
    }
}
