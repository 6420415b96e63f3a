//! Category and subcategory endpoints.

use reqwest::Method;
use serde_json::json;
use storedash_core::{
    decode_collection, decode_record, merge_record, ActiveStatus, Category, CategoryDraft,
    Subcategory, SubcategoryDraft,
};

use crate::backend::{
    confirmed_status, Confirmation, CreateBackend, DeleteBackend, ResourceBackend, StatusBackend,
    UpdateBackend,
};
use crate::client::{shape_error, AdminClient};
use crate::error::ApiError;
use crate::routes;

const CATEGORY_KEYS: &[&str] = &["category", "data"];
const SUBCATEGORY_KEYS: &[&str] = &["subcategory", "data"];

/// Backend for `/api/categories`.
#[derive(Debug, Clone)]
pub struct CategoriesApi {
    client: AdminClient,
}

impl CategoriesApi {
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }
}

impl ResourceBackend for CategoriesApi {
    type Resource = Category;

    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let body = self.client.get_json(routes::CATEGORIES).await?;
        decode_collection(body, &["data"]).map_err(shape_error(routes::CATEGORIES))
    }
}

impl CreateBackend for CategoriesApi {
    type Draft = CategoryDraft;

    async fn create(&self, draft: &CategoryDraft) -> Result<Confirmation<Category>, ApiError> {
        let body = self
            .client
            .send_json(Method::POST, routes::CREATE_CATEGORY, draft)
            .await?;
        let category = decode_record(body, CATEGORY_KEYS)
            .map_err(shape_error(routes::CREATE_CATEGORY))?;
        Ok(Confirmation::Value(category))
    }
}

impl UpdateBackend for CategoriesApi {
    type Patch = CategoryDraft;

    async fn update(
        &self,
        current: &Category,
        patch: &CategoryDraft,
    ) -> Result<Confirmation<Category>, ApiError> {
        let path = routes::edit_category(&current.id);
        let body = self.client.send_json(Method::PUT, &path, patch).await?;
        let category = merge_record(current, body, CATEGORY_KEYS).map_err(shape_error(&path))?;
        Ok(Confirmation::Value(category))
    }
}

impl DeleteBackend for CategoriesApi {
    async fn delete(&self, current: &Category) -> Result<(), ApiError> {
        self.client
            .delete(&routes::delete_category(&current.id), current.product_count)
            .await
    }
}

impl StatusBackend for CategoriesApi {
    async fn set_status(
        &self,
        current: &Category,
        status: ActiveStatus,
    ) -> Result<Confirmation<ActiveStatus>, ApiError> {
        let path = routes::category_status(&current.id);
        let body = self
            .client
            .send_json(Method::PUT, &path, &json!({ "status": status }))
            .await?;
        confirmed_status(&body, CATEGORY_KEYS)
            .map(Confirmation::Value)
            .ok_or_else(|| ApiError::UnexpectedShape {
                context: path,
                reason: "response has no status".to_string(),
            })
    }
}

/// Backend for the subcategory routes under `/api/categories`.
#[derive(Debug, Clone)]
pub struct SubcategoriesApi {
    client: AdminClient,
}

impl SubcategoriesApi {
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }
}

impl ResourceBackend for SubcategoriesApi {
    type Resource = Subcategory;

    async fn list(&self) -> Result<Vec<Subcategory>, ApiError> {
        let body = self.client.get_json(routes::SUBCATEGORIES).await?;
        decode_collection(body, &["data"]).map_err(shape_error(routes::SUBCATEGORIES))
    }
}

impl CreateBackend for SubcategoriesApi {
    type Draft = SubcategoryDraft;

    /// The create response does not populate the parent category, so the
    /// collection is reloaded instead.
    async fn create(
        &self,
        draft: &SubcategoryDraft,
    ) -> Result<Confirmation<Subcategory>, ApiError> {
        self.client
            .send_json(Method::POST, routes::CREATE_SUBCATEGORY, draft)
            .await?;
        Ok(Confirmation::Reload)
    }
}

impl UpdateBackend for SubcategoriesApi {
    type Patch = CategoryDraft;

    async fn update(
        &self,
        current: &Subcategory,
        patch: &CategoryDraft,
    ) -> Result<Confirmation<Subcategory>, ApiError> {
        let path = routes::edit_subcategory(&current.id);
        let body = self.client.send_json(Method::PUT, &path, patch).await?;
        let mut merged: Subcategory =
            merge_record(current, body, SUBCATEGORY_KEYS).map_err(shape_error(&path))?;
        // Keep the populated parent when the response only carries its id.
        if merged.category.id() == current.category.id() {
            merged.category = current.category.clone();
        }
        Ok(Confirmation::Value(merged))
    }
}

impl DeleteBackend for SubcategoriesApi {
    async fn delete(&self, current: &Subcategory) -> Result<(), ApiError> {
        self.client
            .delete(&routes::delete_subcategory(&current.id), current.product_count)
            .await
    }
}

impl StatusBackend for SubcategoriesApi {
    async fn set_status(
        &self,
        current: &Subcategory,
        status: ActiveStatus,
    ) -> Result<Confirmation<ActiveStatus>, ApiError> {
        let path = routes::subcategory_status(&current.id);
        let body = self
            .client
            .send_json(Method::PUT, &path, &json!({ "status": status }))
            .await?;
        confirmed_status(&body, SUBCATEGORY_KEYS)
            .map(Confirmation::Value)
            .ok_or_else(|| ApiError::UnexpectedShape {
                context: path,
                reason: "response has no status".to_string(),
            })
    }
}
