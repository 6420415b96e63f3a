//! Product endpoints. Create and update send `multipart/form-data`.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use storedash_core::{decode_collection, ImageUpload, Product, ProductDraft};

use crate::backend::{Confirmation, CreateBackend, DeleteBackend, ResourceBackend, UpdateBackend};
use crate::client::{shape_error, AdminClient};
use crate::error::ApiError;
use crate::routes;

/// Backend for `/api/products`.
///
/// The server answers mutations with a record whose references are not
/// populated, so every successful create or update reloads the list.
#[derive(Debug, Clone)]
pub struct ProductsApi {
    client: AdminClient,
}

impl ProductsApi {
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }
}

/// How the `subcategory` part is written when the draft has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubcategoryField {
    /// Leave the part out; used on create.
    OmitWhenEmpty,
    /// Send an empty part so the server clears a previous subcategory.
    AlwaysSend,
}

/// Builds the product form: scalar fields first, then indexed file parts.
///
/// # Errors
///
/// Returns [`ApiError::Http`] when an image's content type is not a valid
/// MIME type.
pub fn product_form(draft: &ProductDraft, subcategory: SubcategoryField) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("name", draft.name.clone())
        .text("price", draft.price.to_string());
    if let Some(sale_price) = draft.sale_price {
        form = form.text("salePrice", sale_price.to_string());
    }
    form = form
        .text("stock", draft.stock.to_string())
        .text("category", draft.category_id.clone());
    let chosen = draft.subcategory_id.clone().filter(|s| !s.is_empty());
    match (chosen, subcategory) {
        (Some(id), _) => form = form.text("subcategory", id),
        (None, SubcategoryField::AlwaysSend) => form = form.text("subcategory", String::new()),
        (None, SubcategoryField::OmitWhenEmpty) => {}
    }
    form = form
        .text("sku", draft.sku.clone())
        .text("description", draft.description.clone())
        .text("specification", draft.specification.clone());

    for (index, image) in draft.thumbnails.iter().enumerate() {
        form = form.part(format!("thumbnails[{index}]"), image_part(image)?);
    }
    for (index, image) in draft.gallery.iter().enumerate() {
        form = form.part(format!("gallery[{index}]"), image_part(image)?);
    }
    Ok(form)
}

fn image_part(image: &ImageUpload) -> Result<Part, ApiError> {
    Ok(Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)?)
}

impl ResourceBackend for ProductsApi {
    type Resource = Product;

    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let body = self.client.get_json(routes::PRODUCTS).await?;
        decode_collection(body, &["products", "data"]).map_err(shape_error(routes::PRODUCTS))
    }
}

impl CreateBackend for ProductsApi {
    type Draft = ProductDraft;

    async fn create(&self, draft: &ProductDraft) -> Result<Confirmation<Product>, ApiError> {
        let form = product_form(draft, SubcategoryField::OmitWhenEmpty)?;
        tracing::debug!(
            thumbnails = draft.thumbnails.len(),
            gallery = draft.gallery.len(),
            "uploading new product"
        );
        self.client
            .send_multipart(Method::POST, routes::CREATE_PRODUCT, form)
            .await?;
        Ok(Confirmation::Reload)
    }
}

impl UpdateBackend for ProductsApi {
    type Patch = ProductDraft;

    async fn update(
        &self,
        current: &Product,
        patch: &ProductDraft,
    ) -> Result<Confirmation<Product>, ApiError> {
        let form = product_form(patch, SubcategoryField::AlwaysSend)?;
        self.client
            .send_multipart(Method::PUT, &routes::product(&current.id), form)
            .await?;
        Ok(Confirmation::Reload)
    }
}

impl DeleteBackend for ProductsApi {
    async fn delete(&self, current: &Product) -> Result<(), ApiError> {
        self.client.delete(&routes::product(&current.id), 0).await
    }
}
