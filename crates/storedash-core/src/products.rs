use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, EntityRef};
use crate::resource::Resource;
use crate::validation::ValidationErrors;

/// Thumbnails are the front and back shots; the upload form never takes more.
pub const MAX_THUMBNAILS: usize = 2;

/// A product in the catalog as returned by `/api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i64,
    pub category: EntityRef,
    #[serde(default)]
    pub subcategory: Option<EntityRef>,
    #[serde(default)]
    pub sku: String,
    /// Rich-text HTML from the editor.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specification: String,
    /// Stored image URLs.
    #[serde(default)]
    pub thumbnails: Vec<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl Product {
    #[must_use]
    pub fn category_id(&self) -> &str {
        self.category.id()
    }

    /// The subcategory id, treating the empty string the form submits for
    /// "none" as absent.
    #[must_use]
    pub fn subcategory_id(&self) -> Option<&str> {
        self.subcategory
            .as_ref()
            .map(EntityRef::id)
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn stock_label(&self) -> &'static str {
        if self.stock > 0 {
            "In Stock"
        } else {
            "Out of Stock"
        }
    }
}

impl Resource for Product {
    const LABEL: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }
}

/// An image file selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Form state for adding or editing a product. Sent as multipart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock: i64,
    pub category_id: String,
    pub subcategory_id: Option<String>,
    pub sku: String,
    pub description: String,
    pub specification: String,
    pub thumbnails: Vec<ImageUpload>,
    pub gallery: Vec<ImageUpload>,
}

impl ProductDraft {
    /// Seeds an edit form from an existing product. Image selections start
    /// empty; the server keeps the stored images unless new ones are sent.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            sale_price: product.sale_price,
            stock: product.stock,
            category_id: product.category_id().to_string(),
            subcategory_id: product.subcategory_id().map(str::to_string),
            sku: product.sku.clone(),
            description: product.description.clone(),
            specification: product.specification.clone(),
            thumbnails: Vec::new(),
            gallery: Vec::new(),
        }
    }

    /// Adds thumbnails, keeping at most [`MAX_THUMBNAILS`]. A new selection
    /// replaces the previous one.
    pub fn set_thumbnails(&mut self, files: Vec<ImageUpload>) {
        self.thumbnails = files.into_iter().take(MAX_THUMBNAILS).collect();
    }

    /// Appends gallery images up to `max_images`, dropping the overflow.
    pub fn add_gallery_images(&mut self, files: Vec<ImageUpload>, max_images: usize) {
        let room = max_images.saturating_sub(self.gallery.len());
        self.gallery.extend(files.into_iter().take(room));
    }

    /// Checks the draft against the categories currently loaded on the page.
    ///
    /// # Errors
    ///
    /// Returns every violated rule: missing name, non-positive price,
    /// missing or unknown category, negative stock or sale price, and too
    /// many images.
    pub fn validate(
        &self,
        categories: &[Category],
        gallery_max_images: usize,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(self.name.trim().is_empty(), "Product name is required");
        errors.check(self.price <= Decimal::ZERO, "Valid price is required");
        if self.category_id.trim().is_empty() {
            errors.push("Category is required");
        } else if !categories.iter().any(|c| c.id == self.category_id) {
            errors.push("Selected category is invalid");
        }
        errors.check(self.stock < 0, "Valid stock quantity is required");
        errors.check(
            self.sale_price.is_some_and(|p| p < Decimal::ZERO),
            "Sale price cannot be negative",
        );
        errors.check(
            self.thumbnails.len() > MAX_THUMBNAILS,
            "At most 2 thumbnail images are allowed",
        );
        if self.gallery.len() > gallery_max_images {
            errors.push(format!(
                "At most {gallery_max_images} gallery images are allowed"
            ));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::status::ActiveStatus;

    fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: "Shoes".to_string(),
            status: ActiveStatus::Active,
            product_count: 0,
            subcategory_count: 0,
        }
    }

    fn image(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn valid_draft() -> ProductDraft {
        ProductDraft {
            name: "Runner".to_string(),
            price: Decimal::from(120),
            stock: 4,
            category_id: "c1".to_string(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn product_parses_numbers_and_populated_refs() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Runner",
            "price": 129.99,
            "salePrice": 99.5,
            "stock": 0,
            "category": {"_id": "c1", "name": "Shoes"},
            "subcategory": "",
            "sku": "RUN-1",
            "thumbnails": ["/uploads/a.png"]
        }))
        .unwrap();
        assert_eq!(product.price, Decimal::new(12999, 2));
        assert_eq!(product.sale_price, Some(Decimal::new(995, 1)));
        assert_eq!(product.category_id(), "c1");
        assert_eq!(product.subcategory_id(), None);
        assert_eq!(product.stock_label(), "Out of Stock");
        assert!(product.gallery.is_empty());
    }

    #[test]
    fn valid_draft_passes() {
        assert!(valid_draft().validate(&[category("c1")], 5).is_ok());
    }

    #[test]
    fn draft_with_unknown_category_is_rejected() {
        let err = valid_draft().validate(&[category("c2")], 5).unwrap_err();
        assert_eq!(err.messages(), ["Selected category is invalid"]);
    }

    #[test]
    fn draft_reports_all_violations_together() {
        let draft = ProductDraft {
            stock: -1,
            ..ProductDraft::default()
        };
        let err = draft.validate(&[category("c1")], 5).unwrap_err();
        assert!(err.contains("Product name is required"));
        assert!(err.contains("Valid price is required"));
        assert!(err.contains("Category is required"));
        assert!(err.contains("Valid stock quantity is required"));
    }

    #[test]
    fn thumbnails_are_capped_at_two() {
        let mut draft = valid_draft();
        draft.set_thumbnails(vec![image("a"), image("b"), image("c")]);
        assert_eq!(draft.thumbnails.len(), 2);
    }

    #[test]
    fn gallery_is_capped_at_configured_maximum() {
        let mut draft = valid_draft();
        draft.add_gallery_images(vec![image("a"), image("b")], 3);
        draft.add_gallery_images(vec![image("c"), image("d")], 3);
        let names: Vec<_> = draft.gallery.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn oversized_gallery_fails_validation() {
        let mut draft = valid_draft();
        draft.gallery = vec![image("a"), image("b")];
        let err = draft.validate(&[category("c1")], 1).unwrap_err();
        assert!(err.contains("At most 1 gallery images are allowed"));
    }

    #[test]
    fn edit_draft_keeps_ids_and_drops_images() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Runner",
            "price": 10,
            "stock": 2,
            "category": "c1",
            "subcategory": {"_id": "s1", "name": "Trail"},
            "thumbnails": ["/uploads/a.png"]
        }))
        .unwrap();
        let draft = ProductDraft::from_product(&product);
        assert_eq!(draft.category_id, "c1");
        assert_eq!(draft.subcategory_id.as_deref(), Some("s1"));
        assert!(draft.thumbnails.is_empty());
    }
}
