use serde::{Deserialize, Serialize};

use crate::resource::{Resource, Toggleable};
use crate::status::ActiveStatus;
use crate::validation::ValidationErrors;

/// A top-level product category.
///
/// The create endpoint answers with little more than `_id` and `name`, so the
/// remaining fields default to an active category with zero counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: ActiveStatus,
    /// Denormalized on the server; refetch rather than adjust locally.
    #[serde(default)]
    pub product_count: u32,
    #[serde(default)]
    pub subcategory_count: u32,
}

impl Resource for Category {
    const LABEL: &'static str = "Category";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Toggleable for Category {
    fn active_status(&self) -> Option<ActiveStatus> {
        Some(self.status)
    }

    fn set_active_status(&mut self, status: ActiveStatus) {
        self.status = status;
    }
}

/// Reference to another record, either by bare id or as a populated object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Embedded {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl EntityRef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) | EntityRef::Embedded { id, .. } => id,
        }
    }

    /// The name carried by a populated reference.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            EntityRef::Id(_) => None,
            EntityRef::Embedded { name, .. } => name.as_deref(),
        }
    }
}

/// A subcategory nested under one [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: EntityRef,
    #[serde(default)]
    pub product_count: u32,
    #[serde(default)]
    pub status: ActiveStatus,
}

impl Subcategory {
    #[must_use]
    pub fn category_id(&self) -> &str {
        self.category.id()
    }
}

impl Resource for Subcategory {
    const LABEL: &'static str = "Subcategory";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Toggleable for Subcategory {
    fn active_status(&self) -> Option<ActiveStatus> {
        Some(self.status)
    }

    fn set_active_status(&mut self, status: ActiveStatus) {
        self.status = status;
    }
}

/// Body for creating or renaming a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the name is blank.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.name.trim().is_empty(),
            "Please enter a category name",
        );
        errors.into_result()
    }
}

/// Body for creating a subcategory. Renames reuse [`CategoryDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryDraft {
    pub name: String,
    pub category_id: String,
}

impl SubcategoryDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_id: category_id.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the name is blank or no parent
    /// category has been selected.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.name.trim().is_empty(),
            "Please enter a subcategory name",
        );
        errors.check(
            self.category_id.trim().is_empty(),
            "Please select a parent category",
        );
        errors.into_result()
    }
}
