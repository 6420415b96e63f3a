use thiserror::Error;

use crate::session::SessionError;

/// Errors returned by the admin API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No session is present; the request was not sent.
    #[error("not logged in")]
    Unauthenticated,

    /// The server refused the credential (401 or 403).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A delete was blocked because the entity still has products.
    #[error("{}", .0.reason.server_message())]
    Conflict(DeleteConflict),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response was valid JSON but not the shape the client expects.
    #[error("unexpected response for {context}: {reason}")]
    UnexpectedShape { context: String, reason: String },

    /// The session file could not be read or written.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Coarse classification used by callers to pick a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Authentication,
    Validation,
    Conflict,
    MalformedResponse,
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Http(_) => ErrorKind::Network,
            ApiError::Unauthenticated | ApiError::Unauthorized { .. } | ApiError::Session(_) => {
                ErrorKind::Authentication
            }
            ApiError::Rejected { .. } => ErrorKind::Validation,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Deserialize { .. } | ApiError::UnexpectedShape { .. } => {
                ErrorKind::MalformedResponse
            }
        }
    }

    /// Message suitable for an error notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(err) if err.is_connect() => {
                "Cannot connect to the server. Please ensure it is running.".to_string()
            }
            ApiError::Unauthenticated => "Please log in to continue.".to_string(),
            ApiError::Unauthorized { message } | ApiError::Rejected { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Which "remove products first" rule blocked a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    CategoryHasProducts,
    CategorySubcategoryHasProducts,
    SubcategoryHasProducts,
}

impl ConflictReason {
    const CATEGORY: &'static str = "Cannot delete category with products. Remove products first.";
    const CATEGORY_VIA_SUBCATEGORY: &'static str =
        "Cannot delete category because a subcategory contains products. Remove products first.";
    const SUBCATEGORY: &'static str =
        "Cannot delete subcategory with products. Remove products first.";

    /// Matches the server's error message exactly.
    #[must_use]
    pub fn from_server_message(message: &str) -> Option<Self> {
        match message.trim() {
            Self::CATEGORY => Some(Self::CategoryHasProducts),
            Self::CATEGORY_VIA_SUBCATEGORY => Some(Self::CategorySubcategoryHasProducts),
            Self::SUBCATEGORY => Some(Self::SubcategoryHasProducts),
            _ => None,
        }
    }

    #[must_use]
    pub fn server_message(self) -> &'static str {
        match self {
            Self::CategoryHasProducts => Self::CATEGORY,
            Self::CategorySubcategoryHasProducts => Self::CATEGORY_VIA_SUBCATEGORY,
            Self::SubcategoryHasProducts => Self::SUBCATEGORY,
        }
    }
}

/// A delete the server refused because products still reference the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConflict {
    pub reason: ConflictReason,
    /// The server's `productCount` when sent, else the locally known count.
    pub product_count: u32,
}

impl DeleteConflict {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.reason {
            ConflictReason::CategoryHasProducts | ConflictReason::CategorySubcategoryHasProducts => {
                "Cannot Delete Category"
            }
            ConflictReason::SubcategoryHasProducts => "Cannot Delete Subcategory",
        }
    }

    /// Explanation shown in the conflict dialog.
    #[must_use]
    pub fn explanation(&self) -> String {
        let n = self.product_count;
        match self.reason {
            ConflictReason::CategoryHasProducts => format!(
                "This category contains {n} product(s). Please remove all products from the \
                 category before deleting it."
            ),
            ConflictReason::CategorySubcategoryHasProducts => {
                "A subcategory under this category contains products. Please remove all \
                 products from the subcategories before deleting the category."
                    .to_string()
            }
            ConflictReason::SubcategoryHasProducts => format!(
                "This subcategory contains {n} product(s). Please remove all products from the \
                 subcategory before deleting it."
            ),
        }
    }
}
