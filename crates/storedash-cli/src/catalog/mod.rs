//! Category and subcategory command handlers.
//!
//! Each invocation mounts the page, performs one action and prints the
//! notices the page produced.

mod categories;
mod subcategories;

use clap::Subcommand;

pub(crate) use categories::run_categories;
pub(crate) use subcategories::run_subcategories;

/// Sub-commands available under `categories`.
#[derive(Debug, Subcommand)]
pub enum CategoryCommands {
    /// List categories in server order
    List,
    /// Create a category
    Add { name: String },
    /// Rename a category
    Rename { id: String, name: String },
    /// Flip a category between active and inactive
    Toggle { id: String },
    /// Delete a category that has no products
    Delete {
        id: String,
        /// Confirm the delete
        #[arg(long)]
        yes: bool,
    },
}

/// Sub-commands available under `subcategories`.
#[derive(Debug, Subcommand)]
pub enum SubcategoryCommands {
    /// List subcategories with their parent category
    List,
    /// Create a subcategory under a category
    Add {
        name: String,
        /// Parent category id
        #[arg(long)]
        category: String,
    },
    /// Rename a subcategory
    Rename { id: String, name: String },
    /// Flip a subcategory between active and inactive
    Toggle { id: String },
    /// Delete a subcategory that has no products
    Delete {
        id: String,
        /// Confirm the delete
        #[arg(long)]
        yes: bool,
    },
}
