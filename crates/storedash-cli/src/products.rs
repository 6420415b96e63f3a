//! Product command handlers.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storedash_core::{ImageUpload, ProductDraft};
use storedash_sync::{PageContext, ProductsPage};

use crate::output::{clip, confirmed, ensure_loaded, finish, print_notices};

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// List products with their category and stock state
    List,
    /// Create a product
    Add(ProductFields),
    /// Change fields of a product; omitted fields keep their values
    Edit {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        id: String,
        /// Confirm the delete
        #[arg(long)]
        yes: bool,
    },
}

/// Form fields shared by `add` and `edit`.
#[derive(Debug, Default, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub sale_price: Option<Decimal>,
    #[arg(long)]
    pub stock: Option<i64>,
    /// Category id
    #[arg(long)]
    pub category: Option<String>,
    /// Subcategory id; must belong to the category
    #[arg(long)]
    pub subcategory: Option<String>,
    #[arg(long)]
    pub sku: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub specification: Option<String>,
    /// Front and back images (at most two)
    #[arg(long = "thumbnail")]
    pub thumbnails: Vec<PathBuf>,
    /// Gallery images
    #[arg(long = "gallery")]
    pub gallery: Vec<PathBuf>,
}

/// Runs one `products` sub-command against a freshly mounted page.
///
/// # Errors
///
/// Returns an error if the initial fetch fails, an image cannot be read, or
/// the action is refused.
pub(crate) async fn run_products(ctx: &PageContext, command: ProductCommands) -> anyhow::Result<()> {
    let mut page = ProductsPage::mount(ctx).await;
    if let Err(err) = ensure_loaded(&page.load_state()) {
        print_notices(page.take_notices());
        return Err(err);
    }

    let result = match command {
        ProductCommands::List => {
            print_table(&page);
            Ok(())
        }
        ProductCommands::Add(fields) => {
            page.open_add();
            fill_draft(&mut page, fields)?;
            page.submit().await
        }
        ProductCommands::Edit { id, fields } => match page.open_edit(&id) {
            Ok(()) => {
                fill_draft(&mut page, fields)?;
                page.submit().await
            }
            Err(err) => Err(err),
        },
        ProductCommands::Delete { id, yes } => match page.request_delete(&id) {
            Ok(()) if confirmed(yes, &format!("product {id}")) => page.confirm_delete().await,
            Ok(()) => {
                page.cancel_delete();
                Ok(())
            }
            Err(err) => Err(err),
        },
    };

    print_notices(page.take_notices());
    finish(result)
}

fn fill_draft(page: &mut ProductsPage, fields: ProductFields) -> anyhow::Result<()> {
    let thumbnails = read_images(&fields.thumbnails)?;
    let gallery = read_images(&fields.gallery)?;
    if let Some(category) = &fields.category {
        page.select_category(category);
    }
    page.add_gallery_images(gallery);

    let Some(draft) = page.form.draft_mut() else {
        anyhow::bail!("product form is not open");
    };
    apply_fields(draft, fields);
    if !thumbnails.is_empty() {
        draft.set_thumbnails(thumbnails);
    }
    Ok(())
}

/// Copies the provided scalar fields onto the draft.
fn apply_fields(draft: &mut ProductDraft, fields: ProductFields) {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(price) = fields.price {
        draft.price = price;
    }
    if fields.sale_price.is_some() {
        draft.sale_price = fields.sale_price;
    }
    if let Some(stock) = fields.stock {
        draft.stock = stock;
    }
    if let Some(category) = fields.category {
        draft.category_id = category;
    }
    if fields.subcategory.is_some() {
        draft.subcategory_id = fields.subcategory;
    }
    if let Some(sku) = fields.sku {
        draft.sku = sku;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(specification) = fields.specification {
        draft.specification = specification;
    }
}

fn read_images(paths: &[PathBuf]) -> anyhow::Result<Vec<ImageUpload>> {
    paths.iter().map(PathBuf::as_path).map(read_image).collect()
}

fn read_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes = std::fs::read(path)
        .map_err(|err| anyhow::anyhow!("cannot read image {}: {err}", path.display()))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(ImageUpload {
        file_name,
        content_type,
        bytes,
    })
}

fn print_table(page: &ProductsPage) {
    let items = page.items();
    if items.is_empty() {
        println!("no products yet");
        return;
    }
    println!(
        "{:<26}{:<28}{:>10}{:>10}  {:<13}{:<20}SUBCATEGORY",
        "ID", "NAME", "PRICE", "SALE", "STOCK", "CATEGORY"
    );
    for product in &items {
        let sale = product
            .sale_price
            .map_or_else(|| "\u{2014}".to_string(), |p| p.to_string());
        println!(
            "{:<26}{:<28}{:>10}{:>10}  {:<13}{:<20}{}",
            product.id,
            clip(&product.name, 26),
            product.price.to_string(),
            sale,
            product.stock_label(),
            clip(&page.category_name(product), 18),
            page.subcategory_name(product)
        );
    }
}
