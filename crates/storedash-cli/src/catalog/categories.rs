use storedash_sync::{CategoriesPage, PageContext};

use super::CategoryCommands;
use crate::output::{clip, confirmed, ensure_loaded, finish, print_notices};

/// Runs one `categories` sub-command against a freshly mounted page.
///
/// # Errors
///
/// Returns an error if the initial fetch fails or the action is refused.
pub(crate) async fn run_categories(
    ctx: &PageContext,
    command: CategoryCommands,
) -> anyhow::Result<()> {
    let mut page = CategoriesPage::mount(ctx).await;
    if let Err(err) = ensure_loaded(&page.load_state()) {
        print_notices(page.take_notices());
        return Err(err);
    }

    let result = match command {
        CategoryCommands::List => {
            print_table(&page);
            Ok(())
        }
        CategoryCommands::Add { name } => {
            page.open_add();
            if let Some(draft) = page.add_form.draft_mut() {
                draft.name = name;
            }
            page.submit_add().await
        }
        CategoryCommands::Rename { id, name } => match page.open_edit(&id) {
            Ok(()) => {
                if let Some(draft) = page.edit_form.draft_mut() {
                    draft.name = name;
                }
                page.submit_edit().await
            }
            Err(err) => Err(err),
        },
        CategoryCommands::Toggle { id } => page.toggle_status(&id).await.map(|status| {
            println!("{id} is now {status}");
        }),
        CategoryCommands::Delete { id, yes } => match page.request_delete(&id) {
            Ok(()) if confirmed(yes, &format!("category {id}")) => page.confirm_delete().await,
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

fn print_table(page: &CategoriesPage) {
    let items = page.items();
    if items.is_empty() {
        println!("no categories yet");
        return;
    }
    println!(
        "{:<26}{:<30}{:<10}{:>10}{:>15}",
        "ID", "NAME", "STATUS", "PRODUCTS", "SUBCATEGORIES"
    );
    for category in &items {
        println!(
            "{:<26}{:<30}{:<10}{:>10}{:>15}",
            category.id,
            clip(&category.name, 28),
            category.status.as_str(),
            category.product_count,
            category.subcategory_count
        );
    }
}
