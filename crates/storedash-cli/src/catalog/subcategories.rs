use storedash_sync::{PageContext, SubcategoriesPage};

use super::SubcategoryCommands;
use crate::output::{clip, confirmed, ensure_loaded, finish, print_notices};

/// Runs one `subcategories` sub-command against a freshly mounted page.
///
/// # Errors
///
/// Returns an error if the initial fetch fails or the action is refused.
pub(crate) async fn run_subcategories(
    ctx: &PageContext,
    command: SubcategoryCommands,
) -> anyhow::Result<()> {
    let mut page = SubcategoriesPage::mount(ctx).await;
    if let Err(err) = ensure_loaded(&page.load_state()) {
        print_notices(page.take_notices());
        return Err(err);
    }

    let result = match command {
        SubcategoryCommands::List => {
            print_table(&page);
            Ok(())
        }
        SubcategoryCommands::Add { name, category } => {
            page.open_add();
            if let Some(draft) = page.add_form.draft_mut() {
                draft.name = name;
                draft.category_id = category;
            }
            page.submit_add().await
        }
        SubcategoryCommands::Rename { id, name } => match page.open_rename(&id) {
            Ok(()) => {
                if let Some(draft) = page.rename_form.draft_mut() {
                    draft.name = name;
                }
                page.submit_rename().await
            }
            Err(err) => Err(err),
        },
        SubcategoryCommands::Toggle { id } => page.toggle_status(&id).await.map(|status| {
            println!("{id} is now {status}");
        }),
        SubcategoryCommands::Delete { id, yes } => match page.request_delete(&id) {
            Ok(()) if confirmed(yes, &format!("subcategory {id}")) => page.confirm_delete().await,
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

fn print_table(page: &SubcategoriesPage) {
    let items = page.items();
    if items.is_empty() {
        println!("no subcategories yet");
        return;
    }
    println!(
        "{:<26}{:<26}{:<26}{:<10}{:>10}",
        "ID", "NAME", "CATEGORY", "STATUS", "PRODUCTS"
    );
    for sub in &items {
        println!(
            "{:<26}{:<26}{:<26}{:<10}{:>10}",
            sub.id,
            clip(&sub.name, 24),
            clip(&page.parent_name(sub), 24),
            sub.status.as_str(),
            sub.product_count
        );
    }
}
