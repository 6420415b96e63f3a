//! Coupon command handlers.

use chrono::NaiveDateTime;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storedash_core::coupons::form_datetime;
use storedash_core::{CouponDraft, DiscountType};
use storedash_sync::{CouponsPage, PageContext};

use crate::output::{confirmed, ensure_loaded, finish, print_notices};

/// Sub-commands available under `coupons`.
#[derive(Debug, Subcommand)]
pub enum CouponCommands {
    /// List coupons with their discount summary
    List,
    /// Create a coupon
    Add(CouponFields),
    /// Change fields of a coupon; omitted fields keep their values
    Edit {
        id: String,
        #[command(flatten)]
        fields: CouponFields,
    },
    /// Flip a coupon between active and inactive (not expired ones)
    Toggle { id: String },
    /// Delete a coupon
    Delete {
        id: String,
        /// Confirm the delete
        #[arg(long)]
        yes: bool,
    },
}

/// Form fields shared by `add` and `edit`.
#[derive(Debug, Default, Args)]
pub struct CouponFields {
    #[arg(long)]
    pub code: Option<String>,
    /// `percentage` or `fixed`
    #[arg(long = "type", value_parser = parse_discount_type)]
    pub discount_type: Option<DiscountType>,
    #[arg(long = "value")]
    pub discount_value: Option<Decimal>,
    #[arg(long)]
    pub min_order: Option<Decimal>,
    #[arg(long)]
    pub max_discount: Option<Decimal>,
    #[arg(long)]
    pub usage_limit: Option<i64>,
    /// Start, e.g. 2024-03-01T00:00
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDateTime>,
    /// End, e.g. 2024-03-31T23:59
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDateTime>,
}

fn parse_discount_type(raw: &str) -> Result<DiscountType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "percentage" | "percent" | "%" => Ok(DiscountType::Percentage),
        "fixed" => Ok(DiscountType::Fixed),
        other => Err(format!("unknown discount type '{other}'; use percentage or fixed")),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDateTime, String> {
    form_datetime::parse(raw).map_err(|err| format!("invalid date '{raw}': {err}"))
}

/// Runs one `coupons` sub-command against a freshly mounted page.
///
/// # Errors
///
/// Returns an error if the initial fetch fails or the action is refused.
pub(crate) async fn run_coupons(ctx: &PageContext, command: CouponCommands) -> anyhow::Result<()> {
    let mut page = CouponsPage::mount(ctx).await;
    if let Err(err) = ensure_loaded(&page.load_state()) {
        print_notices(page.take_notices());
        return Err(err);
    }

    let result = match command {
        CouponCommands::List => {
            print_table(&page);
            Ok(())
        }
        CouponCommands::Add(fields) => {
            page.open_add();
            if let Some(draft) = page.form.draft_mut() {
                apply_fields(draft, fields);
            }
            page.submit().await
        }
        CouponCommands::Edit { id, fields } => match page.open_edit(&id) {
            Ok(()) => {
                if let Some(draft) = page.form.draft_mut() {
                    apply_fields(draft, fields);
                }
                page.submit().await
            }
            Err(err) => Err(err),
        },
        CouponCommands::Toggle { id } => page.toggle_status(&id).await.map(|status| {
            println!("{id} is now {status}");
        }),
        CouponCommands::Delete { id, yes } => match page.request_delete(&id) {
            Ok(()) if confirmed(yes, &format!("coupon {id}")) => page.confirm_delete().await,
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

fn apply_fields(draft: &mut CouponDraft, fields: CouponFields) {
    if let Some(code) = fields.code {
        draft.code = code;
    }
    if let Some(discount_type) = fields.discount_type {
        draft.discount_type = discount_type;
    }
    if let Some(value) = fields.discount_value {
        draft.discount_value = value;
    }
    if let Some(min) = fields.min_order {
        draft.min_order_amount = min;
    }
    if let Some(max) = fields.max_discount {
        draft.max_discount_amount = max;
    }
    if let Some(limit) = fields.usage_limit {
        draft.usage_limit = limit;
    }
    if fields.start.is_some() {
        draft.start_date = fields.start;
    }
    if fields.end.is_some() {
        draft.end_date = fields.end;
    }
}

fn print_table(page: &CouponsPage) {
    let items = page.items();
    if items.is_empty() {
        println!("no coupons yet");
        return;
    }
    println!(
        "{:<26}{:<14}{:<10}{:>8}  {:<18}{:<18}DISCOUNT",
        "ID", "CODE", "STATUS", "USED", "STARTS", "ENDS"
    );
    for coupon in &items {
        let used = if coupon.usage_limit > 0 {
            format!("{}/{}", coupon.usage_count, coupon.usage_limit)
        } else {
            coupon.usage_count.to_string()
        };
        println!(
            "{:<26}{:<14}{:<10}{:>8}  {:<18}{:<18}{}",
            coupon.id,
            coupon.code,
            coupon.status.to_string(),
            used,
            coupon.start_date.format("%Y-%m-%d %H:%M").to_string(),
            coupon.end_date.format("%Y-%m-%d %H:%M").to_string(),
            coupon.summary()
        );
    }
}
