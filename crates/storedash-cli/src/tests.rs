use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["storedash"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_login_flags() {
    let cli = Cli::try_parse_from([
        "storedash",
        "login",
        "--email",
        "admin@example.com",
        "--password",
        "hunter2",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Login { email, password }) => {
            assert_eq!(email, "admin@example.com");
            assert_eq!(password, "hunter2");
        }
        other => panic!("expected login, got {other:?}"),
    }
}

#[test]
fn parses_categories_list() {
    let cli = Cli::try_parse_from(["storedash", "categories", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Categories {
            command: CategoryCommands::List
        })
    ));
}

#[test]
fn category_delete_defaults_to_unconfirmed() {
    let cli = Cli::try_parse_from(["storedash", "categories", "delete", "c1"]).unwrap();
    match cli.command {
        Some(Commands::Categories {
            command: CategoryCommands::Delete { id, yes },
        }) => {
            assert_eq!(id, "c1");
            assert!(!yes);
        }
        other => panic!("expected categories delete, got {other:?}"),
    }
}

#[test]
fn subcategory_add_requires_category() {
    assert!(Cli::try_parse_from(["storedash", "subcategories", "add", "Boots"]).is_err());
    let cli = Cli::try_parse_from([
        "storedash",
        "subcategories",
        "add",
        "Boots",
        "--category",
        "c1",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Subcategories {
            command: SubcategoryCommands::Add { name, category },
        }) => {
            assert_eq!(name, "Boots");
            assert_eq!(category, "c1");
        }
        other => panic!("expected subcategories add, got {other:?}"),
    }
}

#[test]
fn product_edit_collects_repeated_images() {
    let cli = Cli::try_parse_from([
        "storedash",
        "products",
        "edit",
        "p1",
        "--price",
        "19.99",
        "--gallery",
        "a.png",
        "--gallery",
        "b.png",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Products {
            command: ProductCommands::Edit { id, fields },
        }) => {
            assert_eq!(id, "p1");
            assert_eq!(fields.price.map(|p| p.to_string()).as_deref(), Some("19.99"));
            assert_eq!(fields.gallery.len(), 2);
            assert!(fields.name.is_none());
        }
        other => panic!("expected products edit, got {other:?}"),
    }
}

#[test]
fn coupon_add_parses_type_and_dates() {
    let cli = Cli::try_parse_from([
        "storedash",
        "coupons",
        "add",
        "--code",
        "SPRING",
        "--type",
        "fixed",
        "--value",
        "10",
        "--start",
        "2024-03-01T00:00",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Coupons {
            command: CouponCommands::Add(fields),
        }) => {
            assert_eq!(fields.code.as_deref(), Some("SPRING"));
            assert_eq!(fields.discount_type, Some(storedash_core::DiscountType::Fixed));
            assert!(fields.start.is_some());
            assert!(fields.end.is_none());
        }
        other => panic!("expected coupons add, got {other:?}"),
    }
}

#[test]
fn coupon_add_rejects_bad_date() {
    assert!(Cli::try_parse_from(["storedash", "coupons", "add", "--end", "soon"]).is_err());
}

#[test]
fn parses_customer_toggle() {
    let cli = Cli::try_parse_from(["storedash", "customers", "toggle", "u7"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Customers {
            command: CustomerCommands::Toggle { ref id }
        }) if id == "u7"
    ));
}

#[test]
fn orders_lifecycle_flag_precedes_subcommand() {
    let cli = Cli::try_parse_from([
        "storedash",
        "orders",
        "--lifecycle",
        "set-status",
        "ORD001",
        "shipped",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Orders {
            lifecycle,
            command: OrderCommands::SetStatus { id, status },
        }) => {
            assert!(lifecycle);
            assert_eq!(id, "ORD001");
            assert_eq!(status, storedash_core::OrderStatus::Shipped);
        }
        other => panic!("expected orders set-status, got {other:?}"),
    }
}

#[test]
fn orders_bulk_needs_ids() {
    assert!(Cli::try_parse_from(["storedash", "orders", "bulk", "cancelled"]).is_err());
}

#[test]
fn orders_list_rejects_unknown_status() {
    assert!(Cli::try_parse_from(["storedash", "orders", "list", "--status", "lost"]).is_err());
}
