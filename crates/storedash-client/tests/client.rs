//! Integration tests for the admin API backends using wiremock HTTP mocks.

use rust_decimal::Decimal;
use serde_json::json;
use storedash_client::{
    AdminClient, ApiError, CategoriesApi, Confirmation, ConflictReason, CouponsApi,
    CreateBackend, CustomersApi, DeleteBackend, ErrorKind, ProductsApi, ResourceBackend,
    SessionContext, StatusBackend, SubcategoriesApi, UpdateBackend,
};
use storedash_core::{
    ActiveStatus, Category, CategoryDraft, Coupon, Customer, ImageUpload, Product, ProductDraft,
    Subcategory,
};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> AdminClient {
    AdminClient::with_base_url(base_url, 30, SessionContext::with_token("test-token"))
        .expect("client construction should not fail")
}

fn category_json(id: &str, name: &str, products: u32) -> serde_json::Value {
    json!({"_id": id, "name": name, "status": "active", "productCount": products, "subcategoryCount": 0})
}

#[tokio::test]
async fn login_stores_issued_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "admin@shop.test", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::with_base_url(&server.uri(), 30, SessionContext::in_memory())
        .expect("client construction should not fail");
    client.login("admin@shop.test", "pw").await.expect("login should succeed");

    assert_eq!(client.session().token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn login_without_token_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let client = AdminClient::with_base_url(&server.uri(), 30, SessionContext::in_memory())
        .expect("client construction should not fail");
    let err = client.login("a@b.c", "pw").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn logout_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "bye"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.logout().await.expect("logout should succeed");

    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn list_categories_sends_bearer_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            category_json("c2", "Shirts", 1),
            category_json("c1", "Shoes", 0),
        ])))
        .mount(&server)
        .await;

    let categories = CategoriesApi::new(test_client(&server.uri()))
        .list()
        .await
        .expect("should list categories");

    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Shirts", "Shoes"]);
}

#[tokio::test]
async fn list_products_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "_id": "p1",
                "name": "Runner",
                "price": 120,
                "stock": 3,
                "category": {"_id": "c1", "name": "Shoes"}
            }]
        })))
        .mount(&server)
        .await;

    let products = ProductsApi::new(test_client(&server.uri()))
        .list()
        .await
        .expect("should list products");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price, Decimal::from(120));
}

#[tokio::test]
async fn list_rejects_non_collection_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "maintenance"})))
        .mount(&server)
        .await;

    let err = CategoriesApi::new(test_client(&server.uri()))
        .list()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::UnexpectedShape { .. }));
}

#[tokio::test]
async fn requests_without_session_are_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = AdminClient::with_base_url(&server.uri(), 30, SessionContext::in_memory())
        .expect("client construction should not fail");
    let err = CategoriesApi::new(client).list().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated));
}

#[tokio::test]
async fn unauthorized_response_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/coupons"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Token expired"})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = CouponsApi::new(client.clone()).list().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { ref message } if message == "Token expired"));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn create_category_defaults_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/categories/createcategory"))
        .and(body_json(json!({"name": "Shoes"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "c9", "name": "Shoes"})))
        .mount(&server)
        .await;

    let confirmation = CategoriesApi::new(test_client(&server.uri()))
        .create(&CategoryDraft::new("Shoes"))
        .await
        .expect("should create category");

    let Confirmation::Value(category) = confirmation else {
        panic!("expected a record");
    };
    assert_eq!(category.status, ActiveStatus::Active);
    assert_eq!(category.product_count, 0);
    assert_eq!(category.subcategory_count, 0);
}

#[tokio::test]
async fn rename_category_keeps_counts_the_response_omits() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/categories/editCategory/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "c1", "name": "Footwear"})))
        .mount(&server)
        .await;

    let current: Category = serde_json::from_value(category_json("c1", "Shoes", 3)).unwrap();
    let confirmation = CategoriesApi::new(test_client(&server.uri()))
        .update(&current, &CategoryDraft::new("Footwear"))
        .await
        .expect("should rename");

    let Confirmation::Value(category) = confirmation else {
        panic!("expected a record");
    };
    assert_eq!(category.name, "Footwear");
    assert_eq!(category.product_count, 3);
}

#[tokio::test]
async fn delete_category_with_products_is_a_conflict_with_local_count() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/c1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Cannot delete category with products. Remove products first."
        })))
        .mount(&server)
        .await;

    let current: Category = serde_json::from_value(category_json("c1", "Shoes", 3)).unwrap();
    let err = CategoriesApi::new(test_client(&server.uri()))
        .delete(&current)
        .await
        .unwrap_err();

    let ApiError::Conflict(conflict) = err else {
        panic!("expected a conflict, got {err:?}");
    };
    assert_eq!(conflict.reason, ConflictReason::CategoryHasProducts);
    assert!(conflict.explanation().contains("contains 3 product(s)"));
}

#[tokio::test]
async fn delete_subcategory_conflict_prefers_server_count() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/deleteSubcategory/s1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Cannot delete subcategory with products. Remove products first.",
            "productCount": 5
        })))
        .mount(&server)
        .await;

    let current: Subcategory = serde_json::from_value(json!({
        "_id": "s1", "name": "Trail", "category": "c1", "productCount": 2
    }))
    .unwrap();
    let err = SubcategoriesApi::new(test_client(&server.uri()))
        .delete(&current)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Conflict(ref c) if c.product_count == 5));
}

#[tokio::test]
async fn delete_failure_without_conflict_keeps_raw_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/coupons/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let current: Coupon = serde_json::from_value(json!({
        "_id": 7,
        "code": "X",
        "discountType": "fixed",
        "discountValue": 5,
        "startDate": "2024-01-01T00:00",
        "endDate": "2024-02-01T00:00"
    }))
    .unwrap();
    let err = CouponsApi::new(test_client(&server.uri()))
        .delete(&current)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Rejected { status: 500, ref message } if message == "database offline"));
}

#[tokio::test]
async fn toggle_category_returns_server_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/categories/c1/status"))
        .and(body_json(json!({"status": "inactive"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "c1", "status": "inactive"})))
        .mount(&server)
        .await;

    let current: Category = serde_json::from_value(category_json("c1", "Shoes", 0)).unwrap();
    let confirmed = CategoriesApi::new(test_client(&server.uri()))
        .set_status(&current, ActiveStatus::Inactive)
        .await
        .expect("should toggle");

    assert_eq!(confirmed, Confirmation::Value(ActiveStatus::Inactive));
}

#[tokio::test]
async fn toggle_coupon_patches_and_asks_for_reload() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/coupons/c7/status"))
        .and(body_json(json!({"status": "active"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let current: Coupon = serde_json::from_value(json!({
        "_id": "c7",
        "code": "SPRING",
        "discountType": "percentage",
        "discountValue": 10,
        "startDate": "2024-01-01T00:00",
        "endDate": "2024-02-01T00:00",
        "status": "inactive"
    }))
    .unwrap();
    let confirmed = CouponsApi::new(test_client(&server.uri()))
        .set_status(&current, ActiveStatus::Active)
        .await
        .expect("should toggle");

    assert_eq!(confirmed, Confirmation::Reload);
}

#[tokio::test]
async fn customers_exclude_admins_and_bare_toggle_reply_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "a1", "name": "Root", "email": "root@shop.test", "role": "admin"},
            {"_id": "u1", "name": "Ada", "email": "ada@shop.test", "status": "active"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/status/u1"))
        .and(body_json(json!({"userId": "u1", "status": "inactive"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Status updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = CustomersApi::new(test_client(&server.uri()));
    let customers: Vec<Customer> = api.list().await.expect("should list customers");
    assert_eq!(customers.len(), 1);

    let confirmed = api
        .set_status(&customers[0], ActiveStatus::Inactive)
        .await
        .expect("should toggle");
    assert_eq!(confirmed, Confirmation::Reload);
}

#[tokio::test]
async fn customer_toggle_reply_with_status_is_taken_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/status/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Status updated",
            "user": {"_id": "u1", "status": "active"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let customer: Customer = serde_json::from_value(json!({
        "_id": "u1", "name": "Ada", "email": "ada@shop.test", "phone": "",
        "address": {}, "status": "active", "orders": 0
    }))
    .expect("customer json");
    let confirmed = CustomersApi::new(test_client(&server.uri()))
        .set_status(&customer, ActiveStatus::Inactive)
        .await
        .expect("should toggle");
    assert_eq!(confirmed, Confirmation::Value(ActiveStatus::Active));
}

#[tokio::test]
async fn create_product_sends_multipart_fields_and_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products/add"))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("name=\"thumbnails[0]\""))
        .and(body_string_contains("name=\"gallery[0]\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    let image = ImageUpload {
        file_name: "front.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: b"not-really-a-png".to_vec(),
    };
    let draft = ProductDraft {
        name: "Runner".to_string(),
        price: Decimal::from(120),
        stock: 2,
        category_id: "c1".to_string(),
        thumbnails: vec![image.clone()],
        gallery: vec![image],
        ..ProductDraft::default()
    };
    let confirmation = ProductsApi::new(test_client(&server.uri()))
        .create(&draft)
        .await
        .expect("should create product");

    assert_eq!(confirmation, Confirmation::Reload);
}

#[tokio::test]
async fn product_update_clears_subcategory_with_an_empty_part() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/products/p1"))
        .and(body_string_contains("name=\"subcategory\"\r\n\r\n\r\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let current: Product = serde_json::from_value(json!({
        "_id": "p1",
        "name": "Runner",
        "price": 120,
        "stock": 2,
        "category": {"_id": "c1", "name": "Shoes"},
        "subcategory": {"_id": "s1", "name": "Trail"}
    }))
    .expect("product json");
    let patch = ProductDraft {
        name: "Runner".to_string(),
        price: Decimal::from(120),
        stock: 2,
        category_id: "c2".to_string(),
        subcategory_id: None,
        ..ProductDraft::default()
    };
    let confirmation = ProductsApi::new(test_client(&server.uri()))
        .update(&current, &patch)
        .await
        .expect("should update product");
    assert_eq!(confirmation, Confirmation::Reload);
}

#[tokio::test]
async fn product_create_without_subcategory_leaves_the_part_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products/add"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    let draft = ProductDraft {
        name: "Runner".to_string(),
        price: Decimal::from(120),
        stock: 2,
        category_id: "c1".to_string(),
        ..ProductDraft::default()
    };
    ProductsApi::new(test_client(&server.uri()))
        .create(&draft)
        .await
        .expect("should create product");

    let requests = server.received_requests().await.expect("recording is on");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"category\""));
    assert!(!body.contains("name=\"subcategory\""));
}
