use super::*;

fn test_client(base_url: &str) -> AdminClient {
    AdminClient::with_base_url(base_url, 30, SessionContext::with_token("tok"))
        .expect("client construction should not fail")
}

#[test]
fn url_joins_path_without_double_slash() {
    let client = test_client("http://localhost:5000/");
    assert_eq!(
        client.url("/api/categories/"),
        "http://localhost:5000/api/categories/"
    );
}

#[test]
fn error_body_prefers_error_field() {
    let body = parse_error_body(
        StatusCode::BAD_REQUEST,
        r#"{"error":"Name taken","message":"ignored"}"#,
    );
    assert_eq!(body.message, "Name taken");
    assert_eq!(body.product_count, None);
}

#[test]
fn error_body_falls_back_to_message_field() {
    let body = parse_error_body(StatusCode::BAD_REQUEST, r#"{"message":"Invalid coupon"}"#);
    assert_eq!(body.message, "Invalid coupon");
}

#[test]
fn error_body_uses_raw_text_when_not_json() {
    let body = parse_error_body(StatusCode::INTERNAL_SERVER_ERROR, "  upstream exploded ");
    assert_eq!(body.message, "upstream exploded");
}

#[test]
fn error_body_empty_uses_status_line() {
    let body = parse_error_body(StatusCode::BAD_GATEWAY, "");
    assert_eq!(body.message, "Request failed with status 502");
}

#[test]
fn error_body_reads_product_count() {
    let body = parse_error_body(
        StatusCode::BAD_REQUEST,
        r#"{"error":"Cannot delete subcategory with products. Remove products first.","productCount":7}"#,
    );
    assert_eq!(body.product_count, Some(7));
}

#[test]
fn unauthorized_failure_clears_session() {
    let client = test_client("http://localhost:5000");
    let err = client.failure(StatusCode::UNAUTHORIZED, "expired".to_string());
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert!(!client.session().is_authenticated());
}

#[test]
fn forbidden_failure_keeps_session() {
    let client = test_client("http://localhost:5000");
    let err = client.failure(StatusCode::FORBIDDEN, "admins only".to_string());
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert!(client.session().is_authenticated());
}

#[test]
fn other_failures_are_rejections_with_status() {
    let client = test_client("http://localhost:5000");
    let err = client.failure(StatusCode::UNPROCESSABLE_ENTITY, "bad".to_string());
    assert!(matches!(err, ApiError::Rejected { status: 422, .. }));
    assert_eq!(err.kind(), crate::ErrorKind::Validation);
}

#[test]
fn conflict_explanation_includes_count() {
    let conflict = DeleteConflict {
        reason: ConflictReason::CategoryHasProducts,
        product_count: 3,
    };
    assert!(conflict
        .explanation()
        .starts_with("This category contains 3 product(s)."));
    assert_eq!(conflict.title(), "Cannot Delete Category");
}

#[test]
fn conflict_reason_requires_exact_message() {
    assert_eq!(
        ConflictReason::from_server_message(
            "Cannot delete category because a subcategory contains products. Remove products first."
        ),
        Some(ConflictReason::CategorySubcategoryHasProducts)
    );
    assert_eq!(ConflictReason::from_server_message("Cannot delete"), None);
}
