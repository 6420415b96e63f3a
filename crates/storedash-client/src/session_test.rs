use super::*;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("storedash-session-{}-{name}", std::process::id()))
        .join("session.json")
}

#[test]
fn file_store_round_trips_dashboard_keys() {
    let path = scratch_path("round-trip");
    let store = FileSessionStore::new(&path);
    store.save(&Session::new("tok-1")).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["token"], "tok-1");
    assert_eq!(raw["isAuthenticated"], true);

    assert_eq!(store.load().unwrap(), Some(Session::new("tok-1")));
    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn file_store_missing_file_is_logged_out() {
    let store = FileSessionStore::new(scratch_path("missing"));
    assert_eq!(store.load().unwrap(), None);
    store.clear().unwrap();
}

#[test]
fn file_store_ignores_unauthenticated_record() {
    let path = scratch_path("flag-false");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"token":"stale","isAuthenticated":false}"#).unwrap();
    assert_eq!(FileSessionStore::new(&path).load().unwrap(), None);
}

#[test]
fn file_store_reports_corrupt_file() {
    let path = scratch_path("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();
    let err = FileSessionStore::new(&path).load().unwrap_err();
    assert!(matches!(err, SessionError::Corrupt { .. }));
}

#[test]
fn context_guard_follows_login_and_logout() {
    let ctx = SessionContext::in_memory();
    assert!(matches!(
        ctx.require_authenticated(),
        Err(crate::ApiError::Unauthenticated)
    ));

    ctx.establish("tok-2").unwrap();
    assert_eq!(ctx.require_authenticated().unwrap(), "tok-2");
    assert!(ctx.is_authenticated());

    ctx.clear().unwrap();
    assert_eq!(ctx.token(), None);
}

#[test]
fn context_restores_persisted_session() {
    let store = MemorySessionStore::with_session(Session::new("tok-3"));
    let ctx = SessionContext::restore(store).unwrap();
    assert_eq!(ctx.token().as_deref(), Some("tok-3"));
}

#[test]
fn debug_output_redacts_token() {
    let rendered = format!("{:?}", Session::new("super-secret"));
    assert!(!rendered.contains("super-secret"));
    let rendered = format!("{:?}", SessionContext::with_token("super-secret"));
    assert!(!rendered.contains("super-secret"));
}
