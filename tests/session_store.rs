use maya_listings::auth::credentials::{
    DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, DEMO_VISITOR_EMAIL, DEMO_VISITOR_PASSWORD,
};
use maya_listings::{
    AuthError, EventBus, FileStore, KeyValueStore, MemoryStore, SessionStore, StaticCredentials,
    UserRole,
};
use std::sync::Arc;
use tempfile::tempdir;

fn open(storage: Arc<dyn KeyValueStore>) -> SessionStore {
    let mut store = SessionStore::new(storage, Arc::new(StaticCredentials::demo()), EventBus::new());
    store.initialize();
    store
}

#[tokio::test]
async fn every_table_entry_logs_in_with_its_role() {
    let table = [
        (DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, UserRole::Admin),
        (DEMO_VISITOR_EMAIL, DEMO_VISITOR_PASSWORD, UserRole::Visitor),
    ];

    for (email, password, role) in table {
        let mut store = open(Arc::new(MemoryStore::new()));
        let session = store.login(email, password).await.unwrap();
        assert_eq!(session.role, role);
        assert_eq!(session.email, email);
        assert_eq!(store.current().map(|s| s.role), Some(role));
    }
}

#[tokio::test]
async fn mismatched_pairs_are_rejected() {
    let attempts = [
        (DEMO_ADMIN_EMAIL, DEMO_VISITOR_PASSWORD),
        (DEMO_VISITOR_EMAIL, DEMO_ADMIN_PASSWORD),
        ("someone@else.com", DEMO_ADMIN_PASSWORD),
        ("", ""),
    ];

    for (email, password) in attempts {
        let mut store = open(Arc::new(MemoryStore::new()));
        let err = store.login(email, password).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(store.current().is_none());
    }
}

#[tokio::test]
async fn logout_always_clears() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = open(storage.clone());

    // Signed out already
    store.logout();
    assert!(store.current().is_none());

    store.login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await.unwrap();
    store.logout();
    store.logout();
    assert!(store.current().is_none());
    assert!(open(storage).current().is_none());
}

#[tokio::test]
async fn session_is_restored_after_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let session = {
        let mut store = open(Arc::new(FileStore::new(&path)));
        store.login(DEMO_VISITOR_EMAIL, DEMO_VISITOR_PASSWORD).await.unwrap().clone()
    };

    let restarted = open(Arc::new(FileStore::new(&path)));
    assert_eq!(restarted.current(), Some(&session));
}

#[tokio::test]
async fn teardown_then_initialize_restores_identity() {
    let mut store = open(Arc::new(MemoryStore::new()));
    let session = store
        .login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)
        .await
        .unwrap()
        .clone();

    store.teardown();
    assert!(store.current().is_none());

    store.initialize();
    assert_eq!(store.current(), Some(&session));
}
