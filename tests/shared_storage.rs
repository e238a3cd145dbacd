mod common;

use common::draft;
use maya_listings::auth::credentials::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};
use maya_listings::{
    EventBus, FileStore, KeyValueStore, ListingStore, SessionStore, StaticCredentials, StoreEvent,
    UserRole,
};
use std::sync::Arc;
use tempfile::tempdir;

struct App {
    sessions: SessionStore,
    listings: ListingStore,
    events: EventBus,
}

fn boot(storage: Arc<dyn KeyValueStore>) -> App {
    let events = EventBus::new();
    let mut sessions = SessionStore::new(
        storage.clone(),
        Arc::new(StaticCredentials::demo()),
        events.clone(),
    );
    sessions.initialize();
    let mut listings = ListingStore::new(storage, events.clone());
    listings.initialize();
    App {
        sessions,
        listings,
        events,
    }
}

#[tokio::test]
async fn admin_flow_persists_across_restarts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("maya_storage.json");

    let added = {
        let mut app = boot(Arc::new(FileStore::new(&path)));
        let mut rx = app.events.subscribe();

        app.sessions.login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await.unwrap();
        app.sessions.require_role(UserRole::Admin).unwrap();
        let added = app.listings.add(draft("Admin Upload", 6_100_000)).unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            StoreEvent::SessionChanged { email: Some(_) }
        ));
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::ListingsChanged { .. }));
        added
    };

    let app = boot(Arc::new(FileStore::new(&path)));
    assert!(app.sessions.require_role(UserRole::Admin).is_ok());
    assert_eq!(app.listings.get(&added.id), Some(&added));
}

#[tokio::test]
async fn second_handle_sees_changes_after_refresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("maya_storage.json");

    let mut first = boot(Arc::new(FileStore::new(&path)));
    let mut second = boot(Arc::new(FileStore::new(&path)));

    let added = first.listings.add(draft("Cross-tab", 2_000_000)).unwrap();
    assert!(second.listings.get(&added.id).is_none());

    second.listings.refresh();
    assert_eq!(second.listings.get(&added.id), Some(&added));

    // Last writer replaces the whole array
    second.listings.delete(&added.id).unwrap();
    let reloaded = boot(Arc::new(FileStore::new(&path)));
    assert!(reloaded.listings.get(&added.id).is_none());
}
