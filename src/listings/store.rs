use crate::error::{StorageError, StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::listings::eviction::{persist_with_eviction, PersistOutcome};
use crate::listings::filter::ListingFilter;
use crate::listings::fixtures::{backdate, seed_properties};
use crate::models::{NewProperty, Property, PropertyPatch};
use crate::storage::KeyValueStore;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Storage key holding the JSON array of listings
pub const PROPERTIES_KEY: &str = "maya_properties";

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// In-memory listing collection mirrored to a [`KeyValueStore`].
///
/// Every mutation rewrites the whole collection under [`PROPERTIES_KEY`].
pub struct ListingStore {
    storage: Arc<dyn KeyValueStore>,
    events: EventBus,
    fixtures: Vec<Property>,
    properties: Vec<Property>,
    initialized: bool,
}

impl ListingStore {
    /// Store seeded from the bundled fixtures
    pub fn new(storage: Arc<dyn KeyValueStore>, events: EventBus) -> Self {
        Self::with_fixtures(storage, events, seed_properties(Utc::now()))
    }

    /// Store seeded from `fixtures` when nothing is persisted yet
    pub fn with_fixtures(
        storage: Arc<dyn KeyValueStore>,
        events: EventBus,
        fixtures: Vec<Property>,
    ) -> Self {
        Self {
            storage,
            events,
            fixtures,
            properties: Vec::new(),
            initialized: false,
        }
    }

    /// Load the persisted collection, or seed it from the fixtures.
    ///
    /// Corrupt or unreadable storage falls back to the fixtures without
    /// writing anything back. Calling again after a successful load is a no-op.
    pub fn initialize(&mut self) {
        if self.initialized {
            debug!("Listing store already initialized");
            return;
        }

        match self.read_persisted() {
            Ok(Some(properties)) => {
                info!("Loaded {} properties from storage", properties.len());
                self.properties = properties;
            }
            Ok(None) => {
                let now = Utc::now();
                let mut seeded = self.fixtures.clone();
                backdate(&mut seeded, now);
                info!("No stored properties, seeding {} fixtures", seeded.len());

                match serde_json::to_vec(&seeded) {
                    Ok(json) => {
                        if let Err(e) = self.storage.set(PROPERTIES_KEY, &json) {
                            warn!("Could not persist seeded properties: {}", e);
                        }
                    }
                    Err(e) => warn!("Could not serialize seeded properties: {}", e),
                }
                self.properties = seeded;
            }
            Err(e) => {
                error!("Error loading properties: {}", e);
                let now = Utc::now();
                self.properties = self
                    .fixtures
                    .iter()
                    .cloned()
                    .map(|p| Property { published_at: now, ..p })
                    .collect();
            }
        }

        self.initialized = true;
    }

    /// Drop the in-memory collection; the persisted copy is untouched
    pub fn teardown(&mut self) {
        self.properties.clear();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn list(&self) -> &[Property] {
        &self.properties
    }

    pub fn filter(&self, filter: &ListingFilter) -> Vec<&Property> {
        filter.apply(&self.properties)
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// Validate `draft`, assign id and publish time, append and persist.
    ///
    /// On [`StoreError::StorageExhausted`] the listing stays in memory for
    /// this session but was not written.
    pub fn add(&mut self, draft: NewProperty) -> StoreResult<Property> {
        let draft = draft.validate().map_err(StoreError::InvalidListing)?;
        let property = Property::from_new(self.generate_id(), Utc::now(), draft);
        info!("Adding property {} ({})", property.id, property.title);

        self.properties.push(property.clone());
        self.save()?;
        Ok(property)
    }

    /// Merge `patch` into the listing with `id`. Returns whether it existed.
    pub fn update(&mut self, id: &str, patch: PropertyPatch) -> StoreResult<bool> {
        let found = match self.properties.iter_mut().find(|p| p.id == id) {
            Some(property) => {
                property.apply(patch);
                true
            }
            None => {
                debug!("Update for unknown property {}", id);
                false
            }
        };
        self.save()?;
        Ok(found)
    }

    /// Remove the listing with `id`. Returns whether it existed.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.properties.len();
        self.properties.retain(|p| p.id != id);
        let removed = self.properties.len() != before;
        if removed {
            info!("Deleted property {}", id);
        }
        self.save()?;
        Ok(removed)
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Missing or unreadable storage leaves memory as it is.
    pub fn refresh(&mut self) {
        match self.read_persisted() {
            Ok(Some(properties)) => {
                debug!("Refreshed {} properties from storage", properties.len());
                self.properties = properties;
                self.events.publish(StoreEvent::ListingsChanged {
                    count: self.properties.len(),
                });
            }
            Ok(None) => debug!("Nothing stored under {}", PROPERTIES_KEY),
            Err(e) => error!("Error refreshing properties: {}", e),
        }
    }

    fn read_persisted(&self) -> Result<Option<Vec<Property>>, StorageError> {
        let Some(raw) = self.storage.get(PROPERTIES_KEY)? else {
            return Ok(None);
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", PROPERTIES_KEY, e)))
    }

    fn save(&mut self) -> StoreResult<()> {
        let outcome = persist_with_eviction(self.storage.as_ref(), PROPERTIES_KEY, &mut self.properties)?;

        if let PersistOutcome::Evicted { kept, dropped } = outcome {
            self.events.publish(StoreEvent::ListingsEvicted { kept, dropped });
        }
        self.events.publish(StoreEvent::ListingsChanged {
            count: self.properties.len(),
        });
        Ok(())
    }

    fn generate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
                .collect();
            let id = format!("property-{}-{}", Utc::now().timestamp_millis(), suffix);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PropertyTag, PropertyType};
    use crate::storage::MemoryStore;

    fn draft(title: &str) -> NewProperty {
        NewProperty {
            title: title.to_string(),
            price: 3_000_000,
            location: "Durg".to_string(),
            tags: vec![PropertyTag::New],
            bedrooms: 2,
            bathrooms: 2,
            area: 1100,
            property_type: PropertyType::Apartment,
            ..Default::default()
        }
    }

    fn store_on(storage: Arc<MemoryStore>) -> ListingStore {
        let mut store = ListingStore::new(storage, EventBus::new());
        store.initialize();
        store
    }

    #[test]
    fn first_run_seeds_and_persists_fixtures() {
        let storage = Arc::new(MemoryStore::new());
        let store = store_on(storage.clone());

        assert_eq!(store.list().len(), seed_properties(Utc::now()).len());
        let stored: Vec<Property> =
            serde_json::from_slice(&storage.get(PROPERTIES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, store.list());
    }

    #[test]
    fn corrupt_storage_falls_back_without_writing() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(PROPERTIES_KEY, b"{not json").unwrap();

        let store = store_on(storage.clone());

        assert!(!store.list().is_empty());
        assert_eq!(storage.get(PROPERTIES_KEY).unwrap().as_deref(), Some(&b"{not json"[..]));
    }

    #[test]
    fn seeding_survives_a_full_slot() {
        let storage = Arc::new(MemoryStore::with_quota(16));
        let store = store_on(storage.clone());

        assert_eq!(store.list().len(), seed_properties(Utc::now()).len());
        assert!(storage.get(PROPERTIES_KEY).unwrap().is_none());
    }

    #[test]
    fn add_assigns_id_and_timestamp() {
        let mut store = store_on(Arc::new(MemoryStore::new()));
        let before = Utc::now();

        let added = store.add(draft("Garden Flat")).unwrap();

        assert!(added.id.starts_with("property-"));
        assert_eq!(added.id.rsplit('-').next().unwrap().len(), ID_SUFFIX_LEN);
        assert!(added.published_at >= before);
        assert_eq!(store.get(&added.id), Some(&added));
    }

    #[test]
    fn add_rejects_invalid_drafts() {
        let mut store = store_on(Arc::new(MemoryStore::new()));
        let count = store.list().len();

        let err = store.add(draft("  ")).unwrap_err();

        assert!(matches!(err, StoreError::InvalidListing(_)));
        assert_eq!(store.list().len(), count);
    }

    #[test]
    fn update_of_unknown_id_is_a_no_op() {
        let mut store = store_on(Arc::new(MemoryStore::new()));
        let before = store.list().to_vec();

        let found = store
            .update("missing", PropertyPatch { price: Some(1), ..Default::default() })
            .unwrap();

        assert!(!found);
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn refresh_picks_up_external_writes() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = store_on(storage.clone());

        let mut other_tab = ListingStore::new(storage.clone(), EventBus::new());
        other_tab.initialize();
        let added = other_tab.add(draft("From another tab")).unwrap();

        assert!(store.get(&added.id).is_none());
        store.refresh();
        assert!(store.get(&added.id).is_some());
    }

    #[test]
    fn refresh_ignores_corrupt_storage() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = store_on(storage.clone());
        let before = store.list().to_vec();

        storage.set(PROPERTIES_KEY, b"[garbage").unwrap();
        store.refresh();

        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn teardown_clears_memory_only() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = store_on(storage.clone());
        let before = store.list().to_vec();

        store.teardown();
        assert!(store.list().is_empty());
        assert!(!store.is_initialized());

        store.initialize();
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn mutations_publish_events() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let mut store = ListingStore::new(Arc::new(MemoryStore::new()), events);
        store.initialize();

        store.add(draft("Evented")).unwrap();

        let count = store.list().len();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::ListingsChanged { count });
    }

    #[test]
    fn unsaved_mutation_is_not_announced() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let mut store = ListingStore::new(Arc::new(MemoryStore::with_quota(16)), events);
        store.initialize();

        let err = store.add(draft("Too big")).unwrap_err();

        assert!(matches!(err, StoreError::StorageExhausted(_)));
        assert!(store.list().iter().any(|p| p.title == "Too big"));
        assert!(rx.try_recv().is_err());
    }
}
