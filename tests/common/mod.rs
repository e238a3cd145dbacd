#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use maya_listings::listings::PROPERTIES_KEY;
use maya_listings::{KeyValueStore, MemoryStore, NewProperty, Property, PropertyTag, PropertyType, StorageError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Memory store that refuses any listing array longer than `max_records`
pub struct CappedStore {
    inner: MemoryStore,
    max_records: usize,
    pub rejected_writes: AtomicUsize,
}

impl CappedStore {
    pub fn new(max_records: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            max_records,
            rejected_writes: AtomicUsize::new(0),
        }
    }

    /// Write `properties` directly, ignoring the cap
    pub fn preload(&self, properties: &[Property]) {
        self.inner
            .set(PROPERTIES_KEY, &serde_json::to_vec(properties).unwrap())
            .unwrap();
    }

    pub fn stored(&self) -> Vec<Property> {
        let raw = self.inner.get(PROPERTIES_KEY).unwrap().unwrap();
        serde_json::from_slice(&raw).unwrap()
    }
}

impl KeyValueStore for CappedStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if key == PROPERTIES_KEY {
            let records: Vec<serde_json::Value> = serde_json::from_slice(value).unwrap();
            if records.len() > self.max_records {
                self.rejected_writes.fetch_add(1, Ordering::SeqCst);
                return Err(StorageError::QuotaExceeded {
                    needed: records.len(),
                    quota: self.max_records,
                });
            }
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

pub fn draft(title: &str, price: u64) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        price,
        location: "Raipur".to_string(),
        tags: vec![PropertyTag::New],
        image: "/images/test.jpg".to_string(),
        images: vec!["/images/test.jpg".to_string()],
        description: "Test listing".to_string(),
        bedrooms: 3,
        bathrooms: 2,
        area: 1500,
        property_type: PropertyType::House,
        amenities: vec!["Parking".to_string()],
    }
}

/// `count` fixtures published an hour apart, "old-0" being the newest
pub fn hourly_fixtures(count: usize, newest: DateTime<Utc>) -> Vec<Property> {
    (0..count)
        .map(|i| {
            Property::from_new(
                format!("old-{}", i),
                newest - Duration::hours(i as i64 + 1),
                draft(&format!("Fixture {}", i), 1_000_000),
            )
        })
        .collect()
}
