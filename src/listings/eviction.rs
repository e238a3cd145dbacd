//! Full-collection writes with oldest-first eviction when the slot is full.

use crate::error::{StoreError, StoreResult};
use crate::models::Property;
use crate::storage::KeyValueStore;
use tracing::{debug, error, warn};

/// How many times the collection is shrunk before giving up
pub const MAX_EVICTION_ATTEMPTS: usize = 3;

/// What a successful write had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The whole collection was written
    Stored,
    /// Only the newest `kept` records fit; `dropped` older ones are gone
    Evicted { kept: usize, dropped: usize },
}

/// Remaining size after one eviction round (drops 20%, rounding the kept count down)
pub fn shrink(len: usize) -> usize {
    len * 4 / 5
}

/// Serialize `properties` and write them under `key`.
///
/// Any write failure is treated as running out of room: the collection is
/// sorted newest first and cut by 20% per attempt, up to
/// [`MAX_EVICTION_ATTEMPTS`] times. On success `properties` is left holding
/// exactly what was written. When every attempt fails, `properties` keeps all
/// records (newest first) and [`StoreError::StorageExhausted`] is returned.
pub fn persist_with_eviction(
    store: &dyn KeyValueStore,
    key: &str,
    properties: &mut Vec<Property>,
) -> StoreResult<PersistOutcome> {
    let total = properties.len();
    let json = serde_json::to_vec(properties.as_slice())?;
    let mut last_error = match store.set(key, &json) {
        Ok(()) => {
            debug!("Persisted {} properties ({} bytes)", total, json.len());
            return Ok(PersistOutcome::Stored);
        }
        Err(e) => e,
    };

    warn!("Storage write failed ({}). Attempting to optimize...", last_error);
    properties.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let mut keep = total;
    for attempt in 1..=MAX_EVICTION_ATTEMPTS {
        keep = shrink(keep);
        let json = serde_json::to_vec(&properties[..keep])?;
        match store.set(key, &json) {
            Ok(()) => {
                properties.truncate(keep);
                warn!("Optimized storage: kept {} of {} properties", keep, total);
                return Ok(PersistOutcome::Evicted {
                    kept: keep,
                    dropped: total - keep,
                });
            }
            Err(e) => {
                debug!("Attempt {} with {} properties failed: {}", attempt, keep, e);
                last_error = e;
            }
        }
    }

    error!(
        "Unable to save {} properties after {} attempts: {}",
        total, MAX_EVICTION_ATTEMPTS, last_error
    );
    Err(StoreError::StorageExhausted(last_error))
}
