pub mod eviction;
pub mod filter;
pub mod fixtures;
pub mod store;

pub use eviction::{persist_with_eviction, PersistOutcome};
pub use filter::ListingFilter;
pub use store::{ListingStore, PROPERTIES_KEY};
