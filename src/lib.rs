//! Listing and session core for the Maya Real Estate site.
//!
//! Both stores write through a [`storage::KeyValueStore`], so the same code
//! runs against an in-memory map in tests and a JSON file from the CLI.

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod listings;
pub mod logging;
pub mod models;
pub mod storage;

pub use auth::{CredentialVerifier, SessionStore, StaticCredentials};
pub use error::{AuthError, StorageError, StoreError};
pub use events::{EventBus, StoreEvent};
pub use listings::{ListingFilter, ListingStore};
pub use models::{NewProperty, Property, PropertyPatch, PropertyTag, PropertyType, Session, UserRole};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
