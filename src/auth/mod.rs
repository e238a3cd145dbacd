pub mod credentials;
pub mod session;
pub mod traits;

pub use credentials::StaticCredentials;
pub use session::SessionStore;
pub use traits::{CredentialVerifier, VerifiedUser};
