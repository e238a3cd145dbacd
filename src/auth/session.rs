use crate::auth::traits::CredentialVerifier;
use crate::error::{AuthError, AuthResult, StorageError};
use crate::events::{EventBus, StoreEvent};
use crate::models::{Session, UserRole};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_ROLE_KEY: &str = "userRole";
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const USER_NAME_KEY: &str = "userName";

const SESSION_KEYS: [&str; 4] = [AUTH_TOKEN_KEY, USER_ROLE_KEY, USER_EMAIL_KEY, USER_NAME_KEY];

/// Holds the signed-in identity and mirrors it to four plain-string keys
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    verifier: Arc<dyn CredentialVerifier>,
    events: EventBus,
    current: Option<Session>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        verifier: Arc<dyn CredentialVerifier>,
        events: EventBus,
    ) -> Self {
        Self {
            storage,
            verifier,
            events,
            current: None,
        }
    }

    /// Restore a previously persisted session, if a token is stored
    pub fn initialize(&mut self) {
        match self.read_persisted() {
            Ok(Some(session)) => {
                info!("Restored session for {}", session.email);
                self.current = Some(session);
            }
            Ok(None) => {
                debug!("No stored session");
                self.current = None;
            }
            Err(e) => {
                warn!("Ignoring stored session: {}", e);
                self.current = None;
            }
        }
    }

    /// Forget the in-memory identity; storage is left for the next `initialize`
    pub fn teardown(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Verify credentials and start a session.
    ///
    /// A rejected login leaves the current session as it was. If the new
    /// session cannot be stored, the previous one is written back; should that
    /// fail too, the user ends up signed out in memory and in storage.
    pub async fn login(&mut self, email: &str, password: &str) -> AuthResult<&Session> {
        let user = match self.verifier.verify(email, password).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Login failed for {}: {}", email.trim(), e);
                return Err(e);
            }
        };

        let session = Session {
            id: Uuid::new_v4().to_string(),
            email: user.email,
            role: user.role,
            display_name: user.display_name,
        };
        if let Err(e) = self.write_persisted(&session) {
            self.roll_back_keys();
            return Err(e.into());
        }

        info!(
            "{} signed in as {} via {}",
            session.email,
            session.role.as_str(),
            self.verifier.provider_name()
        );
        self.events.publish(StoreEvent::SessionChanged {
            email: Some(session.email.clone()),
        });
        Ok(&*self.current.insert(session))
    }

    /// Clear the session in memory and in storage. Safe to call when signed out.
    pub fn logout(&mut self) {
        self.clear_keys();
        if let Some(session) = self.current.take() {
            info!("{} signed out", session.email);
        }
        self.events.publish(StoreEvent::SessionChanged { email: None });
    }

    /// The current session, provided it carries `role`
    pub fn require_role(&self, role: UserRole) -> AuthResult<&Session> {
        let session = self.current.as_ref().ok_or(AuthError::NotSignedIn)?;
        if session.role != role {
            return Err(AuthError::Forbidden {
                email: session.email.clone(),
                required: role.as_str().to_string(),
            });
        }
        Ok(session)
    }

    /// A stored `authToken` is what makes a session; the other keys are optional
    fn read_persisted(&self) -> Result<Option<Session>, StorageError> {
        let Some(id) = self.storage.get_string(AUTH_TOKEN_KEY)? else {
            return Ok(None);
        };
        let stored_role = self.storage.get_string(USER_ROLE_KEY)?;
        let role = match stored_role.as_deref() {
            Some(role) => role.parse::<UserRole>().map_err(StorageError::Corrupt)?,
            None => UserRole::Visitor,
        };
        let email = self.storage.get_string(USER_EMAIL_KEY)?.unwrap_or_default();
        let display_name = self
            .storage
            .get_string(USER_NAME_KEY)?
            .or(stored_role)
            .unwrap_or_else(|| "User".to_string());

        Ok(Some(Session {
            id,
            email,
            role,
            display_name,
        }))
    }

    fn write_persisted(&self, session: &Session) -> Result<(), StorageError> {
        let values = [
            (AUTH_TOKEN_KEY, session.id.as_str()),
            (USER_ROLE_KEY, session.role.as_str()),
            (USER_EMAIL_KEY, session.email.as_str()),
            (USER_NAME_KEY, session.display_name.as_str()),
        ];
        for (key, value) in values {
            self.storage.set(key, value.as_bytes())?;
        }
        Ok(())
    }

    /// After a failed write, put the previous session back or drop it entirely
    fn roll_back_keys(&mut self) {
        if let Some(previous) = self.current.as_ref() {
            match self.write_persisted(previous) {
                Ok(()) => {
                    debug!("Restored stored session for {}", previous.email);
                    return;
                }
                Err(e) => warn!("Failed to restore session for {}: {}", previous.email, e),
            }
        }

        self.clear_keys();
        if let Some(previous) = self.current.take() {
            warn!("{} signed out: session could not be kept in storage", previous.email);
            self.events.publish(StoreEvent::SessionChanged { email: None });
        }
    }

    fn clear_keys(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to clear {}: {}", key, e);
            }
        }
    }
}
