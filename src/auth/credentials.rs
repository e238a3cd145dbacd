use crate::auth::traits::{CredentialVerifier, VerifiedUser};
use crate::error::{AuthError, AuthResult};
use crate::models::UserRole;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

pub const DEMO_ADMIN_EMAIL: &str = "admin@mayarealestate.com";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";
pub const DEMO_VISITOR_EMAIL: &str = "visitor@mayarealestate.com";
pub const DEMO_VISITOR_PASSWORD: &str = "visitor123";

#[derive(Debug, Clone)]
struct CredentialEntry {
    password: String,
    role: UserRole,
    display_name: String,
}

/// Fixed email -> password table. Plaintext, local only, not a security boundary.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    entries: HashMap<String, CredentialEntry>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two accounts shown on the login page
    pub fn demo() -> Self {
        Self::new()
            .with_entry(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, UserRole::Admin, "Maya Admin")
            .with_entry(DEMO_VISITOR_EMAIL, DEMO_VISITOR_PASSWORD, UserRole::Visitor, "Guest Visitor")
    }

    pub fn with_entry(
        mut self,
        email: &str,
        password: &str,
        role: UserRole,
        display_name: &str,
    ) -> Self {
        self.entries.insert(
            normalize_email(email),
            CredentialEntry {
                password: password.to_string(),
                role,
                display_name: display_name.to_string(),
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, email: &str, password: &str) -> AuthResult<VerifiedUser> {
        let email = normalize_email(email);
        match self.entries.get(&email) {
            Some(entry) if entry.password == password => Ok(VerifiedUser {
                email,
                role: entry.role,
                display_name: entry.display_name.clone(),
            }),
            Some(_) => {
                debug!("Wrong password for {}", email);
                Err(AuthError::InvalidCredentials)
            }
            None => {
                debug!("No account for {}", email);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_accounts_resolve_roles() {
        let table = StaticCredentials::demo();

        let admin = table.verify(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await.unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        let visitor = table.verify(DEMO_VISITOR_EMAIL, DEMO_VISITOR_PASSWORD).await.unwrap();
        assert_eq!(visitor.role, UserRole::Visitor);
    }

    #[tokio::test]
    async fn email_is_case_insensitive_password_is_not() {
        let table = StaticCredentials::demo();

        assert!(table.verify("  Admin@MayaRealEstate.com ", DEMO_ADMIN_PASSWORD).await.is_ok());
        assert!(matches!(
            table.verify(DEMO_ADMIN_EMAIL, "ADMIN123").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            table.verify("nobody@example.com", DEMO_ADMIN_PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
