use crate::error::AuthResult;
use crate::models::UserRole;
use async_trait::async_trait;

/// Identity confirmed by a [`CredentialVerifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub email: String,
    pub role: UserRole,
    pub display_name: String,
}

/// Checks an email/password pair and resolves the user's role.
///
/// The bundled [`StaticCredentials`](crate::auth::StaticCredentials) table is a
/// stand-in; a real identity provider plugs in here.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Fails with [`AuthError::InvalidCredentials`](crate::error::AuthError::InvalidCredentials)
    /// for an unknown email or a wrong password
    async fn verify(&self, email: &str, password: &str) -> AuthResult<VerifiedUser>;

    /// Name of the backing provider, for logs
    fn provider_name(&self) -> &'static str;
}
