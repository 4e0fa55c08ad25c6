use std::sync::Arc;

use storage::{Storage, StorageKey};
use tutor_core::model::{Credentials, Registration, User};

use crate::api::{AuthApi, AuthResponse};
use crate::error::AuthError;

/// Sign-up, sign-in and profile lookup.
///
/// Failures never touch learning state; only the `token` key is owned here.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    storage: Storage,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, storage: Storage) -> Self {
        Self { api, storage }
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` before any request when the form is
    /// incomplete, or the API/storage error otherwise.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let registration = Registration::new(email, password, name)?;
        let response = self.api.register(&registration).await?;
        self.accept(response).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::Invalid` for a blank email, or the API/storage error.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let credentials = Credentials::new(email, password)?;
        let response = self.api.login(&credentials).await?;
        self.accept(response).await
    }

    /// Resolve the signed-in user from a stored token.
    ///
    /// A token the server no longer accepts is discarded.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be read.
    pub async fn load_user(&self) -> Result<Option<User>, AuthError> {
        if self.storage.get_string(StorageKey::Token).await?.is_none() {
            return Ok(None);
        }
        match self.api.profile().await {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                tracing::warn!(error = %err, "stored token rejected; signing out");
                self.storage.remove(StorageKey::Token).await?;
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.storage.remove(StorageKey::Token).await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be read.
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.storage.get_string(StorageKey::Token).await?.is_some())
    }

    async fn accept(&self, response: AuthResponse) -> Result<User, AuthError> {
        self.storage
            .set_string(StorageKey::Token, &response.access_token)
            .await?;
        tracing::info!(user = %response.user.id, "signed in");
        Ok(response.user)
    }
}
