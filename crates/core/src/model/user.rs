use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Validated login credentials.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `CredentialsError::EmptyEmail` if the email is blank.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, CredentialsError> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        Ok(Self {
            email,
            password: password.into(),
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validated sign-up form.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    email: String,
    password: String,
    name: String,
}

impl Registration {
    /// # Errors
    ///
    /// Returns `CredentialsError` when the email or name is blank or the
    /// password is shorter than [`MIN_PASSWORD_LEN`].
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let email = email.into().trim().to_string();
        let name = name.into().trim().to_string();
        let password = password.into();
        if email.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        if name.is_empty() {
            return Err(CredentialsError::EmptyName);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self {
            email,
            password,
            name,
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
