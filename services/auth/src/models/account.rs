//! Account model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::Role;

/// Account entity
///
/// The password hash never leaves the process: it is skipped on
/// serialization and redacted from `Debug` output.
#[derive(Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// New account creation payload
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// Account update payload
///
/// `phone: Some(None)` clears the stored phone number.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

impl UpdateAccount {
    /// Apply the changes to an account in place
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(email) = &self.email {
            account.email = email.clone();
        }
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            account.phone = phone.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            account.password_hash = password_hash.clone();
        }
        if let Some(role) = self.role {
            account.role = role;
        }
    }
}

/// Account login credentials
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}
