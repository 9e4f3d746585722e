//! Persistence ports and their implementations
//!
//! The core only talks to the traits below. `PgStore` backs them with
//! PostgreSQL through sqlx, `InMemoryStore` with process memory for tests and
//! local development. Both enforce the unique email constraint, reject stays
//! and key codes pointing at a missing account or apartment, and cascade
//! deletes of accounts and apartments.

use chrono::{DateTime, Utc};
use staykey_common::error::DatabaseResult;
use std::future::Future;
use uuid::Uuid;

use crate::models::{
    Account, Apartment, KeyCode, NewAccount, NewApartment, NewKeyCode, NewStay, Stay,
    UpdateAccount, UpdateApartment, UpdateKeyCode,
};

pub mod account;
pub mod apartment;
pub mod key_code;
pub mod memory;
pub mod stay;

pub use memory::InMemoryStore;

/// Account persistence
pub trait AccountStore: Send + Sync {
    fn find_account(&self, id: Uuid)
    -> impl Future<Output = DatabaseResult<Option<Account>>> + Send;

    fn find_account_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = DatabaseResult<Option<Account>>> + Send;

    /// All accounts, newest first
    fn list_accounts(&self) -> impl Future<Output = DatabaseResult<Vec<Account>>> + Send;

    /// Fails with `UniqueViolation` when the email is taken
    fn create_account(
        &self,
        new_account: &NewAccount,
    ) -> impl Future<Output = DatabaseResult<Account>> + Send;

    /// Fails with `NotFound` when the account does not exist
    fn update_account(
        &self,
        id: Uuid,
        changes: &UpdateAccount,
    ) -> impl Future<Output = DatabaseResult<Account>> + Send;

    /// Deletes the account and its stays
    fn delete_account(&self, id: Uuid) -> impl Future<Output = DatabaseResult<()>> + Send;
}

/// Apartment persistence
pub trait ApartmentStore: Send + Sync {
    /// All apartments, by name
    fn list_apartments(&self) -> impl Future<Output = DatabaseResult<Vec<Apartment>>> + Send;

    fn find_apartment(
        &self,
        id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Option<Apartment>>> + Send;

    fn create_apartment(
        &self,
        new_apartment: &NewApartment,
    ) -> impl Future<Output = DatabaseResult<Apartment>> + Send;

    /// Fails with `NotFound` when the apartment does not exist
    fn update_apartment(
        &self,
        id: Uuid,
        changes: &UpdateApartment,
    ) -> impl Future<Output = DatabaseResult<Apartment>> + Send;

    /// Deletes the apartment with its stays and key codes
    fn delete_apartment(&self, id: Uuid) -> impl Future<Output = DatabaseResult<()>> + Send;
}

/// Stay persistence
pub trait StayStore: Send + Sync {
    /// All stays, latest check-in first
    fn list_stays(&self) -> impl Future<Output = DatabaseResult<Vec<Stay>>> + Send;

    /// Stays of one account, latest check-in first
    fn stays_for_account(
        &self,
        account_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Vec<Stay>>> + Send;

    /// Stays in one apartment, latest check-in first
    fn stays_for_apartment(
        &self,
        apartment_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Vec<Stay>>> + Send;

    /// Stays of one account whose window contains `now`
    fn active_stays(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> impl Future<Output = DatabaseResult<Vec<Stay>>> + Send;

    /// Fails with `ForeignKeyViolation` when the account or apartment is missing
    fn create_stay(&self, new_stay: &NewStay) -> impl Future<Output = DatabaseResult<Stay>> + Send;

    fn delete_stay(&self, id: Uuid) -> impl Future<Output = DatabaseResult<()>> + Send;
}

/// Key code persistence
pub trait KeyCodeStore: Send + Sync {
    /// All key codes, newest first
    fn list_key_codes(&self) -> impl Future<Output = DatabaseResult<Vec<KeyCode>>> + Send;

    /// Key codes of one apartment, oldest first
    fn key_codes_for_apartment(
        &self,
        apartment_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Vec<KeyCode>>> + Send;

    fn find_key_code(&self, id: Uuid)
    -> impl Future<Output = DatabaseResult<Option<KeyCode>>> + Send;

    /// Fails with `ForeignKeyViolation` when the apartment is missing
    fn create_key_code(
        &self,
        new_key_code: &NewKeyCode,
    ) -> impl Future<Output = DatabaseResult<KeyCode>> + Send;

    fn update_key_code(
        &self,
        id: Uuid,
        changes: &UpdateKeyCode,
    ) -> impl Future<Output = DatabaseResult<KeyCode>> + Send;

    fn delete_key_code(&self, id: Uuid) -> impl Future<Output = DatabaseResult<()>> + Send;
}

/// Everything the services need from persistence
pub trait Store:
    AccountStore + ApartmentStore + StayStore + KeyCodeStore + Clone + 'static
{
}

impl<T> Store for T where
    T: AccountStore + ApartmentStore + StayStore + KeyCodeStore + Clone + 'static
{
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: sqlx::PgPool,
}

impl PgStore {
    /// Create a new store over a connection pool
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}
