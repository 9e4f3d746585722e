//! In-memory store implementation

use chrono::{DateTime, Utc};
use staykey_common::error::{DatabaseError, DatabaseResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, ApartmentStore, KeyCodeStore, StayStore};
use crate::models::{
    Account, Apartment, KeyCode, NewAccount, NewApartment, NewKeyCode, NewStay, Stay,
    UpdateAccount, UpdateApartment, UpdateKeyCode,
};

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    apartments: HashMap<Uuid, Apartment>,
    stays: HashMap<Uuid, Stay>,
    key_codes: HashMap<Uuid, KeyCode>,
}

/// In-memory store
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<Uuid>) -> bool {
    tables
        .accounts
        .values()
        .any(|account| account.email == email && Some(account.id) != except)
}

fn missing_key_code_apartment() -> DatabaseError {
    DatabaseError::ForeignKeyViolation("key_codes_apartment_id_fkey".to_string())
}

impl AccountStore for InMemoryStore {
    async fn find_account(&self, id: Uuid) -> DatabaseResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> DatabaseResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn list_accounts(&self) -> DatabaseResult<Vec<Account>> {
        let tables = self.tables.read().await;
        let mut accounts: Vec<Account> = tables.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn create_account(&self, new_account: &NewAccount) -> DatabaseResult<Account> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables, &new_account.email, None) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: new_account.email.clone(),
            name: new_account.name.clone(),
            phone: new_account.phone.clone(),
            password_hash: new_account.password_hash.clone(),
            role: new_account.role,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, id: Uuid, changes: &UpdateAccount) -> DatabaseResult<Account> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if email_taken(&tables, email, Some(id)) {
                return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
            }
        }

        let account = tables.accounts.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        changes.apply_to(account);
        Ok(account.clone())
    }

    async fn delete_account(&self, id: Uuid) -> DatabaseResult<()> {
        let mut tables = self.tables.write().await;
        tables.accounts.remove(&id).ok_or(DatabaseError::NotFound)?;
        tables.stays.retain(|_, stay| stay.account_id != id);
        Ok(())
    }
}

impl ApartmentStore for InMemoryStore {
    async fn list_apartments(&self) -> DatabaseResult<Vec<Apartment>> {
        let tables = self.tables.read().await;
        let mut apartments: Vec<Apartment> = tables.apartments.values().cloned().collect();
        apartments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(apartments)
    }

    async fn find_apartment(&self, id: Uuid) -> DatabaseResult<Option<Apartment>> {
        Ok(self.tables.read().await.apartments.get(&id).cloned())
    }

    async fn create_apartment(&self, new_apartment: &NewApartment) -> DatabaseResult<Apartment> {
        let apartment = Apartment {
            id: Uuid::new_v4(),
            name: new_apartment.name.clone(),
            address: new_apartment.address.clone(),
            description: new_apartment.description.clone(),
            latitude: new_apartment.latitude,
            longitude: new_apartment.longitude,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .apartments
            .insert(apartment.id, apartment.clone());
        Ok(apartment)
    }

    async fn update_apartment(
        &self,
        id: Uuid,
        changes: &UpdateApartment,
    ) -> DatabaseResult<Apartment> {
        let mut tables = self.tables.write().await;
        let apartment = tables.apartments.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        changes.apply_to(apartment);
        Ok(apartment.clone())
    }

    async fn delete_apartment(&self, id: Uuid) -> DatabaseResult<()> {
        let mut tables = self.tables.write().await;
        tables.apartments.remove(&id).ok_or(DatabaseError::NotFound)?;
        tables.stays.retain(|_, stay| stay.apartment_id != id);
        tables.key_codes.retain(|_, key_code| key_code.apartment_id != id);
        Ok(())
    }
}

impl StayStore for InMemoryStore {
    async fn list_stays(&self) -> DatabaseResult<Vec<Stay>> {
        let tables = self.tables.read().await;
        let mut stays: Vec<Stay> = tables.stays.values().cloned().collect();
        stays.sort_by(|a, b| b.check_in.cmp(&a.check_in));
        Ok(stays)
    }

    async fn stays_for_account(&self, account_id: Uuid) -> DatabaseResult<Vec<Stay>> {
        let mut stays: Vec<Stay> = self
            .list_stays()
            .await?
            .into_iter()
            .filter(|stay| stay.account_id == account_id)
            .collect();
        stays.sort_by(|a, b| b.check_in.cmp(&a.check_in));
        Ok(stays)
    }

    async fn stays_for_apartment(&self, apartment_id: Uuid) -> DatabaseResult<Vec<Stay>> {
        let stays = self.list_stays().await?;
        Ok(stays
            .into_iter()
            .filter(|stay| stay.apartment_id == apartment_id)
            .collect())
    }

    async fn active_stays(&self, account_id: Uuid, now: DateTime<Utc>) -> DatabaseResult<Vec<Stay>> {
        let stays = self.stays_for_account(account_id).await?;
        Ok(stays
            .into_iter()
            .filter(|stay| stay.is_active_at(now))
            .collect())
    }

    async fn create_stay(&self, new_stay: &NewStay) -> DatabaseResult<Stay> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&new_stay.account_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "visits_user_id_fkey".to_string(),
            ));
        }
        if !tables.apartments.contains_key(&new_stay.apartment_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "visits_apartment_id_fkey".to_string(),
            ));
        }

        let stay = Stay {
            id: Uuid::new_v4(),
            account_id: new_stay.account_id,
            apartment_id: new_stay.apartment_id,
            check_in: new_stay.check_in,
            check_out: new_stay.check_out,
            notes: new_stay.notes.clone(),
            created_at: Utc::now(),
        };
        tables.stays.insert(stay.id, stay.clone());
        Ok(stay)
    }

    async fn delete_stay(&self, id: Uuid) -> DatabaseResult<()> {
        let mut tables = self.tables.write().await;
        tables.stays.remove(&id).ok_or(DatabaseError::NotFound)?;
        Ok(())
    }
}

impl KeyCodeStore for InMemoryStore {
    async fn list_key_codes(&self) -> DatabaseResult<Vec<KeyCode>> {
        let tables = self.tables.read().await;
        let mut key_codes: Vec<KeyCode> = tables.key_codes.values().cloned().collect();
        key_codes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(key_codes)
    }

    async fn key_codes_for_apartment(&self, apartment_id: Uuid) -> DatabaseResult<Vec<KeyCode>> {
        let tables = self.tables.read().await;
        let mut key_codes: Vec<KeyCode> = tables
            .key_codes
            .values()
            .filter(|key_code| key_code.apartment_id == apartment_id)
            .cloned()
            .collect();
        key_codes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(key_codes)
    }

    async fn find_key_code(&self, id: Uuid) -> DatabaseResult<Option<KeyCode>> {
        Ok(self.tables.read().await.key_codes.get(&id).cloned())
    }

    async fn create_key_code(&self, new_key_code: &NewKeyCode) -> DatabaseResult<KeyCode> {
        let mut tables = self.tables.write().await;
        if !tables.apartments.contains_key(&new_key_code.apartment_id) {
            return Err(missing_key_code_apartment());
        }

        let key_code = KeyCode {
            id: Uuid::new_v4(),
            apartment_id: new_key_code.apartment_id,
            code: new_key_code.code.clone(),
            description: new_key_code.description.clone(),
            valid_from: new_key_code.valid_from,
            valid_to: new_key_code.valid_to,
            created_at: Utc::now(),
        };
        tables.key_codes.insert(key_code.id, key_code.clone());
        Ok(key_code)
    }

    async fn update_key_code(&self, id: Uuid, changes: &UpdateKeyCode) -> DatabaseResult<KeyCode> {
        let mut tables = self.tables.write().await;
        if let Some(apartment_id) = changes.apartment_id {
            if !tables.apartments.contains_key(&apartment_id) {
                return Err(missing_key_code_apartment());
            }
        }

        let key_code = tables.key_codes.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        changes.apply_to(key_code);
        Ok(key_code.clone())
    }

    async fn delete_key_code(&self, id: Uuid) -> DatabaseResult<()> {
        let mut tables = self.tables.write().await;
        tables.key_codes.remove(&id).ok_or(DatabaseError::NotFound)?;
        Ok(())
    }
}
