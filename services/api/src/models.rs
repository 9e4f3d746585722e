//! API models for request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use staykey_auth::models::{Account, Apartment, KeyCode, Role, Stay};
use uuid::Uuid;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request for admin-created accounts
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request for account edits; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request for key code edits; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeyCodeRequest {
    #[serde(default)]
    pub apartment_id: Option<Uuid>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub valid_from: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub valid_to: Option<Option<DateTime<Utc>>>,
}

/// Request for apartment edits; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
}

/// Apartment with its stays and key codes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentDetail {
    #[serde(flatten)]
    pub apartment: Apartment,
    pub visits: Vec<Stay>,
    pub key_codes: Vec<KeyCode>,
}

/// Account with its stay statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(flatten)]
    pub account: Account,
    pub total_visits: usize,
    pub last_visit: Option<DateTime<Utc>>,
}

impl UserSummary {
    /// `stays` must already be restricted to this account
    pub fn new(account: Account, stays: &[Stay]) -> Self {
        Self {
            account,
            total_visits: stays.len(),
            last_visit: stays.iter().map(|stay| stay.check_in).max(),
        }
    }
}

/// Account with its full stay history, latest check-in first
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub visits: Vec<Stay>,
}

/// What the dashboard shows the signed-in account
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: Account,
    pub active_visit: Option<Stay>,
    pub key_code_count: usize,
}
