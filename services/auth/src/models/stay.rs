//! Stay (visit) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A booked occupancy of one apartment by one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub account_id: Uuid,
    pub apartment_id: Uuid,
    pub check_in: DateTime<Utc>,
    /// Open-ended when absent
    pub check_out: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Stay {
    /// A stay is active iff `check_in <= now` and the check-out, if any, is not before `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.check_in <= now && self.check_out.is_none_or(|check_out| check_out >= now)
    }
}

/// New stay creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStay {
    pub account_id: Uuid,
    pub apartment_id: Uuid,
    pub check_in: DateTime<Utc>,
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}
