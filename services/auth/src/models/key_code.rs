//! Key code model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An access code belonging to exactly one apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct KeyCode {
    pub id: Uuid,
    pub apartment_id: Uuid,
    pub code: String,
    pub description: String,
    /// Unbounded in the past when absent
    pub valid_from: Option<DateTime<Utc>>,
    /// Unbounded in the future when absent
    pub valid_to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl KeyCode {
    /// Whether `now` falls inside the validity window, both bounds inclusive.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_from.is_none_or(|from| from <= now)
            && self.valid_to.is_none_or(|to| to >= now)
    }
}

/// New key code creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKeyCode {
    pub apartment_id: Uuid,
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
}

/// Key code update payload
///
/// For the validity bounds, `Some(None)` clears the bound.
#[derive(Debug, Clone, Default)]
pub struct UpdateKeyCode {
    pub apartment_id: Option<Uuid>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub valid_from: Option<Option<DateTime<Utc>>>,
    pub valid_to: Option<Option<DateTime<Utc>>>,
}

impl UpdateKeyCode {
    /// Apply the changes to a key code in place
    pub fn apply_to(&self, key_code: &mut KeyCode) {
        if let Some(apartment_id) = self.apartment_id {
            key_code.apartment_id = apartment_id;
        }
        if let Some(code) = &self.code {
            key_code.code = code.clone();
        }
        if let Some(description) = &self.description {
            key_code.description = description.clone();
        }
        if let Some(valid_from) = self.valid_from {
            key_code.valid_from = valid_from;
        }
        if let Some(valid_to) = self.valid_to {
            key_code.valid_to = valid_to;
        }
    }
}
