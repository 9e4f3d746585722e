//! Apartment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A rentable unit; stays and key codes belong to one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// New apartment creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApartment {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Apartment update payload
///
/// For the optional fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateApartment {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
}

impl UpdateApartment {
    /// Apply the changes to an apartment in place
    pub fn apply_to(&self, apartment: &mut Apartment) {
        if let Some(name) = &self.name {
            apartment.name = name.clone();
        }
        if let Some(address) = &self.address {
            apartment.address = address.clone();
        }
        if let Some(description) = &self.description {
            apartment.description = description.clone();
        }
        if let Some(latitude) = self.latitude {
            apartment.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            apartment.longitude = longitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apartment() -> Apartment {
        Apartment {
            id: Uuid::new_v4(),
            name: "Harbour Loft".to_string(),
            address: "1 Quay Street".to_string(),
            description: Some("Top floor".to_string()),
            latitude: Some(59.91),
            longitude: Some(10.75),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn apply_to_leaves_absent_fields_and_clears_nulls() {
        let mut target = apartment();
        let changes = UpdateApartment {
            name: Some("Garden Flat".to_string()),
            description: Some(None),
            ..Default::default()
        };

        changes.apply_to(&mut target);

        assert_eq!(target.name, "Garden Flat");
        assert_eq!(target.address, "1 Quay Street");
        assert_eq!(target.description, None);
        assert_eq!(target.latitude, Some(59.91));
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(apartment()).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
