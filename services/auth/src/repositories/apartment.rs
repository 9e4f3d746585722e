//! Apartment queries for PostgreSQL

use staykey_common::error::{DatabaseError, DatabaseResult};
use uuid::Uuid;

use super::{ApartmentStore, PgStore};
use crate::models::{Apartment, NewApartment, UpdateApartment};

impl ApartmentStore for PgStore {
    async fn list_apartments(&self) -> DatabaseResult<Vec<Apartment>> {
        let apartments = sqlx::query_as::<_, Apartment>(
            r#"
            SELECT id, name, address, description, latitude, longitude, created_at
            FROM apartments
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(apartments)
    }

    async fn find_apartment(&self, id: Uuid) -> DatabaseResult<Option<Apartment>> {
        let apartment = sqlx::query_as::<_, Apartment>(
            r#"
            SELECT id, name, address, description, latitude, longitude, created_at
            FROM apartments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(apartment)
    }

    async fn create_apartment(&self, new_apartment: &NewApartment) -> DatabaseResult<Apartment> {
        let apartment = sqlx::query_as::<_, Apartment>(
            r#"
            INSERT INTO apartments (id, name, address, description, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, address, description, latitude, longitude, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_apartment.name)
        .bind(&new_apartment.address)
        .bind(&new_apartment.description)
        .bind(new_apartment.latitude)
        .bind(new_apartment.longitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(apartment)
    }

    async fn update_apartment(
        &self,
        id: Uuid,
        changes: &UpdateApartment,
    ) -> DatabaseResult<Apartment> {
        let apartment = sqlx::query_as::<_, Apartment>(
            r#"
            UPDATE apartments
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                latitude = CASE WHEN $6 THEN $7 ELSE latitude END,
                longitude = CASE WHEN $8 THEN $9 ELSE longitude END
            WHERE id = $1
            RETURNING id, name, address, description, latitude, longitude, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.latitude.is_some())
        .bind(changes.latitude.flatten())
        .bind(changes.longitude.is_some())
        .bind(changes.longitude.flatten())
        .fetch_optional(&self.pool)
        .await?;

        apartment.ok_or(DatabaseError::NotFound)
    }

    async fn delete_apartment(&self, id: Uuid) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM apartments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
