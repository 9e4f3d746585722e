//! Key code queries for PostgreSQL

use staykey_common::error::{DatabaseError, DatabaseResult};
use uuid::Uuid;

use super::{KeyCodeStore, PgStore};
use crate::models::{KeyCode, NewKeyCode, UpdateKeyCode};

impl KeyCodeStore for PgStore {
    async fn list_key_codes(&self) -> DatabaseResult<Vec<KeyCode>> {
        let key_codes = sqlx::query_as::<_, KeyCode>(
            r#"
            SELECT id, apartment_id, code, description, valid_from, valid_to, created_at
            FROM key_codes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(key_codes)
    }

    async fn key_codes_for_apartment(&self, apartment_id: Uuid) -> DatabaseResult<Vec<KeyCode>> {
        let key_codes = sqlx::query_as::<_, KeyCode>(
            r#"
            SELECT id, apartment_id, code, description, valid_from, valid_to, created_at
            FROM key_codes
            WHERE apartment_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(apartment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(key_codes)
    }

    async fn find_key_code(&self, id: Uuid) -> DatabaseResult<Option<KeyCode>> {
        let key_code = sqlx::query_as::<_, KeyCode>(
            r#"
            SELECT id, apartment_id, code, description, valid_from, valid_to, created_at
            FROM key_codes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(key_code)
    }

    async fn create_key_code(&self, new_key_code: &NewKeyCode) -> DatabaseResult<KeyCode> {
        let key_code = sqlx::query_as::<_, KeyCode>(
            r#"
            INSERT INTO key_codes (id, apartment_id, code, description, valid_from, valid_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, apartment_id, code, description, valid_from, valid_to, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_key_code.apartment_id)
        .bind(&new_key_code.code)
        .bind(&new_key_code.description)
        .bind(new_key_code.valid_from)
        .bind(new_key_code.valid_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(key_code)
    }

    async fn update_key_code(&self, id: Uuid, changes: &UpdateKeyCode) -> DatabaseResult<KeyCode> {
        let key_code = sqlx::query_as::<_, KeyCode>(
            r#"
            UPDATE key_codes
            SET apartment_id = COALESCE($2, apartment_id),
                code = COALESCE($3, code),
                description = COALESCE($4, description),
                valid_from = CASE WHEN $5 THEN $6 ELSE valid_from END,
                valid_to = CASE WHEN $7 THEN $8 ELSE valid_to END
            WHERE id = $1
            RETURNING id, apartment_id, code, description, valid_from, valid_to, created_at
            "#,
        )
        .bind(id)
        .bind(changes.apartment_id)
        .bind(&changes.code)
        .bind(&changes.description)
        .bind(changes.valid_from.is_some())
        .bind(changes.valid_from.flatten())
        .bind(changes.valid_to.is_some())
        .bind(changes.valid_to.flatten())
        .fetch_optional(&self.pool)
        .await?;

        key_code.ok_or(DatabaseError::NotFound)
    }

    async fn delete_key_code(&self, id: Uuid) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM key_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
