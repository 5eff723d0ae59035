//! PostgreSQL-based space store backed by the `spaces` table.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::metrics::{SPACES_SAVED_TOTAL, SPACES_SHARED_TOTAL};

use super::store::SpaceStore;
use super::types::{SaveSpaceRequest, ShareSpaceRequest, Space, SpaceError, SpaceResult};

const SELECT_COLUMNS: &str = "id, user_id, space_name, content, content_type, is_shared, \
     shared_with, created_at, updated_at";

/// PostgreSQL-based space store
pub struct PostgresSpaceStore {
    pool: PgPool,
}

impl PostgresSpaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpaceStore for PostgresSpaceStore {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn save(&self, request: SaveSpaceRequest) -> SpaceResult<Space> {
        request.validate()?;

        let space: Space = sqlx::query_as(&format!(
            r#"
            INSERT INTO spaces
                (user_id, space_name, content, content_type, is_shared, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW(), NOW())
            ON CONFLICT (user_id, space_name) DO UPDATE
            SET content = EXCLUDED.content,
                content_type = EXCLUDED.content_type,
                updated_at = NOW()
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&request.user_id)
        .bind(&request.space_name)
        .bind(&request.content)
        .bind(&request.content_type)
        .fetch_one(&self.pool)
        .await?;

        SPACES_SAVED_TOTAL.inc();
        tracing::debug!(
            id = space.id,
            user_id = %space.user_id,
            space_name = %space.space_name,
            "Space saved to PostgreSQL"
        );

        Ok(space)
    }

    async fn get(&self, user_id: &str, space_name: &str) -> SpaceResult<Space> {
        sqlx::query_as(&format!(
            "SELECT {} FROM spaces WHERE user_id = $1 AND space_name = $2",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(space_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| SpaceError::not_found(user_id, space_name))
    }

    async fn list(&self, user_id: &str) -> SpaceResult<Vec<Space>> {
        let spaces = sqlx::query_as(&format!(
            "SELECT {} FROM spaces WHERE user_id = $1 ORDER BY id ASC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(spaces)
    }

    async fn share(&self, request: ShareSpaceRequest) -> SpaceResult<Space> {
        let space: Option<Space> = sqlx::query_as(&format!(
            r#"
            UPDATE spaces
            SET is_shared = TRUE, shared_with = $3, updated_at = NOW()
            WHERE user_id = $1 AND space_name = $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&request.user_id)
        .bind(&request.space_name)
        .bind(&request.shared_with)
        .fetch_optional(&self.pool)
        .await?;

        let space =
            space.ok_or_else(|| SpaceError::not_found(&request.user_id, &request.space_name))?;
        SPACES_SHARED_TOTAL.inc();
        Ok(space)
    }

    async fn delete(&self, user_id: &str, space_name: &str) -> SpaceResult<()> {
        let result = sqlx::query("DELETE FROM spaces WHERE user_id = $1 AND space_name = $2")
            .bind(user_id)
            .bind(space_name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SpaceError::not_found(user_id, space_name));
        }

        Ok(())
    }
}
