//! PostgreSQL-based hot command store.
//!
//! Parameters and metadata are kept as JSON text columns, matching the
//! `hot_commands` table created by the embedded migrations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::metrics::COMMANDS_CREATED_TOTAL;

use super::store::HotCommandStore;
use super::types::{
    CreateHotCommandRequest, HotCommand, HotCommandError, HotCommandFilter, HotCommandResult,
    UpdateHotCommandRequest,
};

const SELECT_COLUMNS: &str = "id, user_id, command_name, query_text, query_type, domain, \
     category, parameters, metadata, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct HotCommandRow {
    id: i64,
    user_id: String,
    command_name: String,
    query_text: String,
    query_type: String,
    domain: Option<String>,
    category: Option<String>,
    parameters: Option<String>,
    metadata: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<HotCommandRow> for HotCommand {
    type Error = HotCommandError;

    fn try_from(row: HotCommandRow) -> Result<Self, Self::Error> {
        let parameters = match row.parameters.as_deref() {
            Some(text) if !text.is_empty() => serde_json::from_str(text)?,
            _ => Vec::new(),
        };
        let metadata = match row.metadata.as_deref() {
            Some(text) if !text.is_empty() => serde_json::from_str(text)?,
            _ => serde_json::Map::new(),
        };

        Ok(HotCommand {
            id: row.id,
            user_id: row.user_id,
            command_name: row.command_name,
            query_text: row.query_text,
            query_type: row.query_type.parse()?,
            domain: row.domain,
            category: row.category,
            parameters,
            metadata,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-based hot command store
pub struct PostgresHotCommandStore {
    pool: PgPool,
}

impl PostgresHotCommandStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotCommandStore for PostgresHotCommandStore {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, request: CreateHotCommandRequest) -> HotCommandResult<HotCommand> {
        request.validate()?;

        let parameters = serde_json::to_string(&request.parameters)?;
        let metadata = serde_json::to_string(&request.metadata)?;

        // The partial unique index on active (user_id, command_name) makes this atomic
        let row: Option<HotCommandRow> = sqlx::query_as(&format!(
            r#"
            INSERT INTO hot_commands
                (user_id, command_name, query_text, query_type, domain, category,
                 parameters, metadata, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, NOW(), NOW())
            ON CONFLICT (user_id, command_name) WHERE is_active DO NOTHING
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&request.user_id)
        .bind(&request.command_name)
        .bind(&request.query_text)
        .bind(request.query_type.as_str())
        .bind(&request.domain)
        .bind(&request.category)
        .bind(&parameters)
        .bind(&metadata)
        .fetch_optional(&self.pool)
        .await?;

        let command: HotCommand = row
            .ok_or_else(|| HotCommandError::AlreadyExists(request.command_name.clone()))?
            .try_into()?;

        COMMANDS_CREATED_TOTAL.inc();
        tracing::debug!(
            id = command.id,
            user_id = %command.user_id,
            command_name = %command.command_name,
            "Hot command inserted into PostgreSQL"
        );

        Ok(command)
    }

    async fn get(&self, id: i64) -> HotCommandResult<HotCommand> {
        let row: Option<HotCommandRow> = sqlx::query_as(&format!(
            "SELECT {} FROM hot_commands WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(HotCommandError::NotFound(id))?.try_into()
    }

    async fn list(&self, filter: &HotCommandFilter) -> HotCommandResult<Vec<HotCommand>> {
        let rows: Vec<HotCommandRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM hot_commands
            WHERE ($1::TEXT IS NULL OR user_id = $1)
              AND ($2::TEXT IS NULL OR domain = $2)
              AND ($3::TEXT IS NULL OR category = $3)
              AND ($4 OR is_active)
            ORDER BY id ASC
            "#,
            SELECT_COLUMNS
        ))
        .bind(&filter.user_id)
        .bind(&filter.domain)
        .bind(&filter.category)
        .bind(filter.include_inactive)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HotCommand::try_from).collect()
    }

    async fn update(
        &self,
        id: i64,
        updates: UpdateHotCommandRequest,
    ) -> HotCommandResult<HotCommand> {
        let mut command = self.get(id).await?;
        updates.apply_to(&mut command)?;

        let parameters = serde_json::to_string(&command.parameters)?;
        let metadata = serde_json::to_string(&command.metadata)?;

        let result = sqlx::query(
            r#"
            UPDATE hot_commands
            SET query_text = $2, query_type = $3, domain = $4, category = $5,
                parameters = $6, metadata = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&command.query_text)
        .bind(command.query_type.as_str())
        .bind(&command.domain)
        .bind(&command.category)
        .bind(&parameters)
        .bind(&metadata)
        .bind(command.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HotCommandError::NotFound(id));
        }

        Ok(command)
    }

    async fn deactivate(&self, id: i64) -> HotCommandResult<()> {
        let result = sqlx::query(
            "UPDATE hot_commands SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HotCommandError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotcommand::QueryType;

    fn row(parameters: Option<&str>, query_type: &str) -> HotCommandRow {
        HotCommandRow {
            id: 3,
            user_id: "alice".to_string(),
            command_name: "by_region".to_string(),
            query_text: "SELECT 1".to_string(),
            query_type: query_type.to_string(),
            domain: None,
            category: Some("ops".to_string()),
            parameters: parameters.map(str::to_string),
            metadata: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let command = HotCommand::try_from(row(
            Some(r#"[{"name":"region","type":"string","required":true}]"#),
            "tool_call",
        ))
        .unwrap();

        assert_eq!(command.query_type, QueryType::ToolCall);
        assert_eq!(command.parameters.len(), 1);
        assert!(command.parameters[0].required);
        assert!(command.metadata.is_empty());
    }

    #[test]
    fn test_row_conversion_empty_parameters() {
        let command = HotCommand::try_from(row(None, "nl2sql")).unwrap();
        assert!(command.parameters.is_empty());
    }

    #[test]
    fn test_row_conversion_rejects_bad_data() {
        assert!(matches!(
            HotCommand::try_from(row(Some("not json"), "nl2sql")),
            Err(HotCommandError::Serialization(_))
        ));
        assert!(matches!(
            HotCommand::try_from(row(None, "shell")),
            Err(HotCommandError::InvalidCommand(_))
        ));
    }
}
