//! Hot command types and error definitions

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref COMMAND_NAME_PATTERN: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
}

/// Caller-supplied parameter values keyed by parameter name
pub type ValueMap = serde_json::Map<String, serde_json::Value>;

/// Failure while substituting parameters into a query template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(String),
}

/// Hot command specific error type
#[derive(Debug, Error)]
pub enum HotCommandError {
    #[error("Hot command not found: {0}")]
    NotFound(i64),

    #[error("Hot command already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid command name: {0}")]
    InvalidCommandName(String),

    #[error("Invalid hot command: {0}")]
    InvalidCommand(String),

    #[error("Hot command is inactive: {0}")]
    Inactive(i64),

    #[error(transparent)]
    Substitution(#[from] SubstitutionError),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for hot command operations
pub type HotCommandResult<T> = Result<T, HotCommandError>;

/// How a hot command's query text is meant to be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Nl2sql,
    DirectSql,
    ToolCall,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Nl2sql => "nl2sql",
            QueryType::DirectSql => "direct_sql",
            QueryType::ToolCall => "tool_call",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = HotCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nl2sql" => Ok(QueryType::Nl2sql),
            "direct_sql" => Ok(QueryType::DirectSql),
            "tool_call" => Ok(QueryType::ToolCall),
            other => Err(HotCommandError::InvalidCommand(format!(
                "Unknown query type: {}",
                other
            ))),
        }
    }
}

/// Declaration of one substitutable parameter in a query template.
///
/// `options` and `validation_regex` are stored for clients but are not
/// enforced when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,

    /// Free-form type tag (e.g. "string", "date")
    #[serde(rename = "type")]
    pub param_type: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub default: Option<serde_json::Value>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub options: Vec<serde_json::Value>,

    #[serde(default)]
    pub validation_regex: Option<String>,
}

/// A saved, parameterized query template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotCommand {
    pub id: i64,

    /// Owner of the command
    pub user_id: String,

    /// Identifier-style name (letter first, then letters, digits, underscore)
    pub command_name: String,

    /// Query template with {{parameter}} placeholders
    pub query_text: String,

    pub query_type: QueryType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,

    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Soft-delete flag
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl HotCommand {
    /// Substitute `values` into this command's query text
    pub fn render(&self, values: &ValueMap) -> HotCommandResult<RenderedCommand> {
        if !self.is_active {
            return Err(HotCommandError::Inactive(self.id));
        }

        let query = super::substitute_parameters(&self.query_text, &self.parameters, values)?;

        Ok(RenderedCommand {
            id: self.id,
            command_name: self.command_name.clone(),
            query_type: self.query_type,
            query,
        })
    }
}

/// Validate a command name against the identifier pattern
pub fn validate_command_name(name: &str) -> HotCommandResult<()> {
    if COMMAND_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(HotCommandError::InvalidCommandName(format!(
            "'{}' must start with a letter and contain only letters, digits, or underscore",
            name
        )))
    }
}

/// Validate a parameter declaration list
pub fn validate_parameters(parameters: &[ParameterDeclaration]) -> HotCommandResult<()> {
    let mut seen = HashSet::new();

    for param in parameters {
        if param.name.is_empty() {
            return Err(HotCommandError::InvalidCommand(
                "Parameter name must not be empty".to_string(),
            ));
        }

        if !seen.insert(param.name.as_str()) {
            return Err(HotCommandError::InvalidCommand(format!(
                "Duplicate parameter: {}",
                param.name
            )));
        }
    }

    Ok(())
}

/// Request to create a new hot command
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHotCommandRequest {
    pub user_id: String,
    pub command_name: String,
    pub query_text: String,
    pub query_type: QueryType,
    pub domain: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl CreateHotCommandRequest {
    pub fn validate(&self) -> HotCommandResult<()> {
        if self.user_id.is_empty() {
            return Err(HotCommandError::InvalidCommand(
                "user_id must not be empty".to_string(),
            ));
        }

        validate_command_name(&self.command_name)?;

        if self.query_text.is_empty() {
            return Err(HotCommandError::InvalidCommand(
                "query_text must not be empty".to_string(),
            ));
        }

        validate_parameters(&self.parameters)
    }

    /// Build the stored record for this request
    pub fn into_command(self, id: i64) -> HotCommand {
        let now = Utc::now();
        HotCommand {
            id,
            user_id: self.user_id,
            command_name: self.command_name,
            query_text: self.query_text,
            query_type: self.query_type,
            domain: self.domain,
            category: self.category,
            parameters: self.parameters,
            metadata: self.metadata,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update an existing hot command; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHotCommandRequest {
    pub query_text: Option<String>,
    pub query_type: Option<QueryType>,
    pub domain: Option<String>,
    pub category: Option<String>,
    pub parameters: Option<Vec<ParameterDeclaration>>,
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UpdateHotCommandRequest {
    /// Apply the updates to `command`, bumping `updated_at`
    pub fn apply_to(self, command: &mut HotCommand) -> HotCommandResult<()> {
        if let Some(query_text) = self.query_text {
            if query_text.is_empty() {
                return Err(HotCommandError::InvalidCommand(
                    "query_text must not be empty".to_string(),
                ));
            }
            command.query_text = query_text;
        }

        if let Some(query_type) = self.query_type {
            command.query_type = query_type;
        }

        if let Some(domain) = self.domain {
            command.domain = Some(domain);
        }

        if let Some(category) = self.category {
            command.category = Some(category);
        }

        if let Some(parameters) = self.parameters {
            validate_parameters(&parameters)?;
            command.parameters = parameters;
        }

        if let Some(metadata) = self.metadata {
            command.metadata = metadata;
        }

        command.updated_at = Utc::now();
        Ok(())
    }
}

/// Filter for listing hot commands
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotCommandFilter {
    pub user_id: Option<String>,
    pub domain: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

impl HotCommandFilter {
    pub fn matches(&self, command: &HotCommand) -> bool {
        if !self.include_inactive && !command.is_active {
            return false;
        }
        if let Some(user_id) = &self.user_id {
            if &command.user_id != user_id {
                return false;
            }
        }
        if let Some(domain) = &self.domain {
            if command.domain.as_ref() != Some(domain) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if command.category.as_ref() != Some(category) {
                return false;
            }
        }
        true
    }
}

/// Response for listing hot commands
#[derive(Debug, Serialize)]
pub struct HotCommandListResponse {
    pub commands: Vec<HotCommand>,
    pub total: usize,
}

/// Request body for rendering a hot command
#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub values: ValueMap,
}

/// A hot command with its parameters substituted
#[derive(Debug, Clone, Serialize)]
pub struct RenderedCommand {
    pub id: i64,
    pub command_name: String,
    pub query_type: QueryType,
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request() -> CreateHotCommandRequest {
        serde_json::from_value(json!({
            "user_id": "alice",
            "command_name": "top_customers",
            "query_text": "SELECT * FROM customers LIMIT {{limit}}",
            "query_type": "direct_sql",
            "parameters": [{"name": "limit", "type": "int", "default": 10}]
        }))
        .unwrap()
    }

    #[test]
    fn test_command_name_validation() {
        assert!(validate_command_name("top_customers").is_ok());
        assert!(validate_command_name("Q1").is_ok());
        assert!(validate_command_name("1st").is_err());
        assert!(validate_command_name("_hidden").is_err());
        assert!(validate_command_name("with-dash").is_err());
        assert!(validate_command_name("").is_err());
    }

    #[test]
    fn test_query_type_closed_set() {
        let parsed: QueryType = serde_json::from_value(json!("tool_call")).unwrap();
        assert_eq!(parsed, QueryType::ToolCall);
        assert!(serde_json::from_value::<QueryType>(json!("shell")).is_err());

        assert_eq!("nl2sql".parse::<QueryType>().unwrap(), QueryType::Nl2sql);
        assert!("NL2SQL".parse::<QueryType>().is_err());
        assert_eq!(QueryType::DirectSql.to_string(), "direct_sql");
    }

    #[test]
    fn test_parameter_declaration_defaults() {
        let param: ParameterDeclaration =
            serde_json::from_value(json!({"name": "region", "type": "string"})).unwrap();
        assert!(!param.required);
        assert!(param.default.is_none());
        assert!(param.options.is_empty());
        assert!(param.validation_regex.is_none());
        assert_eq!(param.description, "");

        let serialized = serde_json::to_value(&param).unwrap();
        assert_eq!(serialized["type"], "string");
        assert_eq!(serialized["description"], "");
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request().validate().is_ok());

        let mut bad_name = create_request();
        bad_name.command_name = "top customers".to_string();
        assert!(matches!(
            bad_name.validate(),
            Err(HotCommandError::InvalidCommandName(_))
        ));

        let mut duplicate = create_request();
        duplicate.parameters.push(duplicate.parameters[0].clone());
        assert!(matches!(
            duplicate.validate(),
            Err(HotCommandError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_render_uses_declared_parameters() {
        let command = create_request().into_command(1);
        let rendered = command.render(&ValueMap::new()).unwrap();
        assert_eq!(rendered.query, "SELECT * FROM customers LIMIT 10");
        assert_eq!(rendered.query_type, QueryType::DirectSql);
    }

    #[test]
    fn test_render_inactive_rejected() {
        let mut command = create_request().into_command(7);
        command.is_active = false;
        assert!(matches!(
            command.render(&ValueMap::new()),
            Err(HotCommandError::Inactive(7))
        ));
    }

    #[test]
    fn test_update_apply() {
        let mut command = create_request().into_command(1);
        let before = command.updated_at;

        let update = UpdateHotCommandRequest {
            query_type: Some(QueryType::Nl2sql),
            category: Some("sales".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut command).unwrap();

        assert_eq!(command.query_type, QueryType::Nl2sql);
        assert_eq!(command.category.as_deref(), Some("sales"));
        assert_eq!(command.parameters.len(), 1);
        assert!(command.updated_at >= before);
    }

    #[test]
    fn test_filter_matches() {
        let command = create_request().into_command(1);

        let by_user = HotCommandFilter {
            user_id: Some("alice".to_string()),
            ..Default::default()
        };
        assert!(by_user.matches(&command));

        let other_user = HotCommandFilter {
            user_id: Some("bob".to_string()),
            ..Default::default()
        };
        assert!(!other_user.matches(&command));

        let by_domain = HotCommandFilter {
            domain: Some("finance".to_string()),
            ..Default::default()
        };
        assert!(!by_domain.matches(&command));

        let mut inactive = command.clone();
        inactive.is_active = false;
        assert!(!HotCommandFilter::default().matches(&inactive));
        let include = HotCommandFilter {
            include_inactive: true,
            ..Default::default()
        };
        assert!(include.matches(&inactive));
    }
}
