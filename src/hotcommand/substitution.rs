//! Parameter substitution engine for hot command query templates

use serde_json::Value;

use super::types::{ParameterDeclaration, SubstitutionError, ValueMap};

/// Text used for a parameter that resolves to no value and is not required.
pub const MISSING_VALUE_MARKER: &str = "None";

/// Substitute `{{name}}` placeholders in `template` for each declared parameter.
///
/// Declarations are applied in order, each one rewriting the string produced
/// by the previous ones. A supplied value (even JSON `null`) takes precedence
/// over the declaration default. Placeholders with no matching declaration
/// are left untouched.
pub fn substitute_parameters(
    template: &str,
    declarations: &[ParameterDeclaration],
    values: &ValueMap,
) -> Result<String, SubstitutionError> {
    let mut result = template.to_string();

    for param in declarations {
        let value = values
            .get(&param.name)
            .or(param.default.as_ref())
            .filter(|v| !v.is_null());

        if value.is_none() && param.required {
            return Err(SubstitutionError::MissingRequiredParameter(
                param.name.clone(),
            ));
        }

        let pattern = format!("{{{{{}}}}}", param.name);
        result = result.replace(&pattern, &stringify_value(value));
    }

    Ok(result)
}

fn stringify_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_VALUE_MARKER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        // Arrays and objects use their JSON representation
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param(name: &str, required: bool) -> ParameterDeclaration {
        ParameterDeclaration {
            name: name.to_string(),
            param_type: "string".to_string(),
            required,
            default: None,
            description: String::new(),
            options: vec![],
            validation_regex: None,
        }
    }

    fn values(v: Value) -> ValueMap {
        match v {
            Value::Object(map) => map,
            _ => panic!("values must be an object"),
        }
    }

    #[test]
    fn test_no_placeholders_unchanged() {
        let template = "SELECT * FROM orders";
        let result = substitute_parameters(
            template,
            &[param("region", false)],
            &values(json!({"region": "EU"})),
        )
        .unwrap();
        assert_eq!(result, template);
    }

    #[test]
    fn test_substitute_simple() {
        let result = substitute_parameters(
            "SELECT * FROM sales WHERE region = '{{region}}'",
            &[param("region", true)],
            &values(json!({"region": "EMEA"})),
        )
        .unwrap();
        assert_eq!(result, "SELECT * FROM sales WHERE region = 'EMEA'");
    }

    #[test]
    fn test_missing_required_fails() {
        let err = substitute_parameters(
            "{{a}} {{b}}",
            &[param("a", false), param("b", true)],
            &values(json!({"a": "ok"})),
        )
        .unwrap_err();
        assert_eq!(err, SubstitutionError::MissingRequiredParameter("b".into()));
        assert_eq!(err.to_string(), "Missing required parameter: b");
    }

    #[test]
    fn test_first_missing_required_stops_processing() {
        let err = substitute_parameters(
            "{{a}} {{b}}",
            &[param("a", true), param("b", true)],
            &ValueMap::new(),
        )
        .unwrap_err();
        assert_eq!(err, SubstitutionError::MissingRequiredParameter("a".into()));
    }

    #[test]
    fn test_default_fallback() {
        let mut limit = param("limit", true);
        limit.default = Some(json!(100));

        let result =
            substitute_parameters("LIMIT {{limit}}", &[limit], &ValueMap::new()).unwrap();
        assert_eq!(result, "LIMIT 100");
    }

    #[test]
    fn test_supplied_value_overrides_default() {
        let mut limit = param("limit", false);
        limit.default = Some(json!(100));

        let result =
            substitute_parameters("LIMIT {{limit}}", &[limit], &values(json!({"limit": 5})))
                .unwrap();
        assert_eq!(result, "LIMIT 5");
    }

    #[test]
    fn test_explicit_null_shadows_default() {
        let mut limit = param("limit", true);
        limit.default = Some(json!(100));

        let err = substitute_parameters(
            "LIMIT {{limit}}",
            &[limit],
            &values(json!({"limit": null})),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SubstitutionError::MissingRequiredParameter("limit".into())
        );
    }

    #[test]
    fn test_unknown_placeholder_passthrough() {
        let result = substitute_parameters(
            "{{known}} {{unknown}}",
            &[param("known", true)],
            &values(json!({"known": "K", "unknown": "ignored"})),
        )
        .unwrap();
        assert_eq!(result, "K {{unknown}}");
    }

    #[test]
    fn test_sequential_rewrite() {
        let result = substitute_parameters(
            "{{a}}-{{b}}",
            &[param("a", true), param("b", true)],
            &values(json!({"a": "{{b}}", "b": "X"})),
        )
        .unwrap();
        assert_eq!(result, "X-X");
    }

    #[test]
    fn test_multiple_occurrences() {
        let result = substitute_parameters(
            "{{x}} and {{x}}",
            &[param("x", true)],
            &values(json!({"x": "Q"})),
        )
        .unwrap();
        assert_eq!(result, "Q and Q");
    }

    #[test]
    fn test_absent_optional_renders_marker() {
        let result =
            substitute_parameters("val={{y}}", &[param("y", false)], &ValueMap::new()).unwrap();
        assert_eq!(result, "val=None");
    }

    #[test]
    fn test_value_stringification() {
        let result = substitute_parameters(
            "{{n}}|{{f}}|{{t}}|{{l}}",
            &[
                param("n", true),
                param("f", true),
                param("t", true),
                param("l", true),
            ],
            &values(json!({"n": 42, "f": 1.5, "t": true, "l": ["a", 1]})),
        )
        .unwrap();
        assert_eq!(result, "42|1.5|True|[\"a\",1]");
    }

    #[test]
    fn test_empty_string_satisfies_required() {
        let result = substitute_parameters(
            "name='{{name}}'",
            &[param("name", true)],
            &values(json!({"name": ""})),
        )
        .unwrap();
        assert_eq!(result, "name=''");
    }
}
