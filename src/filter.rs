//! Filter-string parsing.
//!
//! The `filter` query parameter is a JSON-encoded object, e.g.
//! `{"name": "example"}` or `{"q": "search text"}`. Keys are checked against
//! the persistence layer's allow-list; anything else is a violation rather
//! than a silently ignored column.

use sea_orm::{ColumnTrait, Condition};
use std::collections::HashMap;
use uuid::Uuid;

use crate::validation::Violation;

fn lookup<C: Copy>(columns: &[(&str, C)], name: &str) -> Option<C> {
    columns
        .iter()
        .find(|(col_name, _)| *col_name == name)
        .map(|(_, col)| *col)
}

/// Translate a raw filter string into a `Condition` against the allow-listed
/// columns. The key `"q"` performs a free-text contains search across the
/// like-filterable columns; string values on like-filterable columns match by
/// contains, everything else by equality; UUID-shaped values match exactly.
///
/// # Errors
///
/// Returns every violation found across all keys: unknown filter fields
/// (`FILTER_NOT_ALLOWED`) and malformed filter payloads (`FILTER_INVALID`).
pub fn parse_filters<C>(
    filter_str: Option<&str>,
    allowed_columns: &[(&str, C)],
    like_columns: &[&str],
) -> Result<Condition, Vec<Violation>>
where
    C: ColumnTrait + Copy,
{
    let Some(filter_str) = filter_str.filter(|s| !s.trim().is_empty()) else {
        return Ok(Condition::all());
    };

    let filters: HashMap<String, serde_json::Value> = match serde_json::from_str(filter_str) {
        Ok(filters) => filters,
        Err(_) => {
            return Err(vec![Violation::new(
                "Filter must be a JSON-encoded object",
                "FILTER_INVALID",
            )]);
        }
    };

    let mut violations = Vec::new();
    let mut condition = Condition::all();

    for (key, value) in &filters {
        if key == "q" {
            let Some(term) = value.as_str() else {
                violations.push(Violation::new(
                    "Free-text search value must be a string",
                    "FILTER_INVALID",
                ));
                continue;
            };
            let mut any_column = Condition::any();
            for name in like_columns {
                if let Some(col) = lookup(allowed_columns, name) {
                    any_column = any_column.add(col.contains(term));
                }
            }
            condition = condition.add(any_column);
            continue;
        }

        let Some(col) = lookup(allowed_columns, key) else {
            violations.push(Violation::new(
                format!("Filtering by '{key}' is not supported"),
                "FILTER_NOT_ALLOWED",
            ));
            continue;
        };

        match value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if let Ok(id) = Uuid::parse_str(trimmed) {
                    condition = condition.add(col.eq(id));
                } else if like_columns.contains(&key.as_str()) {
                    condition = condition.add(col.contains(trimmed));
                } else {
                    condition = condition.add(col.eq(trimmed));
                }
            }
            serde_json::Value::Number(n) => {
                if let Some(int) = n.as_i64() {
                    condition = condition.add(col.eq(int));
                } else if let Some(float) = n.as_f64() {
                    condition = condition.add(col.eq(float));
                }
            }
            serde_json::Value::Bool(flag) => {
                condition = condition.add(col.eq(*flag));
            }
            serde_json::Value::Array(entries) => {
                let ids: Vec<Uuid> = entries
                    .iter()
                    .filter_map(|entry| entry.as_str().and_then(|s| Uuid::parse_str(s).ok()))
                    .collect();
                if ids.len() == entries.len() {
                    condition = condition.add(col.is_in(ids));
                } else {
                    violations.push(Violation::new(
                        format!("Array filter values for '{key}' must be UUID strings"),
                        "FILTER_INVALID",
                    ));
                }
            }
            _ => {
                violations.push(Violation::new(
                    format!("Unsupported filter value for '{key}'"),
                    "FILTER_INVALID",
                ));
            }
        }
    }

    if violations.is_empty() {
        Ok(condition)
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Column;

    fn allowed() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("email", Column::Email),
        ]
    }

    const LIKE: &[&str] = &["name", "email"];

    #[test]
    fn no_filter_matches_everything() {
        assert!(parse_filters(None, &allowed(), LIKE).is_ok());
        assert!(parse_filters(Some(""), &allowed(), LIKE).is_ok());
    }

    #[test]
    fn known_fields_build_a_condition() {
        let result = parse_filters(Some(r#"{"name": "example"}"#), &allowed(), LIKE);
        assert!(result.is_ok());
    }

    #[test]
    fn free_text_search_is_accepted() {
        assert!(parse_filters(Some(r#"{"q": "search text"}"#), &allowed(), LIKE).is_ok());
    }

    #[test]
    fn free_text_search_must_be_a_string() {
        let violations =
            parse_filters(Some(r#"{"q": 42}"#), &allowed(), LIKE).unwrap_err();
        assert_eq!(violations[0].code, "FILTER_INVALID");
    }

    #[test]
    fn unknown_field_is_a_violation() {
        let violations =
            parse_filters(Some(r#"{"favourite_colour": "red"}"#), &allowed(), LIKE).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "FILTER_NOT_ALLOWED");
        assert!(violations[0].message.contains("favourite_colour"));
    }

    #[test]
    fn malformed_json_is_a_violation() {
        let violations = parse_filters(Some("{invalid"), &allowed(), LIKE).unwrap_err();
        assert_eq!(violations[0].code, "FILTER_INVALID");
    }

    #[test]
    fn uuid_values_filter_exactly() {
        let filter = r#"{"id": "550e8400-e29b-41d4-a716-446655440000"}"#;
        assert!(parse_filters(Some(filter), &allowed(), LIKE).is_ok());
    }

    #[test]
    fn uuid_arrays_are_accepted() {
        let filter = r#"{"id": ["550e8400-e29b-41d4-a716-446655440000", "550e8400-e29b-41d4-a716-446655440001"]}"#;
        assert!(parse_filters(Some(filter), &allowed(), LIKE).is_ok());
    }

    #[test]
    fn non_uuid_array_entries_are_a_violation() {
        let violations =
            parse_filters(Some(r#"{"id": ["nope"]}"#), &allowed(), LIKE).unwrap_err();
        assert_eq!(violations[0].code, "FILTER_INVALID");
    }

    #[test]
    fn violations_accumulate_across_keys() {
        let filter = r#"{"favourite_colour": "red", "id": {"nested": true}}"#;
        let violations = parse_filters(Some(filter), &allowed(), LIKE).unwrap_err();
        assert_eq!(violations.len(), 2);
    }
}
