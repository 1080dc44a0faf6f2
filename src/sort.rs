//! Sort-string parsing.
//!
//! The `sort` query parameter is a JSON array of `["column", "order"]`.
//! Columns are checked against the persistence layer's allow-list.

use sea_orm::{ColumnTrait, Order};

use crate::validation::Violation;

/// Translate a raw sort string against the allow-listed columns. Defaults to
/// ascending order on the default column when absent.
///
/// # Errors
///
/// `SORT_NOT_ALLOWED` for a column outside the allow-list, `SORT_INVALID`
/// for a malformed payload or an order other than ASC/DESC. Both are
/// reported together when both apply.
pub fn parse_sort<C>(
    sort_str: Option<&str>,
    allowed_columns: &[(&str, C)],
    default_column: C,
) -> Result<(C, Order), Vec<Violation>>
where
    C: ColumnTrait + Copy,
{
    let Some(sort_str) = sort_str.filter(|s| !s.trim().is_empty()) else {
        return Ok((default_column, Order::Asc));
    };

    let parts: Vec<String> = match serde_json::from_str(sort_str) {
        Ok(parts) => parts,
        Err(_) => {
            return Err(vec![Violation::new(
                r#"Sort must be a JSON array of ["column", "order"]"#,
                "SORT_INVALID",
            )]);
        }
    };

    let Some(column_name) = parts.first() else {
        return Err(vec![Violation::new(
            "Sort array must name a column",
            "SORT_INVALID",
        )]);
    };

    let mut violations = Vec::new();

    let column = allowed_columns
        .iter()
        .find(|(name, _)| *name == column_name.as_str())
        .map(|(_, col)| *col);
    if column.is_none() {
        violations.push(Violation::new(
            format!("Sorting by '{column_name}' is not supported"),
            "SORT_NOT_ALLOWED",
        ));
    }

    let direction = match parts.get(1).map(String::as_str) {
        None => Some(Order::Asc),
        Some(dir) if dir.eq_ignore_ascii_case("asc") => Some(Order::Asc),
        Some(dir) if dir.eq_ignore_ascii_case("desc") => Some(Order::Desc),
        Some(dir) => {
            violations.push(Violation::new(
                format!("Sort order must be ASC or DESC, got '{dir}'"),
                "SORT_INVALID",
            ));
            None
        }
    };

    match (column, direction) {
        (Some(column), Some(direction)) if violations.is_empty() => Ok((column, direction)),
        _ => Err(violations),
    }
}
