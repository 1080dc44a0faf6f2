//! Query-parameter translation.
//!
//! Turns the raw query-string map of a list request into the structured
//! parameters the persistence layer understands, enforcing the DAO's
//! allow-lists and page-size maximum. All violations across the filter,
//! sort and pagination values are collected before failing, so a caller
//! sees everything wrong with the request at once.

use sea_orm::{Condition, Order};
use std::collections::HashMap;

use crate::dao::TemplateDao;
use crate::entity::Column;
use crate::filter::parse_filters;
use crate::pagination::parse_pagination;
use crate::sort::parse_sort;
use crate::validation::Violation;

/// Structured form of a list request.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub condition: Condition,
    pub order_column: Column,
    pub order: Order,
    /// 1-based page number
    pub page: u64,
    pub per_page: u64,
}

impl ListParams {
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// Translate a raw query map into [`ListParams`].
///
/// Recognized keys: `filter` (JSON object), `sort` (JSON array),
/// `page` and `per_page` (positive integers). Anything else is ignored.
///
/// # Errors
///
/// Returns the combined violation list from all three parsers; persistence
/// is never touched when translation fails.
pub fn translate(raw: &HashMap<String, String>) -> Result<ListParams, Vec<Violation>> {
    let mut violations = Vec::new();

    let condition = match parse_filters(
        raw.get("filter").map(String::as_str),
        &TemplateDao::filterable_columns(),
        &TemplateDao::like_filterable_columns(),
    ) {
        Ok(condition) => Some(condition),
        Err(errors) => {
            violations.extend(errors);
            None
        }
    };

    let sorting = match parse_sort(
        raw.get("sort").map(String::as_str),
        &TemplateDao::sortable_columns(),
        TemplateDao::default_sort_column(),
    ) {
        Ok(sorting) => Some(sorting),
        Err(errors) => {
            violations.extend(errors);
            None
        }
    };

    let pagination = match parse_pagination(
        raw.get("page").map(String::as_str),
        raw.get("per_page").map(String::as_str),
        (TemplateDao::DEFAULT_PAGE, TemplateDao::DEFAULT_PER_PAGE),
        TemplateDao::MAX_PAGE_SIZE,
    ) {
        Ok(pagination) => Some(pagination),
        Err(errors) => {
            violations.extend(errors);
            None
        }
    };

    match (condition, sorting, pagination) {
        (Some(condition), Some((order_column, order)), Some((page, per_page)))
            if violations.is_empty() =>
        {
            Ok(ListParams {
                condition,
                order_column,
                order,
                page,
                per_page,
            })
        }
        _ => Err(violations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_query_uses_defaults() {
        let params = translate(&HashMap::new()).unwrap();
        assert_eq!(params.page, TemplateDao::DEFAULT_PAGE);
        assert_eq!(params.per_page, TemplateDao::DEFAULT_PER_PAGE);
        assert_eq!(params.offset(), 0);
        assert!(matches!(params.order, Order::Asc));
    }

    #[test]
    fn full_query_is_translated() {
        let params = translate(&raw(&[
            ("filter", r#"{"name": "example"}"#),
            ("sort", r#"["name", "DESC"]"#),
            ("page", "3"),
            ("per_page", "10"),
        ]))
        .unwrap();
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 10);
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
        assert!(matches!(params.order_column, Column::Name));
        assert!(matches!(params.order, Order::Desc));
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        assert!(translate(&raw(&[("verbose", "true")])).is_ok());
    }

    #[test]
    fn oversized_page_size_fails_translation() {
        let violations = translate(&raw(&[("per_page", "500")])).unwrap_err();
        assert_eq!(violations[0].code, "PAGE_SIZE_EXCEEDED");
    }

    #[test]
    fn violations_from_all_parsers_are_combined() {
        let violations = translate(&raw(&[
            ("filter", r#"{"favourite_colour": "red"}"#),
            ("sort", r#"["secret", "SIDEWAYS"]"#),
            ("page", "0"),
            ("per_page", "9999"),
        ]))
        .unwrap_err();
        let codes: Vec<&str> = violations.iter().map(|v| v.code.as_str()).collect();
        assert!(codes.contains(&"FILTER_NOT_ALLOWED"));
        assert!(codes.contains(&"SORT_NOT_ALLOWED"));
        assert!(codes.contains(&"SORT_INVALID"));
        assert!(codes.contains(&"PAGE_INVALID"));
        assert!(codes.contains(&"PAGE_SIZE_EXCEEDED"));
    }
}
