//! Pagination parsing and the paginated response envelope.

use hyper::HeaderMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::Violation;

/// A page of records together with the totals callers need to iterate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Count across all pages, not just the returned one
    pub total: u64,
    /// 1-based page number
    pub page: u64,
    pub per_page: u64,
    /// `ceil(total / per_page)`
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

/// Parse the `page` / `per_page` query values against the persistence
/// layer's declared maximum, falling back to its defaults when absent.
///
/// # Errors
///
/// `PAGE_INVALID` / `PAGE_SIZE_INVALID` for non-numeric or zero values,
/// `PAGE_SIZE_EXCEEDED` when `per_page` is over the maximum. Violations for
/// both values are reported together.
pub fn parse_pagination(
    page_str: Option<&str>,
    per_page_str: Option<&str>,
    defaults: (u64, u64),
    max_per_page: u64,
) -> Result<(u64, u64), Vec<Violation>> {
    let (default_page, default_per_page) = defaults;
    let mut violations = Vec::new();

    let page = match page_str {
        None => Some(default_page),
        Some(raw) => match raw.parse::<u64>() {
            Ok(page) if page >= 1 => Some(page),
            _ => {
                violations.push(Violation::new(
                    "Page must be a positive integer",
                    "PAGE_INVALID",
                ));
                None
            }
        },
    };

    let per_page = match per_page_str {
        None => Some(default_per_page),
        Some(raw) => match raw.parse::<u64>() {
            Ok(per_page) if per_page >= 1 => {
                if per_page > max_per_page {
                    violations.push(Violation::new(
                        format!("Page size cannot exceed {max_per_page}"),
                        "PAGE_SIZE_EXCEEDED",
                    ));
                    None
                } else {
                    Some(per_page)
                }
            }
            _ => {
                violations.push(Violation::new(
                    "Page size must be a positive integer",
                    "PAGE_SIZE_INVALID",
                ));
                None
            }
        },
    };

    match (page, per_page) {
        (Some(page), Some(per_page)) => Ok((page, per_page)),
        _ => Err(violations),
    }
}

fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Generate the `Content-Range` header for a page of results.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let max_offset_limit = (offset + limit).saturating_sub(1).min(total_count);

    // Control characters would allow header injection
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = format!("{safe_name} {offset}-{max_offset_limit}/{total_count}");

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}
