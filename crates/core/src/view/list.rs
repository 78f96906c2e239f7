//! Flat list projection: filter by category and status, then sort

use crate::demo::Demo;

/// Sort order for the demo list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Priority ascending, most urgent first
    #[default]
    Priority,
    /// Name ascending, case-insensitive
    Name,
    /// Creation time descending, newest first
    CreatedAt,
}

/// List filter; `None` means "all"
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub sort_by: SortBy,
}

/// Filter and sort the collection for the list view
///
/// Filters match exactly; the sort is stable, so demos that compare
/// equal keep their collection order.
pub fn list_projection(demos: &[Demo], filter: &ListFilter) -> Vec<Demo> {
    let mut result: Vec<Demo> = demos
        .iter()
        .filter(|d| filter.category.as_deref().map_or(true, |c| d.category == c))
        .filter(|d| filter.status.as_deref().map_or(true, |s| d.status == s))
        .cloned()
        .collect();

    match filter.sort_by {
        SortBy::Priority => result.sort_by_key(|d| d.priority),
        SortBy::Name => {
            result.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortBy::CreatedAt => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    result
}

/// Distinct categories in first-seen order, for the filter dropdown
pub fn categories(demos: &[Demo]) -> Vec<String> {
    distinct(demos.iter().map(|d| d.category.as_str()))
}

/// Distinct statuses in first-seen order
pub fn statuses(demos: &[Demo]) -> Vec<String> {
    distinct(demos.iter().map(|d| d.status.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
