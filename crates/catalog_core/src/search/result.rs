//! Search result envelope and transport projection.

use serde::Serialize;

/// One page of entities plus pagination metadata.
///
/// # Invariants
/// - `last_page = max(1, ceil(total / per_page))`.
/// - Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<E> {
    items: Vec<E>,
    total: u64,
    current_page: u64,
    per_page: u64,
    last_page: u64,
}

impl<E> SearchResult<E> {
    /// Builds a result and derives `last_page`.
    ///
    /// A zero `per_page` is treated as one so the derivation stays total.
    pub fn new(items: Vec<E>, total: u64, current_page: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            items,
            total,
            current_page,
            per_page,
            last_page: last_page(total, per_page),
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    /// Count of items matching the filter, before pagination.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn last_page(&self) -> u64 {
        self.last_page
    }

    /// Projects items while keeping pagination metadata.
    pub fn map_items<T>(self, f: impl FnMut(E) -> T) -> SearchResult<T> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}

/// `ceil(total / per_page)`, never below one.
pub fn last_page(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Transport shape of a paginated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOutput<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
}

impl<T> PaginationOutput<T> {
    /// Maps every item of `result` through `mapper`.
    pub fn from_result<E>(result: SearchResult<E>, mapper: impl FnMut(E) -> T) -> Self {
        let mapped = result.map_items(mapper);
        Self {
            items: mapped.items,
            total: mapped.total,
            current_page: mapped.current_page,
            last_page: mapped.last_page,
            per_page: mapped.per_page,
        }
    }
}
