//! Filter -> sort -> paginate execution over in-memory sequences.
//!
//! # Responsibility
//! - Provide the generic sort and pagination steps.
//! - Let each entity type plug in filtering and field access via
//!   [`SearchSpec`].
//!
//! # Invariants
//! - The caller's slice is never mutated; sorting works on an owned copy.
//! - An absent filter returns the input borrowed, without scanning it.
//! - Sorting is stable: equal keys keep their input order.
//! - Pagination never fails; out-of-range pages are empty.

use crate::search::params::{SearchFilter, SearchParams, SortDirection};
use crate::search::result::SearchResult;
use std::borrow::Cow;

/// Comparable value extracted from an entity for generic sorting.
///
/// Variants order as declared, so a missing value sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Missing,
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SortKey {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for SortKey {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<SortKey>> From<Option<T>> for SortKey {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Entity-specific search capabilities.
pub trait SearchSpec<E: Clone> {
    type Filter: SearchFilter;

    /// Field names accepted as generic sort keys.
    fn sortable_fields(&self) -> &[&'static str];

    /// Whether `item` satisfies `filter`.
    fn matches(&self, item: &E, filter: &Self::Filter) -> bool;

    /// Reads the sort value of `field`; `None` for unknown fields.
    fn sort_key(&self, field: &str, item: &E) -> Option<SortKey>;

    fn is_sortable(&self, field: &str) -> bool {
        self.sortable_fields()
            .iter()
            .any(|candidate| *candidate == field)
    }

    /// Returns the subset matching `filter`, or `items` itself when absent.
    fn apply_filter<'a>(&self, items: &'a [E], filter: Option<&Self::Filter>) -> Cow<'a, [E]> {
        let Some(filter) = filter else {
            return Cow::Borrowed(items);
        };
        Cow::Owned(
            items
                .iter()
                .filter(|item| self.matches(item, filter))
                .cloned()
                .collect(),
        )
    }

    /// Order applied when no sortable field is requested; input order unless
    /// the entity defines one.
    fn default_order<'a>(&self, items: Cow<'a, [E]>) -> Cow<'a, [E]> {
        items
    }

    /// Sorts by a sortable field; unknown or absent fields fall back to
    /// [`SearchSpec::default_order`].
    fn apply_sort<'a>(
        &self,
        items: Cow<'a, [E]>,
        sort: Option<&str>,
        sort_dir: Option<SortDirection>,
    ) -> Cow<'a, [E]> {
        match sort {
            Some(field) if self.is_sortable(field) => sort_by_key_with(items, sort_dir, |item| {
                self.sort_key(field, item).unwrap_or(SortKey::Missing)
            }),
            _ => self.default_order(items),
        }
    }
}

/// Stable sort using a caller-supplied value extractor.
///
/// Ascending only for `Some(SortDirection::Asc)`; descending otherwise.
pub fn sort_by_key_with<'a, E, K, F>(
    items: Cow<'a, [E]>,
    sort_dir: Option<SortDirection>,
    mut key: F,
) -> Cow<'a, [E]>
where
    E: Clone,
    K: Ord,
    F: FnMut(&E) -> K,
{
    let ascending = sort_dir == Some(SortDirection::Asc);
    let mut keyed: Vec<(K, E)> = items
        .into_owned()
        .into_iter()
        .map(|item| (key(&item), item))
        .collect();

    keyed.sort_by(|(left, _), (right, _)| {
        let ordering = left.cmp(right);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });

    Cow::Owned(keyed.into_iter().map(|(_, item)| item).collect())
}

/// Half-open page slice `[(page - 1) * per_page, page * per_page)`.
///
/// Clipped to `items`; empty when the start is past the end.
pub fn apply_pagination<E>(items: &[E], page: u64, per_page: u64) -> &[E] {
    let start = to_index(page.max(1).saturating_sub(1).saturating_mul(per_page));
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(to_index(per_page)).min(items.len());
    &items[start..end]
}

/// Runs filter -> sort -> paginate and wraps the page.
///
/// `total` is the filtered count before pagination.
pub fn run_search<E, S>(spec: &S, items: &[E], params: &SearchParams<S::Filter>) -> SearchResult<E>
where
    E: Clone,
    S: SearchSpec<E> + ?Sized,
{
    let filtered = spec.apply_filter(items, params.filter());
    let total = u64::try_from(filtered.len()).unwrap_or(u64::MAX);
    let sorted = spec.apply_sort(filtered, params.sort(), params.sort_dir());
    let page = apply_pagination(&sorted, params.page(), params.per_page()).to_vec();
    SearchResult::new(page, total, params.page(), params.per_page())
}

fn to_index(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
