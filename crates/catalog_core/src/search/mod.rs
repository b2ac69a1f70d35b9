//! Generic search: request normalization, execution and result shaping.
//!
//! # Responsibility
//! - Normalize raw paging/sort/filter input into [`SearchParams`].
//! - Run filter -> sort -> paginate over in-memory collections.
//! - Shape pages into [`SearchResult`] and transport envelopes.
//!
//! # Invariants
//! - `SearchResult::total` counts filtered items before pagination.
//! - Storage-backed repositories must keep the same observable semantics.

pub mod params;
pub mod pipeline;
pub mod result;

pub use params::{SearchFilter, SearchInput, SearchParams, SortDirection};
pub use pipeline::{apply_pagination, run_search, sort_by_key_with, SearchSpec, SortKey};
pub use result::{last_page, PaginationOutput, SearchResult};
