//! Search request normalization.
//!
//! # Responsibility
//! - Turn raw, untrusted pagination/sort/filter input into a canonical
//!   [`SearchParams`] descriptor.
//!
//! # Invariants
//! - Construction is total: malformed input is coerced, never rejected.
//! - `page >= 1` and `per_page >= 1` always hold.
//! - `sort_dir` is `None` iff `sort` is `None`.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt::Debug;

/// Page used when the requested page is missing or malformed.
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when the requested size is missing or malformed.
pub const DEFAULT_PER_PAGE: u64 = 15;

// Largest integer an untyped numeric input can carry without precision loss.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Sort direction; anything but a case-insensitive `desc` is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Lenient parse used for raw request values.
    pub fn from_raw(value: &Value) -> Self {
        match loose_string(value) {
            Some(text) if text.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Raw search request as produced by an inbound adapter.
///
/// Every key is optional and untyped; missing keys read as `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchInput {
    pub page: Value,
    pub per_page: Value,
    pub sort: Value,
    pub sort_dir: Value,
    pub filter: Value,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a raw JSON object; any non-object yields an empty input.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn with_page(mut self, page: impl Into<Value>) -> Self {
        self.page = page.into();
        self
    }

    pub fn with_per_page(mut self, per_page: impl Into<Value>) -> Self {
        self.per_page = per_page.into();
        self
    }

    pub fn with_sort(mut self, sort: impl Into<Value>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_sort_dir(mut self, sort_dir: impl Into<Value>) -> Self {
        self.sort_dir = sort_dir.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<Value>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Filter payload accepted by a searchable repository.
///
/// `from_raw` returns `None` for inputs meaning "no filter".
pub trait SearchFilter: Clone + Debug + Sized {
    fn from_raw(value: &Value) -> Option<Self>;
}

impl SearchFilter for String {
    fn from_raw(value: &Value) -> Option<Self> {
        loose_string(value)
    }
}

/// Canonical paged/sorted/filtered query descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams<F = String> {
    page: u64,
    per_page: u64,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<F>,
}

impl<F: SearchFilter> SearchParams<F> {
    /// Normalizes raw input. Never fails.
    pub fn new(input: &SearchInput) -> Self {
        let sort = loose_string(&input.sort);
        let sort_dir = sort
            .as_ref()
            .map(|_| SortDirection::from_raw(&input.sort_dir));

        Self {
            page: positive_integer(&input.page).unwrap_or(DEFAULT_PAGE),
            per_page: positive_integer(&input.per_page).unwrap_or(DEFAULT_PER_PAGE),
            sort,
            sort_dir,
            filter: F::from_raw(&input.filter),
        }
    }

    /// Normalizes a raw JSON request object.
    pub fn from_json(value: &Value) -> Self {
        Self::new(&SearchInput::from_json(value))
    }
}

impl<F> SearchParams<F> {
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Zero-based index of the first item on the requested page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl<F> Default for SearchParams<F> {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

/// Coerces a raw value to a positive integer.
///
/// Numbers and numeric strings qualify when finite, whole and `>= 1`.
/// Booleans, objects, arrays, empty strings and null never do.
fn positive_integer(value: &Value) -> Option<u64> {
    let candidate = match value {
        Value::Number(number) => {
            if let Some(exact) = number.as_u64() {
                return (exact >= 1 && exact as f64 <= MAX_EXACT_INTEGER).then_some(exact);
            }
            number.as_f64()?
        }
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    let whole = candidate.is_finite()
        && candidate >= 1.0
        && candidate.fract() == 0.0
        && candidate <= MAX_EXACT_INTEGER;
    whole.then_some(candidate as u64)
}

/// Stringifies a raw value the way loosely typed request layers do.
///
/// Returns `None` for null and the empty string.
pub(crate) fn loose_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => stringify(other),
    };
    (!text.is_empty()).then_some(text)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e21 => format!("{float:.0}"),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        positive_integer, SearchFilter, SearchInput, SearchParams, SortDirection, DEFAULT_PAGE,
        DEFAULT_PER_PAGE,
    };
    use serde::Deserialize;
    use serde_json::{json, Value};

    fn params(input: SearchInput) -> SearchParams {
        SearchParams::new(&input)
    }

    fn malformed_numbers() -> Vec<Value> {
        vec![
            Value::Null,
            json!(""),
            json!("invalid"),
            json!(0),
            json!(-1),
            json!(5.5),
            json!(true),
            json!(false),
            json!({}),
            json!([]),
            json!("0"),
            json!("2.5"),
            json!("NaN"),
            json!("inf"),
        ]
    }

    #[test]
    fn defaults_without_input() {
        let params = params(SearchInput::new());
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 15);
        assert_eq!(params.sort(), None);
        assert_eq!(params.sort_dir(), None);
        assert_eq!(params.filter(), None);
    }

    #[test]
    fn malformed_page_falls_back_to_default() {
        for raw in malformed_numbers() {
            let normalized = params(SearchInput::new().with_page(raw.clone()));
            assert_eq!(normalized.page(), DEFAULT_PAGE, "page input {raw}");
        }
    }

    #[test]
    fn malformed_per_page_falls_back_to_default() {
        for raw in malformed_numbers() {
            let normalized = params(SearchInput::new().with_per_page(raw.clone()));
            assert_eq!(normalized.per_page(), DEFAULT_PER_PAGE, "perPage input {raw}");
        }
    }

    #[test]
    fn valid_positive_integers_pass_through() {
        for value in [1_u64, 2, 15, 99, 10_000] {
            let normalized = params(SearchInput::new().with_page(value).with_per_page(value));
            assert_eq!(normalized.page(), value);
            assert_eq!(normalized.per_page(), value);
        }
        assert_eq!(params(SearchInput::new().with_page("3")).page(), 3);
        assert_eq!(params(SearchInput::new().with_page(4.0)).page(), 4);
    }

    #[test]
    fn huge_numbers_are_rejected() {
        assert_eq!(positive_integer(&json!(u64::MAX)), None);
        assert_eq!(positive_integer(&json!(1e300)), None);
    }

    #[test]
    fn sort_is_stringified_or_null() {
        let cases = [
            (Value::Null, None),
            (json!(""), None),
            (json!(0), Some("0")),
            (json!(-1), Some("-1")),
            (json!(5.5), Some("5.5")),
            (json!(true), Some("true")),
            (json!(false), Some("false")),
            (json!({}), Some("[object Object]")),
            (json!("field"), Some("field")),
        ];
        for (raw, expected) in cases {
            let normalized = params(SearchInput::new().with_sort(raw.clone()));
            assert_eq!(normalized.sort(), expected, "sort input {raw}");
        }
    }

    #[test]
    fn sort_dir_stays_null_without_sort() {
        for raw in [Value::Null, json!("")] {
            let normalized = params(SearchInput::new().with_sort(raw).with_sort_dir("desc"));
            assert_eq!(normalized.sort_dir(), None);
        }
    }

    #[test]
    fn sort_dir_defaults_to_asc_unless_desc() {
        let cases = [
            (Value::Null, SortDirection::Asc),
            (json!(""), SortDirection::Asc),
            (json!(0), SortDirection::Asc),
            (json!("invalid"), SortDirection::Asc),
            (json!("asc"), SortDirection::Asc),
            (json!("ASC"), SortDirection::Asc),
            (json!("desc"), SortDirection::Desc),
            (json!("DESC"), SortDirection::Desc),
            (json!("DeSc"), SortDirection::Desc),
        ];
        for (raw, expected) in cases {
            let normalized =
                params(SearchInput::new().with_sort("field").with_sort_dir(raw.clone()));
            assert_eq!(normalized.sort_dir(), Some(expected), "sortDir input {raw}");
        }
    }

    #[test]
    fn filter_is_stringified_or_null() {
        let cases = [
            (Value::Null, None),
            (json!(""), None),
            (json!(0), Some("0")),
            (json!(-1), Some("-1")),
            (json!(5.5), Some("5.5")),
            (json!(true), Some("true")),
            (json!({}), Some("[object Object]")),
            (json!(["a", 1]), Some("a,1")),
            (json!("field"), Some("field")),
        ];
        for (raw, expected) in cases {
            let normalized = params(SearchInput::new().with_filter(raw.clone()));
            assert_eq!(
                normalized.filter().map(String::as_str),
                expected,
                "filter input {raw}"
            );
        }
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct NameAndActive {
        name: Option<String>,
        active: Option<bool>,
    }

    impl SearchFilter for NameAndActive {
        fn from_raw(value: &Value) -> Option<Self> {
            match value {
                Value::Object(_) => Self::deserialize(value).ok(),
                _ => None,
            }
        }
    }

    #[test]
    fn typed_filters_keep_their_shape() {
        let input = SearchInput::new().with_filter(json!({ "name": "jo", "active": true }));
        let normalized: SearchParams<NameAndActive> = SearchParams::new(&input);
        assert_eq!(
            normalized.filter(),
            Some(&NameAndActive {
                name: Some("jo".to_string()),
                active: Some(true),
            })
        );

        let normalized: SearchParams<NameAndActive> =
            SearchParams::new(&SearchInput::new().with_filter("jo"));
        assert_eq!(normalized.filter(), None);
    }

    #[test]
    fn raw_json_requests_are_read_by_camel_case_keys() {
        let normalized: SearchParams = SearchParams::from_json(&json!({
            "page": 2,
            "perPage": "5",
            "sort": "name",
            "sortDir": "DESC",
            "filter": "jo"
        }));
        assert_eq!(normalized.page(), 2);
        assert_eq!(normalized.per_page(), 5);
        assert_eq!(normalized.sort(), Some("name"));
        assert_eq!(normalized.sort_dir(), Some(SortDirection::Desc));
        assert_eq!(normalized.filter().map(String::as_str), Some("jo"));
        assert_eq!(normalized.offset(), 5);

        let fallback: SearchParams = SearchParams::from_json(&json!("not an object"));
        assert_eq!(fallback, SearchParams::default());
    }
}
