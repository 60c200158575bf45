//! Free-text search helpers shared by the list endpoints.
//!
//! Every listing in the back office filters with the same rule: a
//! case-insensitive substring match, where an empty (or whitespace-only)
//! term matches everything.

/// Normalize a raw search term: trim and lowercase. Returns `None` when the
/// term is empty so callers can skip filtering entirely.
pub fn normalize_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Case-insensitive substring test. `needle` must already be lowercased
/// (see [`normalize_term`]).
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// `true` if any of `fields` contains `needle`. `None` fields never match.
pub fn any_field_matches<'a, I>(fields: I, needle: &str) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    fields
        .into_iter()
        .flatten()
        .any(|field| contains_ci(field, needle))
}
