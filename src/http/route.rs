//! Path dispatch.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. path ends with `/search` -> company search
//! 2. path contains `/company/` and ends with `/filing-history` -> filing history
//! 3. path contains `/document/` -> document fetch
//! 4. anything else -> not found
//!
//! Identifiers are cut out of the raw path by substring search, then
//! percent-decoded and checked to be a single, non-empty path segment before
//! they are used.

use std::borrow::Cow;

const SEARCH_SUFFIX: &str = "/search";
const COMPANY_MARKER: &str = "/company/";
const FILING_HISTORY_MARKER: &str = "/filing-history";
const DOCUMENT_MARKER: &str = "/document/";

/// Outcome of matching a request path against the dispatch rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Search,
    FilingHistory { company_number: &'a str },
    Document { document_id: &'a str },
    NotFound,
}

impl Route<'_> {
    /// Short label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Search => "search",
            Route::FilingHistory { .. } => "filing_history",
            Route::Document { .. } => "document",
            Route::NotFound => "not_found",
        }
    }
}

/// Match `path` against the ordered dispatch rules.
pub fn match_route(path: &str) -> Route<'_> {
    if path.ends_with(SEARCH_SUFFIX) {
        return Route::Search;
    }

    if path.ends_with(FILING_HISTORY_MARKER) {
        if let Some(company_number) = extract_company_number(path) {
            return Route::FilingHistory { company_number };
        }
    }

    if let Some((_, document_id)) = path.split_once(DOCUMENT_MARKER) {
        return Route::Document { document_id };
    }

    Route::NotFound
}

/// Text between the first `/company/` and the first `/filing-history` that
/// follows it.
fn extract_company_number(path: &str) -> Option<&str> {
    let (_, rest) = path.split_once(COMPANY_MARKER)?;
    let end = rest.find(FILING_HISTORY_MARKER).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Percent-decode an identifier taken from the request path and validate the
/// result.  Decoded text that is not UTF-8 is rejected.
pub fn decode_path_segment<'a>(raw: &'a str, name: &str) -> Result<Cow<'a, str>, String> {
    let value = urlencoding::decode(raw).map_err(|_| format!("invalid {name}: {raw:?}"))?;
    validate_path_segment(&value, name)?;
    Ok(value)
}

/// Validate that an identifier is safe to use as one path segment.
///
/// Rejects empty values, separators, dot segments and null bytes.
pub fn validate_path_segment(value: &str, name: &str) -> Result<(), String> {
    let unsafe_segment = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if unsafe_segment {
        return Err(format!("invalid {name}: {value:?}"));
    }
    Ok(())
}
