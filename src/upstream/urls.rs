//! Outbound URL construction.
//!
//! Identifiers and query values are percent-encoded by the `url` crate rather
//! than interpolated into a format string.

use url::Url;

/// `{api}/search/companies?q={q}&items_per_page={n}`
pub fn search_url(api: &Url, q: &str, items_per_page: u32) -> Url {
    let mut url = with_segments(api, &["search", "companies"]);
    url.query_pairs_mut()
        .clear()
        .append_pair("q", q)
        .append_pair("items_per_page", &items_per_page.to_string());
    url
}

/// `{api}/company/{company_number}/filing-history?items_per_page={n}`
pub fn filing_history_url(api: &Url, company_number: &str, items_per_page: u32) -> Url {
    let mut url = with_segments(api, &["company", company_number, "filing-history"]);
    url.query_pairs_mut()
        .clear()
        .append_pair("items_per_page", &items_per_page.to_string());
    url
}

/// `{document_api}/document/{document_id}`
pub fn document_url(document_api: &Url, document_id: &str) -> Url {
    let mut url = with_segments(document_api, &["document", document_id]);
    url.set_query(None);
    url
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // Base URLs are validated as http(s) at startup, so they always have a
    // hierarchical path.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
