//! Endpoint construction and the HTTP request.

use filings_core::{DataError, Query, Result};
use reqwest::Url;
use tracing::debug;

/// Number of filings requested when the caller does not ask for a count.
pub const DEFAULT_FILING_COUNT: u32 = 20;

/// Path of the company browse endpoint.
const BROWSE_PATH: &str = "/cgi-bin/browse-edgar";

/// Resolves a requested filing count. `None` and zero select the default.
///
/// # Example
/// ```
/// use filings_edgar::fetch::resolve_filing_count;
///
/// assert_eq!(resolve_filing_count(None), 20);
/// assert_eq!(resolve_filing_count(Some(0)), 20);
/// assert_eq!(resolve_filing_count(Some(40)), 40);
/// ```
#[must_use]
pub const fn resolve_filing_count(count: Option<u32>) -> u32 {
    match count {
        Some(n) if n > 0 => n,
        _ => DEFAULT_FILING_COUNT,
    }
}

/// Builds the Atom browse URL for a company.
///
/// # Errors
///
/// Returns [`DataError::Other`] if `base_url` is not a valid URL.
pub fn feed_url(base_url: &str, query: &Query, count: u32) -> Result<Url> {
    let endpoint = format!("{}{}", base_url.trim_end_matches('/'), BROWSE_PATH);
    let mut url = Url::parse(&endpoint)
        .map_err(|e| DataError::Other(format!("Invalid base URL {}: {}", base_url, e)))?;
    url.query_pairs_mut()
        .append_pair("action", "getcompany")
        .append_pair("CIK", query.as_str())
        .append_pair("type", "")
        .append_pair("dateb", "")
        .append_pair("owner", "include")
        .append_pair("start", "0")
        .append_pair("count", &count.to_string())
        .append_pair("output", "atom");
    Ok(url)
}

/// Issues the GET request and drains the body.
pub(crate) async fn fetch_feed(client: &reqwest::Client, url: Url) -> Result<Vec<u8>> {
    debug!(%url, "Fetching EDGAR feed");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DataError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DataError::Network(format!(
            "Failed to fetch feed: HTTP {}",
            response.status()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| DataError::Network(format!("Failed to read feed body: {}", e)))?;
    debug!(bytes = body.len(), "Fetched EDGAR feed");
    Ok(body.to_vec())
}
