//! Completion-callback surface.
//!
//! Every lookup ends in exactly one [`Lookup`]: the populated record, or
//! `{"error": "..."}`. A blank query is rejected on the caller's thread
//! before any request is issued.

use filings_core::{CompanyInfo, FilingFeedProvider, FilingsResult, Lookup, Query, Result};
use tokio::task::JoinHandle;

use crate::EdgarProvider;

/// Message for a company info lookup with a blank query.
pub const COMPANY_INFO_QUERY_ERROR: &str = "Cannot get company info without valid query!";

/// Message for a filings lookup with a blank query.
pub const FILINGS_QUERY_ERROR: &str = "Cannot get SEC filings info without valid query!";

/// Message for any failure after the query was accepted.
#[must_use]
pub fn pull_error(query: &Query) -> String {
    format!("There was an error pulling SEC data using ticker: {}", query)
}

fn into_lookup<T>(result: Result<T>, query: &Query) -> Lookup<T> {
    match result {
        Ok(value) => Lookup::Found(value),
        Err(_) => Lookup::failed(pull_error(query)),
    }
}

impl EdgarProvider {
    /// Looks up a company profile and folds any failure into [`Lookup::Failed`].
    pub async fn lookup_company_info(&self, query: &str) -> Lookup<CompanyInfo> {
        let Ok(query) = Query::new(query) else {
            return Lookup::failed(COMPANY_INFO_QUERY_ERROR);
        };
        into_lookup(self.company_info(&query).await, &query)
    }

    /// Looks up filings and folds any failure into [`Lookup::Failed`].
    pub async fn lookup_filings(&self, query: &str, count: Option<u32>) -> Lookup<FilingsResult> {
        let Ok(query) = Query::new(query) else {
            return Lookup::failed(FILINGS_QUERY_ERROR);
        };
        into_lookup(self.filings(&query, count).await, &query)
    }

    /// Fetches a company profile and hands the outcome to `callback`.
    ///
    /// A blank query invokes `callback` immediately and returns `None`;
    /// no request is made. Otherwise the lookup runs on the current Tokio
    /// runtime and `callback` fires once the feed has been fully read.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime with a non-blank query.
    pub fn get_company_info<F>(&self, query: &str, callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Lookup<CompanyInfo>) + Send + 'static,
    {
        let Ok(query) = Query::new(query) else {
            callback(Lookup::failed(COMPANY_INFO_QUERY_ERROR));
            return None;
        };
        let provider = self.clone();
        Some(tokio::spawn(async move {
            let result = provider.company_info(&query).await;
            callback(into_lookup(result, &query));
        }))
    }

    /// Fetches one page of filings and hands the outcome to `callback`.
    ///
    /// `count` of `None` or zero requests the default of 20. Blank queries are
    /// handled as in [`get_company_info`](Self::get_company_info).
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime with a non-blank query.
    pub fn get_filings<F>(
        &self,
        query: &str,
        count: Option<u32>,
        callback: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Lookup<FilingsResult>) + Send + 'static,
    {
        let Ok(query) = Query::new(query) else {
            callback(Lookup::failed(FILINGS_QUERY_ERROR));
            return None;
        };
        let provider = self.clone();
        Some(tokio::spawn(async move {
            let result = provider.filings(&query, count).await;
            callback(into_lookup(result, &query));
        }))
    }
}
