//! Provider traits for fetching company filing data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FilingFeedProvider`] - Company profile and filing list lookups

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{CompanyInfo, FilingsResult, Query},
};

/// Base trait for all data providers.
///
/// All data providers must implement this trait to provide basic metadata
/// about the provider.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for company profile and filing metadata.
///
/// Each call issues one request and builds its result from scratch; nothing
/// is shared between calls.
#[async_trait]
pub trait FilingFeedProvider: DataProvider {
    /// Fetches the company profile for a ticker or registrant code.
    ///
    /// Returns [`DataError::UnknownCompany`](crate::DataError::UnknownCompany)
    /// when the feed is well-formed but carries no recognized profile fields.
    async fn company_info(&self, query: &Query) -> Result<CompanyInfo>;

    /// Fetches one page of filings for a ticker or registrant code.
    ///
    /// # Arguments
    ///
    /// * `query` - Ticker symbol or registrant code
    /// * `count` - Number of filings to request; `None` or zero selects the provider default
    async fn filings(&self, query: &Query, count: Option<u32>) -> Result<FilingsResult>;
}
