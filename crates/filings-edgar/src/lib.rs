#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR company feed provider.
//!
//! This crate reads the EDGAR company browse endpoint in Atom form and
//! normalizes it into:
//!
//! - Company profile information (name, CIK, SIC, addresses, former names)
//! - A page of regulatory filings with their form type and accession number
//!
//! The pipeline for each lookup is: [`fetch`] the feed, decode it with
//! [`FeedDecoder`](feed::FeedDecoder), [`normalize`] every element and
//! [`assemble`] the result.
//!
//! # Example
//!
//! ```no_run
//! use filings_edgar::EdgarProvider;
//! use filings_core::{FilingFeedProvider, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
//!     let query = Query::new("AAPL")?;
//!
//!     let info = provider.company_info(&query).await?;
//!     println!("Company: {:?} (CIK: {:?})", info.conformed_name, info.cik);
//!
//!     let page = provider.filings(&query, Some(40)).await?;
//!     for filing in page.filings {
//!         println!("{:?} {:?}", filing.filing_type, filing.accession_number);
//!     }
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use filings_core::{
    CompanyInfo, DataProvider, FilingFeedProvider, FilingsResult, Query, Result,
};
use reqwest::Url;
use tracing::{info, warn};

pub mod assemble;
pub mod callback;
pub mod config;
pub mod feed;
pub mod fetch;
pub mod normalize;

pub use config::EdgarConfig;

use assemble::{CompanyInfoAssembler, FilingsAssembler, assemble};
use feed::FeedDecoder;
use fetch::{DEFAULT_FILING_COUNT, feed_url, fetch_feed, resolve_filing_count};

/// SEC EDGAR company feed provider.
///
/// Cloning is cheap; clones share the underlying HTTP connection pool.
#[derive(Clone, Debug)]
pub struct EdgarProvider {
    client: reqwest::Client,
    config: EdgarConfig,
}

impl EdgarProvider {
    /// Create a new EDGAR provider with the specified user agent.
    ///
    /// # Example
    /// ```
    /// use filings_edgar::EdgarProvider;
    ///
    /// let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
    /// ```
    pub fn new(user_agent: &str) -> Self {
        Self::with_config(EdgarConfig::new(user_agent))
    }

    /// Create a new EDGAR provider from a configuration.
    pub fn with_config(config: EdgarConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Create a new EDGAR provider with a custom HTTP client.
    ///
    /// The client is used as is; `config.user_agent` and `config.timeout`
    /// are not applied to it.
    pub fn with_client(client: reqwest::Client, config: EdgarConfig) -> Self {
        Self { client, config }
    }

    /// Returns the provider configuration.
    #[must_use]
    pub const fn config(&self) -> &EdgarConfig {
        &self.config
    }

    /// Feed URL used for company profile lookups.
    ///
    /// # Errors
    ///
    /// Fails only if the configured base URL is invalid.
    pub fn company_info_url(&self, query: &Query) -> Result<Url> {
        feed_url(&self.config.base_url, query, DEFAULT_FILING_COUNT)
    }

    /// Feed URL used for filings lookups.
    ///
    /// # Errors
    ///
    /// Fails only if the configured base URL is invalid.
    pub fn filings_url(&self, query: &Query, count: Option<u32>) -> Result<Url> {
        feed_url(&self.config.base_url, query, resolve_filing_count(count))
    }
}

impl DataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR company browse feed: company profiles and recent filings"
    }
}

#[async_trait]
impl FilingFeedProvider for EdgarProvider {
    async fn company_info(&self, query: &Query) -> Result<CompanyInfo> {
        let url = self.company_info_url(query)?;
        info!(%query, "Getting company info from EDGAR");

        let body = fetch_feed(&self.client, url).await;
        body.and_then(|body| {
            assemble(
                FeedDecoder::new(&body),
                CompanyInfoAssembler::default(),
                query,
            )
        })
        .inspect_err(|e| warn!(%query, error = %e, "Error pulling SEC data"))
    }

    async fn filings(&self, query: &Query, count: Option<u32>) -> Result<FilingsResult> {
        let count = resolve_filing_count(count);
        let url = feed_url(&self.config.base_url, query, count)?;
        info!(%query, count, "Getting SEC filings info from EDGAR");

        let body = fetch_feed(&self.client, url).await;
        body.and_then(|body| {
            assemble(
                FeedDecoder::new(&body),
                FilingsAssembler::new(count as usize),
                query,
            )
        })
        .inspect_err(|e| warn!(%query, error = %e, "Error pulling SEC data"))
    }
}
