#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for company filing feed providers.
//!
//! This crate provides the foundational abstractions for company filing metadata:
//!
//! - [`DataProvider`](provider::DataProvider) - Base trait for all providers
//! - [`FilingFeedProvider`](provider::FilingFeedProvider) - Company profile and filings lookups
//! - [`Lookup`](types::Lookup) - Success-or-error response shape handed to callers

/// Error types for feed operations.
pub mod error;
/// Provider traits for fetching company filing data.
pub mod provider;
/// Core data types (Query, CompanyInfo, FilingEntry, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{DataError, Result};
pub use provider::{DataProvider, FilingFeedProvider};
pub use types::{
    Address, CompanyIdentity, CompanyInfo, FilingEntry, FilingsResult, FormerName, Lookup,
    OneOrMany, Query,
};
