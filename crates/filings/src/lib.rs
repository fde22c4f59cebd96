#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Unified interface for company filing metadata.
//!
//! This crate re-exports the core types and traits together with the
//! provider implementations enabled by features.
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR company feed provider (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use filings::{EdgarProvider, FilingFeedProvider, Query};
//!
//! #[tokio::main]
//! async fn main() -> filings::Result<()> {
//!     let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
//!     let info = provider.company_info(&Query::new("AAPL")?).await?;
//!     println!("{:?}", info.conformed_name);
//!
//!     // Callback style
//!     provider.get_company_info("AAPL", |lookup| {
//!         println!("{:?}", lookup);
//!     });
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use filings_core::*;

// Providers
#[cfg(feature = "edgar")]
pub use filings_edgar::{EdgarConfig, EdgarProvider};
