//! Result assembly from decoded feed events.
//!
//! An [`Assembler`] receives the metadata once and then every entry in feed
//! order. [`assemble`] drains the event sequence to its end before finishing,
//! and the first decode error discards whatever was accumulated.

use filings_core::{
    CompanyIdentity, CompanyInfo, DataError, FilingEntry, FilingsResult, Query, Result,
};
use tracing::{debug, warn};

use crate::feed::{Element, FeedEvent};
use crate::normalize;

/// Accumulates one lookup's result from feed events.
pub trait Assembler {
    /// The assembled result.
    type Output;

    /// Called once with the feed-level metadata, before any entry.
    fn on_meta(&mut self, meta: Option<&Element>);

    /// Called for every entry in feed order.
    fn on_entry(&mut self, entry: &Element);

    /// Called once after the last entry.
    fn finish(self, query: &Query) -> Result<Self::Output>;
}

/// Drives `assembler` over `events` and finishes it.
///
/// # Errors
///
/// Returns the first decode error, discarding partially assembled data, or
/// whatever [`Assembler::finish`] reports.
pub fn assemble<I, A>(events: I, mut assembler: A, query: &Query) -> Result<A::Output>
where
    I: IntoIterator<Item = Result<FeedEvent>>,
    A: Assembler,
{
    for event in events {
        match event? {
            FeedEvent::Meta(meta) => assembler.on_meta(meta.as_ref()),
            FeedEvent::Entry(entry) => assembler.on_entry(&entry),
        }
    }
    assembler.finish(query)
}

/// Builds a [`CompanyInfo`]. Entries are consumed and ignored.
#[derive(Debug, Default)]
pub struct CompanyInfoAssembler {
    info: CompanyInfo,
    skipped: usize,
}

impl Assembler for CompanyInfoAssembler {
    type Output = CompanyInfo;

    fn on_meta(&mut self, meta: Option<&Element>) {
        self.info = normalize::company_info(meta);
    }

    fn on_entry(&mut self, _entry: &Element) {
        self.skipped += 1;
    }

    fn finish(self, query: &Query) -> Result<CompanyInfo> {
        debug!(%query, skipped = self.skipped, "Company info feed drained");
        if self.info.is_empty() {
            warn!(%query, "Feed returned no company metadata");
            return Err(DataError::UnknownCompany(query.to_string()));
        }
        Ok(self.info)
    }
}

/// Builds a [`FilingsResult`], keeping at most `limit` entries.
#[derive(Debug)]
pub struct FilingsAssembler {
    info: CompanyIdentity,
    filings: Vec<FilingEntry>,
    limit: usize,
}

impl FilingsAssembler {
    /// Creates an assembler that keeps the first `limit` entries.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            info: CompanyIdentity::default(),
            filings: Vec::with_capacity(limit.min(100)),
            limit,
        }
    }
}

impl Assembler for FilingsAssembler {
    type Output = FilingsResult;

    fn on_meta(&mut self, meta: Option<&Element>) {
        self.info = normalize::company_identity(meta);
    }

    fn on_entry(&mut self, entry: &Element) {
        if self.filings.len() < self.limit {
            self.filings.push(normalize::filing_entry(entry));
        }
    }

    fn finish(self, query: &Query) -> Result<FilingsResult> {
        if self.info.is_empty() {
            warn!(%query, "Feed returned no company metadata");
            return Err(DataError::UnknownCompany(query.to_string()));
        }
        debug!(%query, filings = self.filings.len(), "Filings feed drained");
        Ok(FilingsResult {
            info: self.info,
            filings: self.filings,
        })
    }
}
