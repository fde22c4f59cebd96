//! Normalization of decoded feed elements into flat records.
//!
//! The EDGAR feed reports every profile field as an optional element. A field
//! that is missing, or present but blank, is left as `None`. Nested records
//! (addresses, former names) keep the one-vs-many shape the feed used.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use filings_core::{Address, CompanyIdentity, CompanyInfo, FilingEntry, FormerName, OneOrMany};
use tracing::debug;

use crate::feed::{Element, Field};

/// The feed spells this element "nunber". Newer feeds also emit the correct
/// spelling, which is used as a fallback.
const ACCESSION_NUMBER_UPSTREAM: &str = "accession-nunber";
const ACCESSION_NUMBER: &str = "accession-number";

fn scalar(element: &Element, name: &str) -> Option<String> {
    element.child_text(name).map(str::to_owned)
}

/// Maps each child element to its text, keyed by the child's name.
/// The first occurrence of a name wins; blank children are skipped.
fn scalar_children(element: &Element) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for child in &element.children {
        if let Some(text) = child.text() {
            fields
                .entry(child.name.clone())
                .or_insert_with(|| text.to_owned());
        }
    }
    fields
}

fn nested<T>(
    parent: Option<&Element>,
    name: &str,
    normalize: fn(&Element) -> T,
) -> Option<OneOrMany<T>> {
    match parent?.field(name)? {
        Field::One(element) => Some(OneOrMany::One(normalize(element))),
        Field::Many(elements) => Some(OneOrMany::Many(
            elements.into_iter().map(normalize).collect(),
        )),
    }
}

/// Normalizes one `<address>`. The `type` attribute becomes [`Address::kind`];
/// other attributes are ignored.
pub fn address(element: &Element) -> Address {
    Address {
        kind: element.attribute("type").map(str::to_owned),
        fields: scalar_children(element),
    }
}

/// Normalizes one `<names>` record. Attributes are ignored.
pub fn former_name(element: &Element) -> FormerName {
    FormerName {
        fields: scalar_children(element),
    }
}

/// Normalizes the `company-info` block into a full profile.
///
/// Returns an empty [`CompanyInfo`] when `meta` is `None`.
pub fn company_info(meta: Option<&Element>) -> CompanyInfo {
    let Some(meta) = meta else {
        return CompanyInfo::default();
    };

    CompanyInfo {
        conformed_name: scalar(meta, "conformed-name"),
        addresses: nested(meta.child("addresses"), "address", address),
        assigned_sic: scalar(meta, "assigned-sic"),
        assigned_sic_desc: scalar(meta, "assigned-sic-desc"),
        assigned_sic_href: scalar(meta, "assigned-sic-href"),
        cik: scalar(meta, "cik"),
        cik_href: scalar(meta, "cik-href"),
        fiscal_year_end: scalar(meta, "fiscal-year-end"),
        formerly_names: nested(meta.child("formerly-names"), "names", former_name),
        state_location: scalar(meta, "state-location"),
        state_location_href: scalar(meta, "state-location-href"),
        state_of_incorporation: scalar(meta, "state-of-incorporation"),
    }
}

/// Normalizes the `company-info` block into the abbreviated identity.
pub fn company_identity(meta: Option<&Element>) -> CompanyIdentity {
    let Some(meta) = meta else {
        return CompanyIdentity::default();
    };

    CompanyIdentity {
        conformed_name: scalar(meta, "conformed-name"),
        cik: scalar(meta, "cik"),
        cik_href: scalar(meta, "cik-href"),
    }
}

/// Picks the `rel="alternate"` link, falling back to the first link.
fn entry_link(entry: &Element) -> Option<String> {
    let mut links = entry.children_named("link");
    let first = links.next()?;
    std::iter::once(first)
        .chain(links)
        .find(|link| link.attribute("rel") == Some("alternate"))
        .unwrap_or(first)
        .attribute("href")
        .map(str::to_owned)
}

fn entry_date(entry: &Element) -> Option<DateTime<FixedOffset>> {
    let raw = entry
        .child_text("published")
        .or_else(|| entry.child_text("updated"))?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(date = raw, error = %e, "Skipping unparseable entry date");
            None
        }
    }
}

/// Normalizes one `<entry>` into a [`FilingEntry`].
pub fn filing_entry(entry: &Element) -> FilingEntry {
    let content = entry.child("content");
    let content_text = |name: &str| content.and_then(|c| scalar(c, name));

    FilingEntry {
        title: scalar(entry, "title"),
        link: entry_link(entry),
        date: entry_date(entry),
        summary: scalar(entry, "summary"),
        guid: scalar(entry, "id"),
        categories: entry
            .children_named("category")
            .filter_map(|c| c.attribute("term"))
            .map(str::to_owned)
            .collect(),
        filing_type: content_text("filing-type"),
        form_name: content_text("form-name"),
        accession_number: content_text(ACCESSION_NUMBER_UPSTREAM)
            .or_else(|| content_text(ACCESSION_NUMBER)),
    }
}
