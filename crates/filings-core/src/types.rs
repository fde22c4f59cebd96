//! Core data types for company filing metadata.
//!
//! This module defines the normalized record shapes:
//!
//! - [`Query`] - Ticker symbol or registrant code
//! - [`CompanyInfo`] - Company profile information
//! - [`Address`] / [`FormerName`] - Nested profile records
//! - [`OneOrMany`] - Single record or ordered sequence of records
//! - [`CompanyIdentity`] - Abbreviated company identity
//! - [`FilingEntry`] / [`FilingsResult`] - Regulatory filings
//! - [`Lookup`] - Populated result or error message

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DataError;

/// A company lookup key: either a ticker symbol or a numeric registrant code (CIK).
///
/// The only validation is that the query is not blank. Unknown identifiers
/// are left for the upstream service to reject.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// Creates a query, rejecting empty or whitespace-only input.
    ///
    /// # Example
    /// ```
    /// use filings_core::Query;
    ///
    /// assert!(Query::new("AAPL").is_ok());
    /// assert!(Query::new("").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, DataError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(DataError::InvalidQuery("empty query".to_string()));
        }
        Ok(Self(s))
    }

    /// Returns the query as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Query {
    type Error = DataError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Query {
    type Error = DataError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Query> for String {
    fn from(q: Query) -> Self {
        q.0
    }
}

/// A single record or an ordered sequence of records.
///
/// The upstream feed reports one nested record as a lone element and several
/// as repeated elements. The serialized form keeps that distinction: `One`
/// is an object, `Many` is an array in feed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Exactly one record was reported.
    One(T),
    /// Two or more records were reported, in feed order.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Builds from a vector: `None` when empty, `One` for a single item, `Many` otherwise.
    #[must_use]
    pub fn from_vec(mut items: Vec<T>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop().map(Self::One),
            _ => Some(Self::Many(items)),
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the feed reported a single record.
    #[must_use]
    pub const fn is_one(&self) -> bool {
        matches!(self, Self::One(_))
    }

    /// Returns an iterator over the records in feed order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::One(item) => std::slice::from_ref(item).iter(),
            Self::Many(items) => items.iter(),
        }
    }

    /// Collapses into a vector regardless of shape.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

/// A company address.
///
/// `kind` carries the upstream `type` attribute (e.g. "business", "mailing");
/// the remaining location fields are kept under their upstream names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Address type, serialized as `type`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Location fields such as `street1`, `city`, `state`, `zip`, `phone`.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Address {
    /// Returns a location field by its upstream name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// A name the registrant was previously known by, with the date it changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormerName {
    /// Fields under their upstream names, typically `name` and `date`.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl FormerName {
    /// The prior registrant name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").map(String::as_str)
    }

    /// The date the name was in use until.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.fields.get("date").map(String::as_str)
    }
}

/// Company profile information.
///
/// Every field is optional. A field the feed did not report is `None` and is
/// left out of the serialized form entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Conformed (official) company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conformed_name: Option<String>,
    /// Business and mailing addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<OneOrMany<Address>>,
    /// Standard Industrial Classification code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_sic: Option<String>,
    /// SIC code description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_sic_desc: Option<String>,
    /// Link to other registrants with the same SIC code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_sic_href: Option<String>,
    /// Central Index Key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik: Option<String>,
    /// Link to the registrant's filing index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik_href: Option<String>,
    /// Fiscal year end as `MMDD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_end: Option<String>,
    /// Prior registrant names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formerly_names: Option<OneOrMany<FormerName>>,
    /// State of location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_location: Option<String>,
    /// Link to other registrants in the same state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_location_href: Option<String>,
    /// State of incorporation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_of_incorporation: Option<String>,
}

impl CompanyInfo {
    /// Returns true if no field was populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Abbreviated company identity attached to a filings listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    /// Conformed (official) company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conformed_name: Option<String>,
    /// Central Index Key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik: Option<String>,
    /// Link to the registrant's filing index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik_href: Option<String>,
}

impl CompanyIdentity {
    /// Returns true if no field was populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single regulatory filing.
///
/// Serialized keys follow the established response shape (`href`,
/// `filingType`, `formName`, `accession_no`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingEntry {
    /// Entry title, e.g. "10-Q  - Quarterly report [Sections 13 or 15(d)]".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Link to the filing index page.
    #[serde(rename = "href", default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Publication (or last update) timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<FixedOffset>>,
    /// Summary text as published (may contain HTML markup).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Globally unique entry identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Category terms in feed order.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Filing type code, e.g. "10-K".
    #[serde(
        rename = "filingType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub filing_type: Option<String>,
    /// Human-readable form name.
    #[serde(rename = "formName", default, skip_serializing_if = "Option::is_none")]
    pub form_name: Option<String>,
    /// Accession number identifying the filed document.
    #[serde(
        rename = "accession_no",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub accession_number: Option<String>,
}

/// One page of filings for a company.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingsResult {
    /// Company name, registrant code and link.
    pub info: CompanyIdentity,
    /// Filings in feed order (newest first by upstream convention).
    pub filings: Vec<FilingEntry>,
}

/// The outcome of a lookup as delivered to a completion callback.
///
/// Exactly one of the two shapes is ever produced: a failure carries no
/// partial data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lookup<T> {
    /// The lookup failed; serialized as `{"error": "..."}`.
    Failed {
        /// Human-readable message referencing the query.
        error: String,
    },
    /// The populated result.
    Found(T),
}

impl<T> Lookup<T> {
    /// Creates a failed lookup.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Returns the error message, if the lookup failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Found(_) => None,
        }
    }

    /// Returns true if the lookup failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the populated result, discarding any error.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_rejects_blank() {
        assert!(Query::new("").is_err());
        assert!(Query::new("   ").is_err());
        assert_eq!(Query::new("0000320193").unwrap().as_str(), "0000320193");
    }

    #[test]
    fn test_query_is_not_uppercased() {
        let query = Query::new("aapl").unwrap();
        assert_eq!(query.to_string(), "aapl");
    }

    #[test]
    fn test_one_or_many_from_vec() {
        assert_eq!(OneOrMany::<u8>::from_vec(vec![]), None);
        assert_eq!(OneOrMany::from_vec(vec![1]), Some(OneOrMany::One(1)));
        assert_eq!(
            OneOrMany::from_vec(vec![1, 2]),
            Some(OneOrMany::Many(vec![1, 2]))
        );
    }

    #[test]
    fn test_one_or_many_iter_preserves_order() {
        let many = OneOrMany::Many(vec!["a", "b", "c"]);
        assert_eq!(many.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(many.len(), 3);
        assert!(!many.is_empty());
        assert!(OneOrMany::<&str>::Many(vec![]).is_empty());

        let one = OneOrMany::One("a");
        assert!(one.is_one());
        assert_eq!(one.into_vec(), vec!["a"]);
    }

    #[test]
    fn test_address_serializes_type_and_fields_flat() {
        let mut address = Address {
            kind: Some("business".to_string()),
            ..Default::default()
        };
        address
            .fields
            .insert("city".to_string(), "CUPERTINO".to_string());

        let value = serde_json::to_value(&address).unwrap();
        assert_eq!(value, json!({ "type": "business", "city": "CUPERTINO" }));
    }

    #[test]
    fn test_single_address_serializes_as_object() {
        let info = CompanyInfo {
            addresses: Some(OneOrMany::One(Address::default())),
            ..Default::default()
        };
        let value = serde_json::to_value(&info).unwrap();
        assert!(value["addresses"].is_object());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let info = CompanyInfo {
            cik: Some("0000320193".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value, json!({ "cik": "0000320193" }));
    }

    #[test]
    fn test_company_info_is_empty() {
        assert!(CompanyInfo::default().is_empty());
        let info = CompanyInfo {
            fiscal_year_end: Some("0930".to_string()),
            ..Default::default()
        };
        assert!(!info.is_empty());
    }

    #[test]
    fn test_filing_entry_keys() {
        let entry = FilingEntry {
            link: Some("https://example.com".to_string()),
            filing_type: Some("10-K".to_string()),
            form_name: Some("Annual report".to_string()),
            accession_number: Some("0000320193-23-000106".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["href"], "https://example.com");
        assert_eq!(value["filingType"], "10-K");
        assert_eq!(value["formName"], "Annual report");
        assert_eq!(value["accession_no"], "0000320193-23-000106");
        assert_eq!(value["categories"], json!([]));
    }

    #[test]
    fn test_lookup_failed_shape() {
        let lookup: Lookup<CompanyInfo> = Lookup::failed("boom");
        assert_eq!(serde_json::to_value(&lookup).unwrap(), json!({ "error": "boom" }));
        assert_eq!(lookup.error(), Some("boom"));
        assert!(lookup.found().is_none());
    }

    #[test]
    fn test_lookup_round_trips_error_before_found() {
        let lookup: Lookup<CompanyInfo> = serde_json::from_value(json!({ "error": "x" })).unwrap();
        assert!(lookup.is_failed());

        let lookup: Lookup<CompanyInfo> =
            serde_json::from_value(json!({ "cik": "0000320193" })).unwrap();
        assert_eq!(lookup.found().unwrap().cik.as_deref(), Some("0000320193"));
    }
}
