//! End-to-end lookups against a local server replaying recorded EDGAR feeds.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query as Params, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use filings_core::{DataError, FilingFeedProvider, Lookup, OneOrMany, Query};
use filings_edgar::callback::{COMPANY_INFO_QUERY_ERROR, FILINGS_QUERY_ERROR};
use filings_edgar::{EdgarConfig, EdgarProvider};
use serde_json::json;
use tokio::sync::oneshot;

const AAPL: &str = include_str!("fixtures/aapl.xml");
const SINGLE: &str = include_str!("fixtures/single.xml");
const EMPTY: &str = include_str!("fixtures/empty.xml");

type Requests = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn atom(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/atom+xml")], body).into_response()
}

/// A feed with `n` entries, newest first.
fn long_feed(n: usize) -> String {
    let mut doc = String::from(
        "<feed><company-info><cik>0000000042</cik><conformed-name>Busy Filer</conformed-name></company-info>",
    );
    for i in 0..n {
        doc.push_str(&format!(
            "<entry><content><accession-nunber>0000000042-24-{:06}</accession-nunber><filing-type>4</filing-type></content></entry>",
            n - i
        ));
    }
    doc.push_str("</feed>");
    doc
}

async fn browse(
    State(requests): State<Requests>,
    Params(params): Params<HashMap<String, String>>,
) -> Response {
    requests.lock().unwrap().push(params.clone());
    match params.get("CIK").map(String::as_str) {
        Some("AAPL") => atom(AAPL.to_string()),
        Some("SINGLE") => atom(SINGLE.to_string()),
        Some("BUSY") => atom(long_feed(25)),
        Some("BROKEN") => atom(
            "<feed><company-info><cik>1</cik></company-info><entry><title>cut".to_string(),
        ),
        Some("HTML") => (
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>No matching Ticker Symbol.</body></html>",
        )
            .into_response(),
        Some("DOWN") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => atom(EMPTY.to_string()),
    }
}

async fn serve() -> (EdgarProvider, Requests) {
    let requests = Requests::default();
    let app = Router::new()
        .route("/cgi-bin/browse-edgar", get(browse))
        .with_state(Arc::clone(&requests));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = EdgarConfig::new("Test/1.0 (test@example.com)")
        .with_base_url(format!("http://{}", addr));
    (EdgarProvider::with_config(config), requests)
}

fn query(s: &str) -> Query {
    Query::new(s).unwrap()
}

#[tokio::test]
async fn test_company_info_full_profile() {
    let (provider, _) = serve().await;
    let info = provider.company_info(&query("AAPL")).await.unwrap();

    assert_eq!(info.conformed_name.as_deref(), Some("Apple Inc."));
    assert_eq!(info.cik.as_deref(), Some("0000320193"));
    assert_eq!(info.assigned_sic.as_deref(), Some("3571"));
    assert_eq!(info.assigned_sic_desc.as_deref(), Some("ELECTRONIC COMPUTERS"));
    assert_eq!(
        info.assigned_sic_href.as_deref(),
        Some("https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&SIC=3571&owner=include&count=40")
    );
    assert_eq!(info.fiscal_year_end.as_deref(), Some("0930"));
    assert_eq!(info.state_location.as_deref(), Some("CA"));
    assert_eq!(info.state_of_incorporation.as_deref(), Some("CA"));

    let Some(OneOrMany::Many(addresses)) = &info.addresses else {
        panic!("expected two addresses, got {:?}", info.addresses);
    };
    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[0].kind.as_deref(), Some("mailing"));
    assert_eq!(addresses[1].kind.as_deref(), Some("business"));
    assert_eq!(addresses[1].get("phone"), Some("(408) 996-1010"));

    let names: Vec<_> = info
        .formerly_names
        .as_ref()
        .unwrap()
        .iter()
        .map(|n| n.name().unwrap())
        .collect();
    assert_eq!(names, ["APPLE COMPUTER INC", "APPLE COMPUTER INC/ FA"]);
}

#[tokio::test]
async fn test_company_info_single_records_serialize_as_objects() {
    let (provider, _) = serve().await;
    let lookup = provider.lookup_company_info("SINGLE").await;
    let value = serde_json::to_value(&lookup).unwrap();

    assert_eq!(
        value["addresses"],
        json!({
            "type": "business",
            "city": "WILMINGTON",
            "state": "DE",
            "street1": "1 MARKET ST",
            "zip": "19801"
        })
    );
    assert_eq!(
        value["formerly_names"],
        json!({ "date": "2015-06-30", "name": "EXAMPLE HOLDINGS INC" })
    );
    assert!(value.get("assigned_sic").is_none());
    assert!(value.get("error").is_none());
}

#[tokio::test]
async fn test_company_info_requests_default_count() {
    let (provider, requests) = serve().await;
    provider.company_info(&query("AAPL")).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let params = &requests[0];
    assert_eq!(params["action"], "getcompany");
    assert_eq!(params["CIK"], "AAPL");
    assert_eq!(params["count"], "20");
    assert_eq!(params["owner"], "include");
    assert_eq!(params["output"], "atom");
}

#[tokio::test]
async fn test_filings_default_count() {
    let (provider, requests) = serve().await;
    let result = provider.filings(&query("AAPL"), None).await.unwrap();

    assert_eq!(requests.lock().unwrap()[0]["count"], "20");
    assert_eq!(result.info.conformed_name.as_deref(), Some("Apple Inc."));
    assert_eq!(result.info.cik.as_deref(), Some("0000320193"));
    assert!(result.info.cik_href.is_some());

    let accessions: Vec<_> = result
        .filings
        .iter()
        .map(|f| f.accession_number.as_deref().unwrap())
        .collect();
    assert_eq!(
        accessions,
        [
            "0000320193-23-000106",
            "0000320193-23-000104",
            "0000320193-23-000077"
        ]
    );

    let first = &result.filings[0];
    assert_eq!(first.filing_type.as_deref(), Some("10-K"));
    assert_eq!(first.categories, vec!["10-K".to_string()]);
    assert_eq!(
        first.guid.as_deref(),
        Some("urn:tag:sec.gov,2008:accession-number=0000320193-23-000106")
    );
    assert!(first.summary.as_deref().unwrap().starts_with("<b>Filed:</b> 2023-11-03"));
    assert!(first.link.as_deref().unwrap().ends_with("0000320193-23-000106-index.htm"));
}

#[tokio::test]
async fn test_filings_serialized_keys() {
    let (provider, _) = serve().await;
    let lookup = provider.lookup_filings("AAPL", Some(40)).await;
    let value = serde_json::to_value(&lookup).unwrap();

    let filing = &value["filings"][0];
    assert_eq!(filing["accession_no"], "0000320193-23-000106");
    assert_eq!(filing["filingType"], "10-K");
    assert_eq!(filing["formName"], "Annual report [Section 13 and 15(d), not S-K Item 405]");
    assert!(filing.get("accession-nunber").is_none());
    assert!(filing.get("accession_number").is_none());
    assert_eq!(value["info"]["cik"], "0000320193");
}

#[tokio::test]
async fn test_filings_capped_at_count() {
    let (provider, requests) = serve().await;

    let result = provider.filings(&query("BUSY"), None).await.unwrap();
    assert_eq!(result.filings.len(), 20);
    assert_eq!(
        result.filings[0].accession_number.as_deref(),
        Some("0000000042-24-000025")
    );

    let result = provider.filings(&query("BUSY"), Some(5)).await.unwrap();
    assert_eq!(result.filings.len(), 5);
    assert_eq!(requests.lock().unwrap()[1]["count"], "5");
}

#[tokio::test]
async fn test_unknown_company_is_error() {
    let (provider, _) = serve().await;

    let err = provider.company_info(&query("NOPE")).await.unwrap_err();
    assert!(matches!(err, DataError::UnknownCompany(q) if q == "NOPE"));

    let lookup = provider.lookup_company_info("NOPE").await;
    assert_eq!(
        serde_json::to_value(&lookup).unwrap(),
        json!({ "error": "There was an error pulling SEC data using ticker: NOPE" })
    );

    let lookup = provider.lookup_filings("NOPE", None).await;
    assert_eq!(
        lookup.error(),
        Some("There was an error pulling SEC data using ticker: NOPE")
    );
}

#[tokio::test]
async fn test_transport_and_parse_errors() {
    let (provider, _) = serve().await;

    let err = provider.company_info(&query("DOWN")).await.unwrap_err();
    assert!(matches!(err, DataError::Network(_)));

    let err = provider.company_info(&query("HTML")).await.unwrap_err();
    assert!(matches!(err, DataError::Parse(_)));

    // Metadata arrived before the feed broke off; the error still wins.
    let lookup = provider.lookup_filings("BROKEN", None).await;
    assert_eq!(
        serde_json::to_value(&lookup).unwrap(),
        json!({ "error": "There was an error pulling SEC data using ticker: BROKEN" })
    );
}

#[tokio::test]
async fn test_callback_fires_once_with_result() {
    let (provider, _) = serve().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel();

    let counter = Arc::clone(&calls);
    let handle = provider
        .get_filings("AAPL", None, move |lookup| {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(lookup);
        })
        .expect("lookup should be spawned");

    handle.await.unwrap();
    let lookup = rx.await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let Lookup::Found(result) = lookup else {
        panic!("expected filings");
    };
    assert!(result.filings.len() <= 20);
    assert_eq!(result.filings.len(), 3);
}

#[tokio::test]
async fn test_callback_reports_error_once() {
    let (provider, _) = serve().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel();

    let counter = Arc::clone(&calls);
    let handle = provider
        .get_company_info("HTML", move |lookup| {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(lookup);
        })
        .unwrap();

    handle.await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        rx.await.unwrap().error(),
        Some("There was an error pulling SEC data using ticker: HTML")
    );
}

#[tokio::test]
async fn test_blank_query_issues_no_request() {
    let (provider, requests) = serve().await;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let handle = provider.get_company_info("", move |lookup| {
        sink.lock().unwrap().push(lookup.error().map(str::to_owned));
    });
    assert!(handle.is_none());

    let sink = Arc::clone(&seen);
    let handle = provider.get_filings("", Some(40), move |lookup| {
        sink.lock().unwrap().push(lookup.error().map(str::to_owned));
    });
    assert!(handle.is_none());

    // Both callbacks already ran on this thread.
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Some(COMPANY_INFO_QUERY_ERROR.to_string()),
            Some(FILINGS_QUERY_ERROR.to_string())
        ]
    );
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_lookups_are_independent() {
    let (provider, requests) = serve().await;
    let (aapl, single) = tokio::join!(
        provider.lookup_company_info("AAPL"),
        provider.lookup_company_info("SINGLE")
    );

    assert_eq!(
        aapl.found().unwrap().conformed_name.as_deref(),
        Some("Apple Inc.")
    );
    assert_eq!(
        single.found().unwrap().conformed_name.as_deref(),
        Some("Example Holdings Corp")
    );
    assert_eq!(requests.lock().unwrap().len(), 2);
}
