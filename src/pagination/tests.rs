//! Tests for pagination module

use super::*;
use crate::client::{Client, EntityApi};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::test_support::{records, standard_query_of, MockTransport};
use crate::types::{JsonObject, JsonValue};
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn client() -> Client<MockTransport> {
    let config = ClientConfig::builder().api_key("key").build().unwrap();
    Client::with_transport(config, MockTransport::new())
}

fn object(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn ids(values: &[JsonValue]) -> Vec<u64> {
    values.iter().map(|v| v["id"].as_u64().unwrap()).collect()
}

// ============================================================================
// PageCursor Tests
// ============================================================================

#[test]
fn test_page_cursor_default() {
    let cursor = PageCursor::new();
    assert_eq!(cursor.offset, 0);
    assert_eq!(cursor.total_fetched, 0);
    assert!(!cursor.done);
}

#[test]
fn test_page_cursor_full_page_continues() {
    let mut cursor = PageCursor::new();
    assert_eq!(cursor.process_page(500), NextPage::Continue { offset: 500 });
    assert_eq!(cursor.process_page(500), NextPage::Continue { offset: 1000 });
    assert_eq!(cursor.total_fetched, 1000);
    assert!(!cursor.done);
}

#[test_case(0 ; "empty page")]
#[test_case(1 ; "single record")]
#[test_case(499 ; "one short")]
#[test_case(501 ; "oversized page")]
fn test_page_cursor_other_lengths_stop(count: usize) {
    let mut cursor = PageCursor::new();
    assert!(cursor.process_page(count).is_done());
    assert!(cursor.done);
    assert_eq!(cursor.offset, 0);
}

#[test]
fn test_page_cursor_apply_overrides_limit() {
    let mut cursor = PageCursor::new();
    cursor.process_page(500);

    let mut params = object(json!({"status": "open", "limit": 10}));
    cursor.apply(&mut params);

    assert_eq!(
        JsonValue::Object(params),
        json!({"status": "open", "limit": 500, "offset": 500})
    );
}

// ============================================================================
// HistoryLabel Tests
// ============================================================================

#[test]
fn test_history_label_from_str() {
    assert_eq!(HistoryLabel::from("now"), HistoryLabel::Now);
    assert_eq!(
        HistoryLabel::from("2020-01-01"),
        HistoryLabel::At("2020-01-01".to_string())
    );
    assert_eq!(HistoryLabel::Now.history_param(), None);
    assert_eq!(HistoryLabel::from("2020-01-01").history_param(), Some("2020-01-01"));
}

#[test]
fn test_history_label_from_dates() {
    let date = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
    assert_eq!(HistoryLabel::from(date).as_str(), "2021-03-04");

    let at = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
    assert_eq!(HistoryLabel::from(at).as_str(), "2021-03-04T05:06:07Z");
}

// ============================================================================
// find_all Tests
// ============================================================================

#[tokio::test]
async fn test_find_all_three_pages() {
    let client = client();
    client
        .transport()
        .push_json(records(0, 500))
        .push_json(records(500, 500))
        .push_json(records(1000, 317));

    let result = client
        .find_all("customer", &object(json!({"status": "active"})))
        .await
        .unwrap();

    assert_eq!(result.len(), 1317);
    assert_eq!(ids(&result), (0..1317).collect::<Vec<_>>());

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 3);
    for (request, offset) in requests.iter().zip([0, 500, 1000]) {
        assert_eq!(
            standard_query_of(request),
            json!({"filter": {"status": "active"}, "limit": 500, "offset": offset})
        );
    }
}

#[tokio::test]
async fn test_find_all_short_page_stops() {
    let client = client();
    client.transport().push_json(records(0, 317));

    let result = client.find_all("customer", &JsonObject::new()).await.unwrap();

    assert_eq!(result.len(), 317);
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test]
async fn test_find_all_exact_page_needs_one_more_request() {
    let client = client();
    client
        .transport()
        .push_json(records(0, 500))
        .push_json(json!([]));

    let result = client.find_all("customer", &JsonObject::new()).await.unwrap();

    assert_eq!(result.len(), 500);
    assert_eq!(client.transport().requests().len(), 2);
}

#[tokio::test]
async fn test_find_all_does_not_mutate_params() {
    let client = client();
    client.transport().push_json(records(0, 2));

    let params = object(json!({"status": "active", "limit": 3}));
    client.find_all("customer", &params).await.unwrap();

    assert_eq!(params, object(json!({"status": "active", "limit": 3})));
}

#[test_case(0 ; "no limit")]
#[test_case(1 ; "limit one")]
#[test_case(500 ; "page sized limit")]
#[tokio::test]
async fn test_find_all_denied_entity_sends_nothing(limit: u64) {
    let client = client();

    let err = client
        .find_all("me", &object(json!({ "limit": limit })))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EntityNotAllowed { .. }));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_find_all_error_discards_pages() {
    let client = client();
    client
        .transport()
        .push_json(records(0, 500))
        .push_error(Error::api(500, json!({"error": "boom"})));

    let err = client.find_all("customer", &JsonObject::new()).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(client.transport().requests().len(), 2);
}

#[tokio::test]
async fn test_find_all_rejects_non_list_page() {
    let client = client();
    client.transport().push_json(json!({"id": 1}));

    let err = client.find_all("customer", &JsonObject::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse { .. }));
}

// ============================================================================
// find_with_history Tests
// ============================================================================

#[tokio::test]
async fn test_find_with_history_annotates_each_record() {
    let client = client();
    client
        .transport()
        .push_json(json!([{"id": 1, "mrr": 10}, {"id": 2, "mrr": 20}]))
        .push_json(json!([{"id": 2, "mrr": 15}, {"id": 1, "mrr": 5}]))
        .push_json(json!([{"id": 1, "mrr": 10}, {"id": 2, "mrr": 20}]));

    let labels = [HistoryLabel::from("2020-01-01"), HistoryLabel::Now];
    let result = client
        .find_with_history("customer", &object(json!({"status": "active"})), &labels)
        .await
        .unwrap();

    assert_eq!(
        result,
        vec![
            json!({"id": 1, "mrr": 10, "history": {
                "2020-01-01": {"id": 1, "mrr": 5},
                "now": {"id": 1, "mrr": 10},
            }}),
            json!({"id": 2, "mrr": 20, "history": {
                "2020-01-01": {"id": 2, "mrr": 15},
                "now": {"id": 2, "mrr": 20},
            }}),
        ]
    );

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        standard_query_of(&requests[0]),
        json!({"filter": {"status": "active"}})
    );
    assert_eq!(
        standard_query_of(&requests[1]),
        json!({"filter": {"id": [1, 2]}, "history": "2020-01-01"})
    );
    assert_eq!(standard_query_of(&requests[2]), json!({"filter": {"id": [1, 2]}}));
}

#[tokio::test]
async fn test_find_with_history_missing_snapshot() {
    let client = client();
    client
        .transport()
        .push_json(json!([{"id": 1}, {"id": 2}]))
        .push_json(json!([{"id": 1, "v": "old"}]));

    let result = client
        .find_with_history("customer", &JsonObject::new(), &[HistoryLabel::from("2019")])
        .await
        .unwrap();

    assert_eq!(result[0]["history"], json!({"2019": {"id": 1, "v": "old"}}));
    assert_eq!(result[1]["history"], json!({}));
}

#[tokio::test]
async fn test_find_with_history_empty_base_skips_labels() {
    let client = client();
    client.transport().push_json(json!([]));

    let result = client
        .find_with_history("customer", &JsonObject::new(), &[HistoryLabel::Now])
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test]
async fn test_find_with_history_wrong_entity() {
    let client = client();

    let err = client
        .find_with_history("user", &JsonObject::new(), &[HistoryLabel::Now])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EntityNotAllowed { .. }));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_find_with_history_requires_labels() {
    let client = client();

    let err = client
        .find_with_history("customer", &JsonObject::new(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingHistory));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_find_with_history_error_aborts() {
    let client = client();
    client
        .transport()
        .push_json(json!([{"id": 1}]))
        .push_error(Error::api(403, JsonValue::Null));

    let err = client
        .find_with_history(
            "customer",
            &JsonObject::new(),
            &[HistoryLabel::from("2020-01-01"), HistoryLabel::Now],
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert_eq!(client.transport().requests().len(), 2);
}
