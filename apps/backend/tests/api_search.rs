//! Search API tests.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::fixtures;
use common::TestContext;

/// Tamil L2 search fills the shortfall with an unmatched item.
#[tokio::test]
async fn test_search_tamil_level_two() {
    let ctx = TestContext::new(fixtures::tamil_words());
    let server = ctx.server();

    let response = server
        .post("/v1/content/search")
        .json(&fixtures::search_request(&["க", "ச"], "ta", "Word", 4, "L2"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 4);

    let matched = items
        .iter()
        .filter(|i| !i["matchedChar"].as_array().unwrap().is_empty())
        .count();
    assert_eq!(matched, 3);

    assert_eq!(body["contentForToken"]["க"].as_array().unwrap().len(), 2);
    assert_eq!(body["contentForToken"]["ச"].as_array().unwrap().len(), 1);
    assert_eq!(body["stages"][0], "full");
    assert_eq!(body["truncated"], false);
}

/// English search maps phonemes to grapheme spellings.
#[tokio::test]
async fn test_search_english_graphemes() {
    let ctx = TestContext::new(vec![
        fixtures::english_word("cat", 2, &["k", "æ", "t"]),
        fixtures::english_word("sun", 2, &["s", "ʌ", "n"]),
        fixtures::english_word("dog", 2, &["d", "ɒ", "g"]),
    ]);
    let server = ctx.server();

    let response = server
        .post("/v1/content/search")
        .json(&json!({
            "tokenArr": ["k", "s"],
            "language": "en",
            "contentType": "Word",
            "limit": 2,
            "graphemesMappedObj": { "k": ["c", "k"], "s": ["s"] }
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let for_k = body["contentForToken"]["k"].as_array().unwrap();
    assert_eq!(for_k.len(), 1);
    assert_eq!(for_k[0]["name"], "cat");
    assert_eq!(for_k[0]["matchedChar"], json!(["c", "k"]));
}

/// Every requested token is a key of the partition.
#[tokio::test]
async fn test_search_partitions_every_token() {
    let ctx = TestContext::new(fixtures::tamil_words());
    let server = ctx.server();

    let response = server
        .post("/v1/content/search")
        .json(&fixtures::search_request(&["க", "ஞ"], "ta", "Word", 2, ""))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["contentForToken"]["ஞ"].as_array().unwrap().is_empty());
    assert!(!body["contentForToken"]["க"].as_array().unwrap().is_empty());
}

/// An expired deadline returns what was collected instead of failing.
#[tokio::test]
async fn test_search_deadline_truncates() {
    let ctx = TestContext::with_timeout(fixtures::tamil_words(), Some(Duration::ZERO));
    let server = ctx.server();

    let response = server
        .post("/v1/content/search")
        .json(&fixtures::search_request(&["க"], "ta", "Word", 3, "L2"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["truncated"], true);
}

/// Unknown level label is a bad request.
#[tokio::test]
async fn test_search_unknown_level() {
    let ctx = TestContext::new(fixtures::tamil_words());
    let server = ctx.server();

    let response = server
        .post("/v1/content/search")
        .json(&fixtures::search_request(&["க"], "ta", "Word", 3, "L9"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "bad_request");
}

/// Limits above the maximum are rejected.
#[tokio::test]
async fn test_search_limit_too_large() {
    let ctx = TestContext::new(Vec::new());
    let server = ctx.server();

    let response = server
        .post("/v1/content/search")
        .json(&fixtures::search_request(&["க"], "ta", "Word", 1000, ""))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Filter search applies exact ranges without padding.
#[tokio::test]
async fn test_filter_search_exact_range() {
    let ctx = TestContext::new(vec![
        fixtures::scored_word("கடல்", 3, 2.0, 10.0),
        fixtures::scored_word("மலர்", 3, 8.0, 40.0),
        fixtures::scored_word("வீடு", 2, 0.0, 5.0),
        fixtures::scored_word("பள்ளிக்கூடம்", 5, 12.0, 80.0),
        fixtures::scored_word("ஆசிரியர்", 4, 20.0, 120.0),
    ]);
    let server = ctx.server();

    let response = server
        .post("/v1/content/filter")
        .json(&json!({
            "language": "ta",
            "contentType": "Word",
            "limit": 5,
            "totalOrthoComplexity": { "$gte": 0, "$lte": 8 }
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}
