//! Raw TMDB proxy under `/tmdb/*path`.

mod common;

use common::{TestHarness, API_KEY, TMDB_PREFIX};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn forwards_path_and_params_with_configured_key() {
    let h = TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path(format!("{TMDB_PREFIX}/search/movie")))
        .and(query_param("api_key", API_KEY))
        .and(query_param("query", "the matrix"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 2, "results": []})))
        .expect(1)
        .mount(&h.upstream)
        .await;

    let json = h
        .get_json("/tmdb/search/movie?query=the%20matrix&page=2&api_key=stolen")
        .await;
    assert_eq!(json, json!({"page": 2, "results": []}));
}

#[tokio::test]
async fn tmdb_error_bodies_pass_through() {
    let h = TestHarness::new().await;
    let body = json!({"status_code": 34, "status_message": "Not found"});
    Mock::given(method("GET"))
        .and(path(format!("{TMDB_PREFIX}/movie/0")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&h.upstream)
        .await;

    assert_eq!(h.get_json("/tmdb/movie/0").await, body);
}

#[tokio::test]
async fn upstream_failure() {
    let h = TestHarness::new().await;
    let json = h.get_json("/tmdb/configuration").await;
    assert_eq!(json, json!({"error": "Failed to fetch data from TMDB API"}));
}

#[tokio::test]
async fn upstream_garbage() {
    let h = TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path(format!("{TMDB_PREFIX}/configuration")))
        .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
        .mount(&h.upstream)
        .await;

    let json = h.get_json("/tmdb/configuration").await;
    assert_eq!(json, json!({"error": "Failed to decode TMDB response"}));
}
