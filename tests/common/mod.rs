//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which starts a [`MockServer`] standing in for
//! TMDB, the streaming aggregator and the skip-times API, and builds a
//! [`Config`] pointing every upstream at it. Requests go through the full
//! router via `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flixbridge::config::Config;
use flixbridge::server::{create_router, AppContext};

pub const API_KEY: &str = "test-key";
pub const TMDB_PREFIX: &str = "/3";
pub const STREAMS_PREFIX: &str = "/movies/flixhq";
pub const SKIPTIMES_PREFIX: &str = "/api/v2/hianime";

pub struct TestHarness {
    pub upstream: MockServer,
    pub config: Config,
}

impl TestHarness {
    /// Start a mock upstream and a config with zero retry delay.
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let uri = upstream.uri();

        let mut config = Config::default();
        config.tmdb.base_url = format!("{uri}{TMDB_PREFIX}");
        config.tmdb.api_key = API_KEY.to_string();
        config.streams.base_url = format!("{uri}{STREAMS_PREFIX}");
        config.skiptimes.base_url = format!("{uri}{SKIPTIMES_PREFIX}");
        config.retry.delay_ms = 0;

        Self { upstream, config }
    }

    pub fn router(&self) -> Router {
        create_router(AppContext::new(self.config.clone()).unwrap())
    }

    /// Send a GET through the router and return status and body text.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.get_with(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// GET through the router, asserting HTTP 200, and parse the JSON body.
    pub async fn get_json(&self, uri: &str) -> Value {
        let (status, body) = self.get(uri).await;
        assert_eq!(status, StatusCode::OK, "unexpected status, body: {body}");
        serde_json::from_str(&body).unwrap()
    }

    /// Serve the router on a random port, for tests that need a real socket.
    pub async fn serve(&self) -> SocketAddr {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    // -----------------------------------------------------------------------
    // Upstream mocks
    // -----------------------------------------------------------------------

    pub async fn mock_tmdb_movie(&self, tmdb_id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{TMDB_PREFIX}/movie/{tmdb_id}")))
            .and(query_param("api_key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.upstream)
            .await;
    }

    pub async fn mock_tmdb_tv(&self, tmdb_id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{TMDB_PREFIX}/tv/{tmdb_id}")))
            .and(query_param("api_key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.upstream)
            .await;
    }

    /// `encoded_title` is the percent-encoded path segment.
    pub async fn mock_search(&self, encoded_title: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{STREAMS_PREFIX}/{encoded_title}")))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.upstream)
            .await;
    }

    pub async fn mock_info(&self, media_id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{STREAMS_PREFIX}/info")))
            .and(query_param("id", media_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.upstream)
            .await;
    }

    pub async fn mock_watch(&self, episode_id: &str, media_id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{STREAMS_PREFIX}/watch")))
            .and(query_param("episodeId", episode_id))
            .and(query_param("mediaId", media_id))
            .and(query_param("server", "upcloud"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.upstream)
            .await;
    }

    /// Respond to `route` (relative to the aggregator prefix) with a raw body.
    pub async fn mock_streams_raw(&self, route: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{STREAMS_PREFIX}/{route}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.upstream)
            .await;
    }
}
