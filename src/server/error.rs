//! Error-to-HTTP response conversion.
//!
//! Every lookup failure is answered with HTTP 200 and `{"error": "<reason>"}`;
//! clients tell success from failure by the presence of the `error` key.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::fetch::UpstreamError;
use crate::pipeline::{MovieLookupError, ShowLookupError};
use crate::skiptimes::SkipTimesError;

/// Failure of the raw `/tmdb/*path` proxy.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PassthroughError {
    #[error("Failed to fetch data from TMDB API")]
    Fetch,

    #[error("Failed to decode TMDB response")]
    Decode,
}

impl From<UpstreamError> for PassthroughError {
    fn from(e: UpstreamError) -> Self {
        if e.is_missing() {
            Self::Fetch
        } else {
            Self::Decode
        }
    }
}

pub fn error_response(err: &dyn std::error::Error) -> Response {
    tracing::warn!(error = %err, "request failed");
    (StatusCode::OK, axum::Json(json!({ "error": err.to_string() }))).into_response()
}

impl IntoResponse for MovieLookupError {
    fn into_response(self) -> Response {
        if let Some(source) = std::error::Error::source(&self) {
            tracing::debug!(cause = %source, "movie lookup failure cause");
        }
        error_response(&self)
    }
}

impl IntoResponse for ShowLookupError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

impl IntoResponse for SkipTimesError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

impl IntoResponse for PassthroughError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn lookup_errors_are_200_with_error_key() {
        let response = MovieLookupError::NoMatch.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"error": "No matching movie found"})
        );
    }

    #[tokio::test]
    async fn skip_time_errors_are_json() {
        let response = SkipTimesError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Intro or Outro times not found"})
        );
    }

    #[test]
    fn passthrough_error_from_upstream() {
        assert_eq!(
            PassthroughError::from(UpstreamError::Empty),
            PassthroughError::Fetch
        );
    }
}
