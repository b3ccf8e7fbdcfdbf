//! TMDB (The Movie Database) v3 client.
//!
//! Only the fields the lookup pipelines need are extracted; everything goes
//! through the shared retrying [`Fetcher`]. A body carrying `status_code` is
//! TMDB's error shape and is surfaced as [`TmdbError::Rejected`].

use reqwest::Url;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::TmdbConfig;
use crate::fetch::{join_segments, FetchError, Fetcher, UpstreamError};

/// Title and release year of a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieMetadata {
    pub title: String,
    /// Year part of `release_date`; empty when TMDB has no date.
    pub release_year: String,
}

/// Name and season count of a TV show.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowMetadata {
    pub name: String,
    /// Raw `number_of_seasons` value, compared loosely against search results.
    pub number_of_seasons: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("TMDB rejected the request (status_code {status_code})")]
    Rejected { status_code: Value },

    #[error("TMDB response has no `{0}` field")]
    MissingField(&'static str),
}

impl From<FetchError> for TmdbError {
    fn from(e: FetchError) -> Self {
        Self::Upstream(UpstreamError::Fetch(e))
    }
}

pub struct TmdbClient {
    fetcher: Fetcher,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(fetcher: Fetcher, config: &TmdbConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Returns `true` when an API key has been configured.
    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Build a full API URL with the API key as the first query parameter.
    fn url<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
        extra_params: &[(String, String)],
    ) -> Result<Url, FetchError> {
        let mut url = join_segments(&self.base_url, segments)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            for (key, value) in extra_params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_object(&self, url: &Url) -> Result<Map<String, Value>, TmdbError> {
        let body = self.fetcher.get_json(url).await?;
        let Value::Object(body) = body else {
            return Ok(Map::new());
        };

        if let Some(status_code) = body.get("status_code") {
            return Err(TmdbError::Rejected {
                status_code: status_code.clone(),
            });
        }
        Ok(body)
    }

    /// Fetch `/movie/{id}` and extract title and release year.
    pub async fn movie(&self, tmdb_id: &str) -> Result<MovieMetadata, TmdbError> {
        let url = self.url(["movie", tmdb_id], &[])?;
        debug!(tmdb_id, "TMDB get movie");

        let body = self.get_object(&url).await?;
        let title = body
            .get("title")
            .and_then(Value::as_str)
            .ok_or(TmdbError::MissingField("title"))?;

        Ok(MovieMetadata {
            title: title.to_string(),
            release_year: release_year(body.get("release_date").and_then(Value::as_str)),
        })
    }

    /// Fetch `/tv/{id}` and extract name and season count.
    pub async fn tv_show(&self, tmdb_id: &str) -> Result<ShowMetadata, TmdbError> {
        let url = self.url(["tv", tmdb_id], &[])?;
        debug!(tmdb_id, "TMDB get TV show");

        let body = self.get_object(&url).await?;
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .ok_or(TmdbError::MissingField("name"))?;

        Ok(ShowMetadata {
            name: name.to_string(),
            number_of_seasons: body.get("number_of_seasons").cloned().unwrap_or(Value::Null),
        })
    }

    /// Fetch an arbitrary API path and return the JSON body untouched.
    ///
    /// A caller-supplied `api_key` parameter is dropped in favour of the
    /// configured one.
    pub async fn passthrough(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        let params: Vec<(String, String)> = params
            .iter()
            .filter(|(key, _)| key != "api_key")
            .cloned()
            .collect();
        let url = self.url(path.split('/').filter(|s| !s.is_empty()), &params)?;
        debug!(path, "TMDB passthrough");

        self.fetcher.get_json(&url).await
    }
}

/// Year part of a TMDB date such as `"2023-04-15"`. Missing dates give `""`.
pub fn release_year(date: Option<&str>) -> String {
    date.and_then(|d| d.split('-').next())
        .unwrap_or_default()
        .to_string()
}
