//! TMDB → aggregator lookup chains.
//!
//! Every step is a hard gate: the first failure ends the lookup with a
//! [`MovieLookupError`] or [`ShowLookupError`]. Steps run one after another;
//! each needs the output of the previous one.

mod error;

pub use error::{MovieLookupError, ShowLookupError};

use error::classify;
use serde_json::{json, Value};
use tracing::info;

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::metadata::TmdbClient;
use crate::streams::{
    extract_episode_id, find_episode, find_movie, find_show, matching::param_value,
    StreamCandidate, StreamsClient,
};

/// Query string of `/fetch_movie_data`.
#[derive(Debug, Clone, Default)]
pub struct MovieQuery {
    pub tmdb_id: Option<String>,
}

impl MovieQuery {
    /// Build from raw query pairs; a repeated key keeps its first value.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            tmdb_id: first_value(pairs, "tmdb_id"),
        }
    }
}

/// Query string of `/tv_shows/fetch_tv_show_data`.
#[derive(Debug, Clone, Default)]
pub struct EpisodeQuery {
    pub tmdb_id: Option<String>,
    /// Season number
    pub s: Option<String>,
    /// Episode number within the season
    pub e: Option<String>,
}

impl EpisodeQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            tmdb_id: first_value(pairs, "tmdb_id"),
            s: first_value(pairs, "s"),
            e: first_value(pairs, "e"),
        }
    }
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Resolves TMDB IDs to playback payloads.
pub struct Resolver {
    tmdb: TmdbClient,
    streams: StreamsClient,
}

impl Resolver {
    pub fn new(tmdb: TmdbClient, streams: StreamsClient) -> Self {
        Self { tmdb, streams }
    }

    /// Build both upstream clients on one shared [`Fetcher`].
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = Fetcher::from_config(config)?;
        Ok(Self::new(
            TmdbClient::new(fetcher.clone(), &config.tmdb),
            StreamsClient::new(fetcher, &config.streams),
        ))
    }

    pub fn tmdb(&self) -> &TmdbClient {
        &self.tmdb
    }

    /// Movie lookup: metadata, search, match, episode ID, watch + info, merge.
    pub async fn resolve_movie(&self, query: &MovieQuery) -> Result<Value, MovieLookupError> {
        let tmdb_id = present(&query.tmdb_id).ok_or(MovieLookupError::MissingId)?;

        let movie = self.tmdb.movie(tmdb_id).await?;

        let page = self.streams.search(&movie.title).await.map_err(|e| {
            classify(&e, MovieLookupError::SearchFetch, MovieLookupError::SearchDecode)
        })?;
        let candidates =
            StreamCandidate::parse_results(&page).ok_or(MovieLookupError::NoResults)?;

        let candidate = find_movie(&candidates, &movie).ok_or(MovieLookupError::NoMatch)?;
        let media_id = candidate.id.as_str();
        let episode_id = extract_episode_id(media_id)?;

        // A malformed watch body is only reported once info has been checked.
        let watch = match self.streams.watch(episode_id.as_str(), media_id).await {
            Err(e) if e.is_missing() => return Err(MovieLookupError::WatchFetch),
            other => other,
        };

        let details = self.streams.info(media_id).await.map_err(|e| {
            classify(&e, MovieLookupError::InfoFetch, MovieLookupError::InfoDecode)
        })?;
        let info = movie_info(&details).ok_or(MovieLookupError::NoInfo)?;

        let Ok(Value::Object(mut payload)) = watch else {
            return Err(MovieLookupError::WatchDecode);
        };
        payload.insert("info".to_string(), info);

        info!(tmdb_id, media_id, episode_id = %episode_id, "resolved movie");
        Ok(Value::Object(payload))
    }

    /// TV lookup: metadata, search, match, show info, episode, watch.
    pub async fn resolve_episode(&self, query: &EpisodeQuery) -> Result<Value, ShowLookupError> {
        let (Some(tmdb_id), Some(season), Some(number)) =
            (present(&query.tmdb_id), present(&query.s), present(&query.e))
        else {
            return Err(ShowLookupError::MissingParams);
        };

        let show = self.tmdb.tv_show(tmdb_id).await?;

        let page = self.streams.search(&show.name).await.map_err(|e| {
            classify(&e, ShowLookupError::SearchFetch, ShowLookupError::SearchDecode)
        })?;
        let candidates = StreamCandidate::parse_results(&page).ok_or(ShowLookupError::NoResults)?;
        let candidate = find_show(&candidates, &show).ok_or(ShowLookupError::NoMatch)?;
        let media_id = candidate.id.as_str();

        let details = self.streams.info(media_id).await.map_err(|e| {
            classify(&e, ShowLookupError::InfoFetch, ShowLookupError::InfoDecode)
        })?;
        let episode = find_episode(&details, season, number).ok_or(ShowLookupError::NoEpisode)?;
        let episode_id = param_value(&episode.id).ok_or(ShowLookupError::NoEpisode)?;

        let watch = self
            .streams
            .watch(&episode_id, media_id)
            .await
            .map_err(|e| {
                classify(&e, ShowLookupError::WatchFetch, ShowLookupError::WatchDecode)
            })?;
        let Value::Object(mut payload) = watch else {
            return Err(ShowLookupError::WatchDecode);
        };
        // An untitled episode leaves the key out rather than sending null.
        if !episode.title.is_null() {
            payload.insert("episode_title".to_string(), episode.title);
        }

        info!(tmdb_id, media_id, episode_id, "resolved episode");
        Ok(Value::Object(payload))
    }
}

/// `{"title", "cover"}` from an info payload; both keys must be present.
fn movie_info(details: &Value) -> Option<Value> {
    let details = details.as_object()?;
    let title = details.get("title")?;
    let cover = details.get("cover")?;
    Some(json!({ "title": title, "cover": cover }))
}

/// A query parameter that is set and non-empty.
fn present(param: &Option<String>) -> Option<&str> {
    param.as_deref().filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_requires_title_and_cover_keys() {
        assert_eq!(
            movie_info(&json!({"title": "X", "cover": "url", "rating": 7})),
            Some(json!({"title": "X", "cover": "url"}))
        );
        assert_eq!(movie_info(&json!({"title": "X"})), None);
        assert_eq!(movie_info(&json!(["title", "cover"])), None);
    }

    #[test]
    fn info_keeps_null_values() {
        assert_eq!(
            movie_info(&json!({"title": "X", "cover": null})),
            Some(json!({"title": "X", "cover": null}))
        );
    }

    #[test]
    fn empty_params_count_as_missing() {
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some("603".into())), Some("603"));
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_params_keep_first_value() {
        let query = MovieQuery::from_pairs(&pairs(&[("tmdb_id", "42"), ("tmdb_id", "43")]));
        assert_eq!(query.tmdb_id.as_deref(), Some("42"));

        let query = EpisodeQuery::from_pairs(&pairs(&[
            ("e", "2"),
            ("tmdb_id", "1396"),
            ("s", "1"),
            ("e", "9"),
        ]));
        assert_eq!(query.tmdb_id.as_deref(), Some("1396"));
        assert_eq!(query.s.as_deref(), Some("1"));
        assert_eq!(query.e.as_deref(), Some("2"));
        assert_eq!(EpisodeQuery::from_pairs(&[]).s, None);
    }
}
