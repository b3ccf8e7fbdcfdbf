//! Candidate selection over aggregator search results and show episode lists.
//!
//! Matching is exact and first-wins: results are scanned in the order the
//! aggregator returned them.

use serde::Deserialize;
use serde_json::Value;

use crate::metadata::{MovieMetadata, ShowMetadata};

pub const MOVIE_TYPE: &str = "Movie";
pub const TV_SERIES_TYPE: &str = "TV Series";

/// One entry of an aggregator search page.
///
/// Entries without a string `id`, `title` and `type` can never match and are
/// skipped when the page is parsed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StreamCandidate {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<Value>,
    #[serde(default)]
    pub seasons: Option<Value>,
}

impl StreamCandidate {
    /// Parse the `results` array of a search page. `None` when the page has
    /// no `results` array at all.
    pub fn parse_results(page: &Value) -> Option<Vec<StreamCandidate>> {
        let results = page.get("results")?.as_array()?;
        Some(
            results
                .iter()
                .filter_map(|r| StreamCandidate::deserialize(r).ok())
                .collect(),
        )
    }
}

/// First movie whose type, title and release year equal the metadata exactly.
pub fn find_movie<'a>(
    candidates: &'a [StreamCandidate],
    movie: &MovieMetadata,
) -> Option<&'a StreamCandidate> {
    candidates.iter().find(|c| {
        c.kind == MOVIE_TYPE
            && c.title == movie.title
            && c.release_date.as_ref().and_then(Value::as_str) == Some(movie.release_year.as_str())
    })
}

/// First TV series with the same title and a season count loosely equal to
/// TMDB's.
pub fn find_show<'a>(
    candidates: &'a [StreamCandidate],
    show: &ShowMetadata,
) -> Option<&'a StreamCandidate> {
    candidates.iter().find(|c| {
        c.kind == TV_SERIES_TYPE
            && c.title == show.name
            && c
                .seasons
                .as_ref()
                .is_some_and(|s| loose_eq(s, &show.number_of_seasons))
    })
}

/// An episode from a show's info payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ShowEpisode {
    pub id: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub season: Value,
    #[serde(default)]
    pub number: Value,
}

/// First entry of `info.episodes` whose season and number match the request.
pub fn find_episode(info: &Value, season: &str, episode: &str) -> Option<ShowEpisode> {
    let season = Value::String(season.to_string());
    let episode = Value::String(episode.to_string());

    info.get("episodes")?
        .as_array()?
        .iter()
        .filter_map(|e| ShowEpisode::deserialize(e).ok())
        .find(|e| loose_eq(&e.season, &season) && loose_eq(&e.number, &episode))
}

/// Equality that treats numbers and numeric strings as the same value, so
/// `3`, `3.0` and `"3"` all compare equal. Two strings compare exactly.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        (Value::Bool(x), Value::Bool(y)) => x == y,
        _ => false,
    }
}

/// Render a JSON scalar as a query parameter value.
pub fn param_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
