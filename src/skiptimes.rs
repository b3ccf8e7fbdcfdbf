//! Intro/outro skip times rendered as WebVTT chapters.

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::config::SkipTimesConfig;
use crate::fetch::{join_segments, Fetcher};

/// Start and end of a skippable segment, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipTimes {
    pub intro: Segment,
    pub outro: Segment,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkipTimesError {
    #[error("Skip times must be requested as <episodeId>.vtt")]
    BadPath,

    #[error("Failed to fetch data from Zoro API")]
    Fetch,

    #[error("Invalid API response")]
    InvalidResponse,

    #[error("Intro or Outro times not found")]
    NotFound,
}

pub struct SkipTimesClient {
    fetcher: Fetcher,
    config: SkipTimesConfig,
}

impl SkipTimesClient {
    pub fn new(fetcher: Fetcher, config: &SkipTimesConfig) -> Self {
        Self {
            fetcher,
            config: config.clone(),
        }
    }

    fn url(&self, episode_id: &str) -> Option<Url> {
        let mut url = join_segments(&self.config.base_url, ["episode", "sources"]).ok()?;
        url.query_pairs_mut()
            .append_pair("animeEpisodeId", episode_id)
            .append_pair("server", &self.config.server)
            .append_pair("category", &self.config.category);
        Some(url)
    }

    /// Fetch skip times for `file`, which must be `<episodeId>.vtt`.
    pub async fn vtt_for(&self, file: &str) -> Result<String, SkipTimesError> {
        let episode_id = file
            .strip_suffix(".vtt")
            .filter(|id| !id.is_empty())
            .ok_or(SkipTimesError::BadPath)?;
        debug!(episode_id, "fetching skip times");

        let url = self.url(episode_id).ok_or(SkipTimesError::Fetch)?;
        let body = self
            .fetcher
            .get_json(&url)
            .await
            .map_err(|_| SkipTimesError::Fetch)?;

        Ok(to_vtt(&parse_skip_times(&body)?))
    }
}

/// Validate a sources response and pull out intro and outro.
pub fn parse_skip_times(body: &Value) -> Result<SkipTimes, SkipTimesError> {
    let success = body.get("success").is_some_and(truthy);
    let data = body
        .get("data")
        .filter(|d| truthy(d))
        .ok_or(SkipTimesError::InvalidResponse)?;
    if !success {
        return Err(SkipTimesError::InvalidResponse);
    }

    let intro = data.get("intro").and_then(segment);
    let outro = data.get("outro").and_then(segment);
    match (intro, outro) {
        (Some(intro), Some(outro)) => Ok(SkipTimes { intro, outro }),
        _ => Err(SkipTimesError::NotFound),
    }
}

fn segment(v: &Value) -> Option<Segment> {
    let seconds = |key: &str| {
        v.get(key)
            .and_then(Value::as_f64)
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s as u64)
    };
    Some(Segment {
        start: seconds("start")?,
        end: seconds("end")?,
    })
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `MM:SS`, minutes not wrapped at the hour.
pub fn format_timestamp(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn to_vtt(times: &SkipTimes) -> String {
    format!(
        "WEBVTT\n\n{} --> {}\nOpening\n\n{} --> {}\nOutro\n",
        format_timestamp(times.intro.start),
        format_timestamp(times.intro.end),
        format_timestamp(times.outro.start),
        format_timestamp(times.outro.end),
    )
}
