//! Episode ID extraction from aggregator media IDs.
//!
//! Media IDs look like `movie/watch-the-matrix-19724`; the trailing number is
//! the episode ID the watch endpoint expects.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static WATCH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/watch-(.*?)-(\d+)$").expect("valid regex"));

/// Numeric episode identifier, kept as text to preserve leading zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeId(String);

impl EpisodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("media ID {media_id:?} does not end in /watch-<slug>-<digits>")]
pub struct EpisodeIdError {
    pub media_id: String,
}

/// Extract the trailing digits of a `/watch-<slug>-<digits>` media ID.
pub fn extract_episode_id(media_id: &str) -> Result<EpisodeId, EpisodeIdError> {
    WATCH_ID
        .captures(media_id)
        .and_then(|caps| caps.get(2))
        .map(|m| EpisodeId(m.as_str().to_string()))
        .ok_or_else(|| EpisodeIdError {
            media_id: media_id.to_string(),
        })
}
