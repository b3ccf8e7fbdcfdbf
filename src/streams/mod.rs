//! Client for the streaming aggregator (a consumet flixhq-style API).
//!
//! Three endpoints are used, all relative to the configured base URL:
//! - `/{title}?page=1` search by title
//! - `/info?id={media_id}` descriptive info (title, cover, episode list)
//! - `/watch?episodeId=..&mediaId=..&server=..` playback sources

pub mod episode_id;
pub mod matching;

pub use episode_id::{extract_episode_id, EpisodeId, EpisodeIdError};
pub use matching::{find_episode, find_movie, find_show, ShowEpisode, StreamCandidate};

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::config::StreamsConfig;
use crate::fetch::{join_segments, FetchError, Fetcher, UpstreamError};

pub struct StreamsClient {
    fetcher: Fetcher,
    base_url: String,
    server: String,
}

impl StreamsClient {
    pub fn new(fetcher: Fetcher, config: &StreamsConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
            server: config.server.clone(),
        }
    }

    fn url(&self, segment: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = join_segments(&self.base_url, [segment])?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Search by exact title. The title is sent as a single encoded path
    /// segment, so `/` in a title does not split the path.
    pub async fn search(&self, title: &str) -> Result<Value, UpstreamError> {
        let url = self.url(title, &[("page", "1")])?;
        debug!(title, "aggregator search");
        self.fetcher.get_json(&url).await
    }

    /// Descriptive info for a media ID.
    pub async fn info(&self, media_id: &str) -> Result<Value, UpstreamError> {
        let url = self.url("info", &[("id", media_id)])?;
        debug!(media_id, "aggregator info");
        self.fetcher.get_json(&url).await
    }

    /// Playback sources for one episode of a media ID.
    pub async fn watch(&self, episode_id: &str, media_id: &str) -> Result<Value, UpstreamError> {
        let url = self.url(
            "watch",
            &[
                ("episodeId", episode_id),
                ("mediaId", media_id),
                ("server", &self.server),
            ],
        )?;
        debug!(episode_id, media_id, "aggregator watch");
        self.fetcher.get_json(&url).await
    }
}
