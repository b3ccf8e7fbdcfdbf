//! Lookup failures. The `Display` text of each variant is exactly what the
//! HTTP API returns in its `error` field.

use crate::fetch::UpstreamError;
use crate::metadata::TmdbError;
use crate::streams::EpisodeIdError;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MovieLookupError {
    #[error("tmdb_id parameter is missing")]
    MissingId,

    #[error("Failed to fetch data from TMDB API")]
    TmdbFetch,

    #[error("Failed to decode TMDB response")]
    TmdbDecode,

    #[error("Invalid TMDB ID or API Key")]
    TmdbRejected,

    #[error("TMDB response is missing the movie title")]
    MissingTitle,

    #[error("Failed to fetch data from 9streams API")]
    SearchFetch,

    #[error("Failed to decode 9streams response")]
    SearchDecode,

    #[error("No results found from 9streams API")]
    NoResults,

    #[error("No matching movie found")]
    NoMatch,

    #[error("Failed to extract episodeId from movie ID")]
    EpisodeId(#[source] EpisodeIdError),

    #[error("Failed to fetch data from the watch API")]
    WatchFetch,

    #[error("Failed to fetch data from the info API")]
    InfoFetch,

    #[error("Failed to decode info API response")]
    InfoDecode,

    #[error("No additional info found for the movie")]
    NoInfo,

    #[error("Failed to decode watch API response")]
    WatchDecode,
}

impl From<TmdbError> for MovieLookupError {
    fn from(e: TmdbError) -> Self {
        match e {
            TmdbError::Upstream(e) if e.is_missing() => Self::TmdbFetch,
            TmdbError::Upstream(_) => Self::TmdbDecode,
            TmdbError::Rejected { .. } => Self::TmdbRejected,
            TmdbError::MissingField(_) => Self::MissingTitle,
        }
    }
}

impl From<EpisodeIdError> for MovieLookupError {
    fn from(e: EpisodeIdError) -> Self {
        Self::EpisodeId(e)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShowLookupError {
    #[error("tmdb_id, s (season), and e (episode) parameters are required.")]
    MissingParams,

    #[error("Failed to fetch data from TMDB API.")]
    TmdbFetch,

    #[error("Failed to decode TMDB response.")]
    TmdbDecode,

    #[error("Invalid TMDB ID or API Key")]
    TmdbRejected,

    #[error("TMDB response is missing the show name.")]
    MissingName,

    #[error("Failed to fetch data from 9streams API.")]
    SearchFetch,

    #[error("Failed to decode 9streams response.")]
    SearchDecode,

    #[error("No results found from 9streams API.")]
    NoResults,

    #[error("No matching TV show found.")]
    NoMatch,

    #[error("Failed to fetch show details from 9streams API.")]
    InfoFetch,

    #[error("Failed to decode show details from 9streams API.")]
    InfoDecode,

    #[error("No matching episode found.")]
    NoEpisode,

    #[error("Failed to fetch streaming URL from 9streams API.")]
    WatchFetch,

    #[error("Failed to decode streaming URL response from 9streams API.")]
    WatchDecode,
}

impl From<TmdbError> for ShowLookupError {
    fn from(e: TmdbError) -> Self {
        match e {
            TmdbError::Upstream(e) if e.is_missing() => Self::TmdbFetch,
            TmdbError::Upstream(_) => Self::TmdbDecode,
            TmdbError::Rejected { .. } => Self::TmdbRejected,
            TmdbError::MissingField(_) => Self::MissingName,
        }
    }
}

/// Pick between the "no data" and "bad data" variants of a step.
pub(crate) fn classify<E>(err: &UpstreamError, missing: E, malformed: E) -> E {
    if err.is_missing() {
        missing
    } else {
        malformed
    }
}
