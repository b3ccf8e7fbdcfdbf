use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub streams: StreamsConfig,

    #[serde(default)]
    pub skiptimes: SkipTimesConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Referer/Origin hosts allowed to call the API (empty = no check).
    /// `/skiptimes` is always public.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            allowed_domains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,

    /// TMDB v3 API key, sent as the `api_key` query parameter
    #[serde(default)]
    pub api_key: String,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            api_key: String::new(),
        }
    }
}

/// Streaming aggregator (consumet flixhq-style API).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamsConfig {
    #[serde(default = "default_streams_base_url")]
    pub base_url: String,

    /// Value passed as `server` to the watch endpoint
    #[serde(default = "default_streams_server")]
    pub server: String,
}

fn default_streams_base_url() -> String {
    "https://9streams-consumet.vercel.app/movies/flixhq".to_string()
}
fn default_streams_server() -> String {
    "upcloud".to_string()
}

impl Default for StreamsConfig {
    fn default() -> Self {
        Self {
            base_url: default_streams_base_url(),
            server: default_streams_server(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SkipTimesConfig {
    #[serde(default = "default_skiptimes_base_url")]
    pub base_url: String,

    #[serde(default = "default_skiptimes_server")]
    pub server: String,

    #[serde(default = "default_skiptimes_category")]
    pub category: String,
}

fn default_skiptimes_base_url() -> String {
    "https://zoro-api-9streams.vercel.app/api/v2/hianime".to_string()
}
fn default_skiptimes_server() -> String {
    "hd-1".to_string()
}
fn default_skiptimes_category() -> String {
    "dub".to_string()
}

impl Default for SkipTimesConfig {
    fn default() -> Self {
        Self {
            base_url: default_skiptimes_base_url(),
            server: default_skiptimes_server(),
            category: default_skiptimes_category(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Total attempts per upstream GET (not retries)
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Delay after a failed attempt, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Also wait `delay_ms` after a non-200 response. When false, only
    /// transport errors are followed by a delay and a bad status is retried
    /// immediately.
    #[serde(default)]
    pub delay_on_status: bool,
}

fn default_attempts() -> u32 {
    3
}
fn default_delay_ms() -> u64 {
    200
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
            delay_on_status: false,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Per-request timeout for upstream calls. Unset = client default (none).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
