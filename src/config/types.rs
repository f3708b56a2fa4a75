use serde::Deserialize;

/// Main configuration structure for Farmstats
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub spider: SpiderConfig,
    #[serde(default)]
    pub console: ListenerConfig,
    #[serde(default)]
    pub http: ListenerConfig,
}

/// Worker pool and job queue sizing
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrent fetch/parse workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum number of farm ids waiting in the job queue
    #[serde(rename = "queue-capacity", default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Where farm pages, listing pages, and the recents feed live
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Site root; farm pages are at `<base-url>/<farm id>`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the paginated listing
    #[serde(rename = "listing-path", default = "default_listing_path")]
    pub listing_path: String,

    /// Path of the recents JSON feed
    #[serde(rename = "recents-path", default = "default_recents_path")]
    pub recents_path: String,

    /// Leading character every externally supplied farm id must have
    #[serde(rename = "required-prefix", default = "default_required_prefix")]
    pub required_prefix: char,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Spider dedup and recents polling
#[derive(Debug, Clone, Deserialize)]
pub struct SpiderConfig {
    /// SQLite file tracking farm ids across runs; no dedup when absent
    #[serde(rename = "dedup-database-path", default)]
    pub dedup_database_path: Option<String>,

    /// How many times the recents feed is polled after startup
    #[serde(rename = "recents-poll-count", default = "default_recents_poll_count")]
    pub recents_poll_count: u32,

    /// Seconds between recents polls
    #[serde(
        rename = "recents-poll-interval-secs",
        default = "default_recents_poll_interval_secs"
    )]
    pub recents_poll_interval_secs: u64,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            dedup_database_path: None,
            recents_poll_count: default_recents_poll_count(),
            recents_poll_interval_secs: default_recents_poll_interval_secs(),
        }
    }
}

/// A presentation surface listener; disabled when `listen` is absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListenerConfig {
    /// Socket address to bind, e.g. "127.0.0.1:3333"
    #[serde(default)]
    pub listen: Option<String>,
}

fn default_workers() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    100
}

fn default_listing_path() -> String {
    "all".to_string()
}

fn default_recents_path() -> String {
    "_mini_recents".to_string()
}

fn default_required_prefix() -> char {
    '1'
}

fn default_recents_poll_count() -> u32 {
    2
}

fn default_recents_poll_interval_secs() -> u64 {
    30
}
