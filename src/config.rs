//! Application configuration and environment variable parsing.
//!
//! Settings are read from the environment (a `.env` file is loaded first by `main`).
//! `AppConfig` decides which organization is aggregated, which credential is sent to
//! GitHub, how many result pages are followed and how wide each fan-out may grow.

use serde::Deserialize;

pub const DEFAULT_ORGANIZATION: &str = "Dijkstra-Edu";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Optional GitHub Personal Access Token. Requests are sent unauthenticated without it.
    #[serde(default)]
    pub github_token: Option<String>,

    /// The organization whose repositories are aggregated.
    #[serde(default = "default_organization")]
    pub github_organization: String,

    /// Base URI of the GitHub REST API.
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Pages of 100 items followed for every list endpoint.
    /// With the default of 1, users with more than 100 items in a repository are undercounted.
    #[serde(default = "default_max_pages")]
    pub max_github_api_pages: u32,

    /// Maximum number of repositories aggregated at once.
    #[serde(default = "default_concurrency_limit")]
    pub repository_concurrency_limit: usize,

    /// Maximum number of commit detail requests in flight for one repository.
    #[serde(default = "default_concurrency_limit")]
    pub commit_stats_concurrency_limit: usize,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_organization() -> String {
    DEFAULT_ORGANIZATION.to_string()
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_max_pages() -> u32 {
    1
}

fn default_concurrency_limit() -> usize {
    100
}

fn default_port() -> u16 {
    3000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_organization: default_organization(),
            github_api_url: default_github_api_url(),
            max_github_api_pages: default_max_pages(),
            repository_concurrency_limit: default_concurrency_limit(),
            commit_stats_concurrency_limit: default_concurrency_limit(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Fan-out limits handed to the aggregators.
    pub fn limits(&self) -> FetchLimits {
        FetchLimits {
            max_pages: self.max_github_api_pages.max(1),
            repositories: self.repository_concurrency_limit.max(1),
            commit_stats: self.commit_stats_concurrency_limit.max(1),
        }
    }
}

/// Paging and concurrency bounds shared by the aggregation tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchLimits {
    pub max_pages: u32,
    pub repositories: usize,
    pub commit_stats: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        AppConfig::default().limits()
    }
}
