//! Service layer for aggregating a user's contributions across an organization.
//!
//! `ContributionQuerier` is the entry point for contribution reports. It:
//! 1. Lists the organization's repositories (a failure here fails the request).
//! 2. Aggregates every repository concurrently, tolerating per-repository failures.
//! 3. Folds the successful partial results into one `ContributionReport`.

use crate::config::{AppConfig, FetchLimits};
use crate::error::UpstreamError;
use crate::fetcher;
use crate::github::{self, GitHubApi, GitHubClient};
use crate::metrics;
use crate::types::{ContributionReport, FeatureSelection, RepositoryPartialResult};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RepositorySummary {
    name: String,
}

/// A report together with the repositories that could not be aggregated.
#[derive(Clone, Debug)]
pub struct Aggregation {
    pub report: ContributionReport,
    /// Full names of repositories whose contributions are missing from `report`.
    pub skipped_repositories: Vec<String>,
}

#[derive(Clone)]
pub struct ContributionQuerier<C = GitHubClient> {
    client: C,
    organization: String,
    limits: FetchLimits,
}

impl ContributionQuerier<GitHubClient> {
    /// Initializes a querier backed by the GitHub API described in `config`.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = GitHubClient::new(&config.github_api_url, config.github_token.clone())?;
        Ok(Self::with_client(
            client,
            config.github_organization.clone(),
            config.limits(),
        ))
    }
}

impl<C: GitHubApi> ContributionQuerier<C> {
    pub fn with_client(client: C, organization: impl Into<String>, limits: FetchLimits) -> Self {
        Self {
            client,
            organization: organization.into(),
            limits,
        }
    }

    /// The organization used by [`Self::get_all_github_data`] and [`Self::get_data_with_selection`].
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Commits, issues and pull requests of `username` across the configured organization.
    pub async fn get_all_github_data(
        &self,
        username: &str,
    ) -> Result<ContributionReport, UpstreamError> {
        self.get_data_with_selection(username, FeatureSelection::default())
            .await
    }

    /// Like [`Self::get_all_github_data`], limited to the categories enabled in `selection`.
    pub async fn get_data_with_selection(
        &self,
        username: &str,
        selection: FeatureSelection,
    ) -> Result<ContributionReport, UpstreamError> {
        self.aggregate_organization(username, &self.organization, selection)
            .await
    }

    pub async fn aggregate_organization(
        &self,
        username: &str,
        organization: &str,
        selection: FeatureSelection,
    ) -> Result<ContributionReport, UpstreamError> {
        Ok(self.aggregate(username, organization, selection).await?.report)
    }

    /// Aggregates every repository of `organization`, reporting which ones were skipped.
    ///
    /// Only the repository listing can fail the call. Repositories that fail are
    /// logged, left out of the totals and never retried.
    ///
    /// This is the entry point for callers that need the skipped repositories (the HTTP
    /// handlers report their count in a header). [`Self::get_all_github_data`],
    /// [`Self::get_data_with_selection`] and [`Self::aggregate_organization`] wrap it
    /// and return only the report.
    pub async fn aggregate(
        &self,
        username: &str,
        organization: &str,
        selection: FeatureSelection,
    ) -> Result<Aggregation, UpstreamError> {
        let repositories = self.list_repositories(organization).await?;
        tracing::debug!(
            organization,
            repositories = repositories.len(),
            "Aggregating repositories"
        );

        let results: Vec<(String, Result<RepositoryPartialResult, UpstreamError>)> =
            stream::iter(repositories)
                .map(|full_name| async move {
                    let result = fetcher::aggregate_repository(
                        &self.client,
                        &full_name,
                        username,
                        selection,
                        self.limits,
                    )
                    .await;
                    (full_name, result)
                })
                .buffer_unordered(self.limits.repositories)
                .collect()
                .await;

        let mut partials = Vec::with_capacity(results.len());
        let mut skipped_repositories = Vec::new();
        for (full_name, result) in results {
            match result {
                Ok(partial) => partials.push(partial),
                Err(e) => {
                    tracing::warn!(repo = %full_name, "Skipping repository: {}", e);
                    skipped_repositories.push(full_name);
                }
            }
        }
        skipped_repositories.sort();

        let report = ContributionReport::from_totals(
            username,
            organization,
            metrics::fold_partials(partials),
        );
        tracing::info!(
            username,
            organization,
            skipped = skipped_repositories.len(),
            "Aggregated contributions"
        );

        Ok(Aggregation {
            report,
            skipped_repositories,
        })
    }

    /// Full names (`org/name`) of the organization's repositories.
    async fn list_repositories(&self, organization: &str) -> Result<Vec<String>, UpstreamError> {
        let route = format!("/orgs/{organization}/repos");
        let items = github::fetch_list(&self.client, &route, &[], self.limits.max_pages).await?;
        let repositories: Vec<RepositorySummary> = serde_json::from_value(Value::Array(items))?;

        Ok(repositories
            .into_iter()
            .map(|repo| format!("{organization}/{}", repo.name))
            .collect())
    }
}
