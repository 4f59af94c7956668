use crate::config::FetchLimits;
use crate::error::UpstreamError;
use crate::github::{self, GitHubApi};
use crate::metrics;
use crate::types::{CommitDiffStats, FeatureSelection, RepositoryPartialResult};
use futures::stream::{self, StreamExt};

/// Aggregates one repository's contributions by `username`.
///
/// The commits, issues and pulls branches run concurrently and only when enabled in
/// `selection`. A failing list request fails the whole repository; a failing commit
/// detail request only drops that commit's line counts.
pub async fn aggregate_repository<C: GitHubApi>(
    client: &C,
    full_name: &str,
    username: &str,
    selection: FeatureSelection,
    limits: FetchLimits,
) -> Result<RepositoryPartialResult, UpstreamError> {
    let ((commits, stats), issues, pulls) = futures::try_join!(
        fetch_commits(client, full_name, username, selection.commits, limits),
        fetch_issues(client, full_name, username, selection.issues, limits),
        fetch_pulls(client, full_name, username, selection.pulls, limits),
    )?;

    let partial = RepositoryPartialResult {
        commits,
        issues,
        pulls,
        additions: stats.additions,
        deletions: stats.deletions,
    };
    tracing::debug!(repo = full_name, ?partial, "Aggregated repository");

    Ok(partial)
}

async fn fetch_commits<C: GitHubApi>(
    client: &C,
    full_name: &str,
    username: &str,
    enabled: bool,
    limits: FetchLimits,
) -> Result<(u64, CommitDiffStats), UpstreamError> {
    if !enabled {
        return Ok((0, CommitDiffStats::default()));
    }

    let route = format!("/repos/{full_name}/commits");
    let commits = github::fetch_list(
        client,
        &route,
        &[("author", username.to_string())],
        limits.max_pages,
    )
    .await?;

    let stats: Vec<Option<CommitDiffStats>> = stream::iter(metrics::commit_shas(&commits))
        .map(|sha| fetch_commit_stats(client, full_name, sha))
        .buffer_unordered(limits.commit_stats)
        .collect()
        .await;

    let failed = stats.iter().filter(|s| s.is_none()).count();
    if failed > 0 {
        tracing::warn!(
            repo = full_name,
            failed,
            "Line counts are missing for some commits"
        );
    }

    Ok((
        commits.len() as u64,
        metrics::sum_diff_stats(stats.into_iter().flatten()),
    ))
}

/// Diff stats of one commit, or `None` when they could not be fetched.
async fn fetch_commit_stats<C: GitHubApi>(
    client: &C,
    full_name: &str,
    sha: String,
) -> Option<CommitDiffStats> {
    let route = format!("/repos/{full_name}/commits/{sha}");
    let result = match client.get_json(&route, &[]).await {
        Ok(detail) => metrics::diff_stats(&detail).map_err(UpstreamError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!(repo = full_name, sha = %sha, "Failed to fetch commit stats: {}", e);
            None
        }
    }
}

async fn fetch_issues<C: GitHubApi>(
    client: &C,
    full_name: &str,
    username: &str,
    enabled: bool,
    limits: FetchLimits,
) -> Result<u64, UpstreamError> {
    if !enabled {
        return Ok(0);
    }

    let route = format!("/repos/{full_name}/issues");
    let issues = github::fetch_list(
        client,
        &route,
        &[
            ("creator", username.to_string()),
            ("state", "all".to_string()),
        ],
        limits.max_pages,
    )
    .await?;

    Ok(metrics::count_issues(&issues))
}

async fn fetch_pulls<C: GitHubApi>(
    client: &C,
    full_name: &str,
    username: &str,
    enabled: bool,
    limits: FetchLimits,
) -> Result<u64, UpstreamError> {
    if !enabled {
        return Ok(0);
    }

    let route = format!("/repos/{full_name}/pulls");
    let pulls = github::fetch_list(
        client,
        &route,
        &[
            ("state", "all".to_string()),
            ("creator", username.to_string()),
        ],
        limits.max_pages,
    )
    .await?;

    Ok(pulls.len() as u64)
}
