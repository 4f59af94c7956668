//! Pure counting and summation over GitHub API payloads.

use crate::types::{CommitDiffStats, RepositoryPartialResult};
use serde_json::Value;

/// Counts issues, skipping items that carry a `pull_request` marker.
///
/// The issues endpoint lists pull requests too; those are counted by the pulls branch.
pub fn count_issues(items: &[Value]) -> u64 {
    items
        .iter()
        .filter(|item| item.get("pull_request").is_none())
        .count() as u64
}

/// SHAs of the listed commits. Commits without a usable identifier are skipped.
pub fn commit_shas(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|commit| commit.get("sha").and_then(Value::as_str))
        .filter(|sha| !sha.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads `stats` from a commit detail payload. A missing `stats` object counts as no changes.
pub fn diff_stats(detail: &Value) -> Result<CommitDiffStats, serde_json::Error> {
    match detail.get("stats") {
        Some(stats) => serde_json::from_value(stats.clone()),
        None => Ok(CommitDiffStats::default()),
    }
}

pub fn sum_diff_stats(stats: impl IntoIterator<Item = CommitDiffStats>) -> CommitDiffStats {
    stats
        .into_iter()
        .fold(CommitDiffStats::default(), |acc, s| acc + s)
}

/// Field-wise sum of per-repository results.
pub fn fold_partials(
    partials: impl IntoIterator<Item = RepositoryPartialResult>,
) -> RepositoryPartialResult {
    partials
        .into_iter()
        .fold(RepositoryPartialResult::default(), |acc, p| acc + p)
}
