use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Final contribution totals for one user across one organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionReport {
    pub username: String,
    pub organization: String,
    pub total_commits: u64,
    pub total_issues: u64,
    pub total_pull_requests: u64,
    pub total_lines_added: u64,
    pub total_lines_deleted: u64,
}

impl ContributionReport {
    /// Builds the report from the folded per-repository totals.
    pub fn from_totals(
        username: impl Into<String>,
        organization: impl Into<String>,
        totals: RepositoryPartialResult,
    ) -> Self {
        Self {
            username: username.into(),
            organization: organization.into(),
            total_commits: totals.commits,
            total_issues: totals.issues,
            total_pull_requests: totals.pulls,
            total_lines_added: totals.additions,
            total_lines_deleted: totals.deletions,
        }
    }
}

/// Which contribution categories to fetch. Every category is enabled by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSelection {
    #[serde(default = "enabled")]
    pub commits: bool,
    #[serde(default = "enabled")]
    pub issues: bool,
    #[serde(default = "enabled")]
    pub pulls: bool,
}

fn enabled() -> bool {
    true
}

impl Default for FeatureSelection {
    fn default() -> Self {
        Self {
            commits: true,
            issues: true,
            pulls: true,
        }
    }
}

/// Counts gathered from a single repository before they are folded into the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepositoryPartialResult {
    pub commits: u64,
    pub issues: u64,
    pub pulls: u64,
    pub additions: u64,
    pub deletions: u64,
}

impl Add for RepositoryPartialResult {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            commits: self.commits + rhs.commits,
            issues: self.issues + rhs.issues,
            pulls: self.pulls + rhs.pulls,
            additions: self.additions + rhs.additions,
            deletions: self.deletions + rhs.deletions,
        }
    }
}

impl AddAssign for RepositoryPartialResult {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Line changes of one commit, as reported under `stats` by the commit detail endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CommitDiffStats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

impl Add for CommitDiffStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            additions: self.additions + rhs.additions,
            deletions: self.deletions + rhs.deletions,
        }
    }
}

/// Inbound request body for a custom selection, e.g. `{"searchParams": {"pulls": false}}`.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "searchParams", default)]
    pub search_params: FeatureSelection,
}
