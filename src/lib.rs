pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod metrics;
pub mod querier;
pub mod types;

#[cfg(test)]
mod testing;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use config::AppConfig;
use error::UpstreamError;
use querier::{Aggregation, ContributionQuerier};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use types::{FeatureSelection, SearchParams};

/// Response header carrying the number of repositories left out of a report.
pub const SKIPPED_REPOSITORIES_HEADER: &str = "x-skipped-repositories";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    /// Organization aggregated by the contribution endpoints.
    organization: String,
    /// Whether requests to GitHub carry a token.
    authenticated: bool,
}

/// Shared application state accessible to all request handlers.
pub struct AppState {
    /// Service aggregating contributions across the configured organization.
    pub querier: ContributionQuerier,
    /// Application configuration loaded from environment variables.
    pub config: AppConfig,
}

impl AppState {
    /// Initializes the application state, including the GitHub client.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let querier = ContributionQuerier::new(&config)?;
        Ok(Self { querier, config })
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/github/{username}",
            get(get_contributions).post(get_contributions_with_selection),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "contrib-stats",
        version: env!("CARGO_PKG_VERSION"),
        organization: state.config.github_organization.clone(),
        authenticated: state
            .config
            .github_token
            .as_deref()
            .is_some_and(|t| !t.is_empty()),
    })
}

pub async fn get_contributions(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, UpstreamError> {
    aggregate(&state, &username, FeatureSelection::default()).await
}

pub async fn get_contributions_with_selection(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(params): Json<SearchParams>,
) -> Result<Response, UpstreamError> {
    aggregate(&state, &username, params.search_params).await
}

/// Runs the same aggregation as `get_all_github_data` / `get_data_with_selection`
/// against the configured organization, keeping the skipped count for the header.
async fn aggregate(
    state: &AppState,
    username: &str,
    selection: FeatureSelection,
) -> Result<Response, UpstreamError> {
    let querier = &state.querier;
    match querier
        .aggregate(username, querier.organization(), selection)
        .await
    {
        Ok(Aggregation {
            report,
            skipped_repositories,
        }) => {
            tracing::debug!(username, ?selection, "Returning contributions");
            Ok((
                [(
                    SKIPPED_REPOSITORIES_HEADER,
                    skipped_repositories.len().to_string(),
                )],
                Json(report),
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!("Failed to aggregate contributions for {}: {}", username, e);
            Err(e)
        }
    }
}
