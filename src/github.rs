use crate::error::UpstreamError;
use axum::http::header::ACCEPT;
use octocrab::Octocrab;
use serde_json::Value;
use std::future::Future;
use url::Url;

/// Page size requested from every list endpoint.
pub const PER_PAGE: usize = 100;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Query string pairs appended to a route.
pub type Query = [(&'static str, String)];

/// Read access to the GitHub REST API.
pub trait GitHubApi: Send + Sync {
    /// Issues a GET for `route` and returns the decoded JSON body.
    /// Non-success statuses become [`UpstreamError::Status`].
    fn get_json(
        &self,
        route: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send;
}

#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(base_url)?
            .add_header(ACCEPT, GITHUB_ACCEPT.to_string());
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            builder = builder.personal_token(token);
        }

        Ok(Self {
            octocrab: builder.build()?,
            // Trailing slash so routes join below any path prefix of the base.
            base_url: Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?,
        })
    }

    /// Absolute URL for `route` with `query` appended.
    fn url(&self, route: &str, query: &Query) -> Result<Url, UpstreamError> {
        let mut url = self
            .base_url
            .join(route.trim_start_matches('/'))
            .map_err(|e| UpstreamError::Transport(format!("invalid route {route}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

impl GitHubApi for GitHubClient {
    async fn get_json(&self, route: &str, query: &Query) -> Result<Value, UpstreamError> {
        let url = self.url(route, query)?;
        let response = self.octocrab._get(url.as_str()).await?;
        let status = response.status();
        let body = self.octocrab.body_to_string(response).await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Fetches a list endpoint, following at most `max_pages` pages of [`PER_PAGE`] items.
///
/// Stops at the first short page. Reaching `max_pages` on a full page means the
/// result may be truncated, which is logged.
pub async fn fetch_list<C: GitHubApi>(
    client: &C,
    route: &str,
    query: &Query,
    max_pages: u32,
) -> Result<Vec<Value>, UpstreamError> {
    let mut items = Vec::new();

    for page in 1..=max_pages.max(1) {
        let mut params = query.to_vec();
        params.push(("per_page", PER_PAGE.to_string()));
        if page > 1 {
            params.push(("page", page.to_string()));
        }

        let body = client.get_json(route, &params).await?;
        let page_items: Vec<Value> = serde_json::from_value(body)?;
        let full_page = page_items.len() >= PER_PAGE;
        items.extend(page_items);

        if !full_page {
            return Ok(items);
        }
    }

    tracing::warn!(
        route,
        max_pages,
        "Hit max_github_api_pages before the last page. Data may be incomplete."
    );
    Ok(items)
}
