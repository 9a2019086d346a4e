//! Feature-service query client.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::params::QueryParams;
use crate::config::{FetchConfig, Verbosity};
use crate::error::FetchError;

/// Transport timeout for a single query.
const QUERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Trait for issuing feature-service queries.
///
/// This abstraction lets the fetch engine run against a scripted client in
/// tests instead of a live service.
pub trait QueryClient: Send + Sync {
    /// Performs `GET {base_url}/query?{params}` and returns the raw body.
    ///
    /// Transport failures and non-2xx statuses are returned as
    /// [`FetchError::Api`].
    fn query(
        &self,
        params: &QueryParams,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Query client backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestQueryClient {
    client: reqwest::Client,
    query_url: String,
    verbosity: Verbosity,
}

impl ReqwestQueryClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// Every request carries `agent` as its User-Agent.
    pub fn new(base_url: &str, agent: &str, verbosity: Verbosity) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(QUERY_TIMEOUT)
            .user_agent(agent)
            .build()
            .map_err(|e| FetchError::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            query_url: format!("{}/query", base_url.trim_end_matches('/')),
            verbosity,
        })
    }

    /// Creates a client from the service settings of a fetch configuration.
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::new(config.base_url(), config.agent(), config.verbosity())
    }

    /// Resolved query endpoint.
    pub fn query_url(&self) -> &str {
        &self.query_url
    }
}

impl QueryClient for ReqwestQueryClient {
    async fn query(&self, params: &QueryParams) -> Result<Vec<u8>, FetchError> {
        let request = self
            .client
            .get(&self.query_url)
            .query(params.as_pairs())
            .build()
            .map_err(|e| FetchError::Api(format!("Invalid request: {}", e)))?;

        if self.verbosity.is_verbose() {
            info!(url = %request.url(), "Feature query");
        }
        if self.verbosity.is_very_verbose() {
            debug!(
                method = %request.method(),
                url = %request.url(),
                headers = ?request.headers(),
                "HTTP request"
            );
        }

        let response = match self.client.execute(request).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    url = %self.query_url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(FetchError::Api(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        let headers = self
            .verbosity
            .is_very_verbose()
            .then(|| format!("{:?}", response.headers()));

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Api(format!("Failed to read response: {}", e)))?;

        if let Some(headers) = headers {
            debug!(
                status = status.as_u16(),
                headers = %headers,
                body = %String::from_utf8_lossy(&body),
                "HTTP response"
            );
        } else {
            trace!(status = status.as_u16(), bytes = body.len(), "HTTP response body read");
        }

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body);
            return Err(FetchError::Api(format!("HTTP {} | {}", status, detail.trim())));
        }

        Ok(body.to_vec())
    }
}
