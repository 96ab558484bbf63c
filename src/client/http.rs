//! Ping HTTP client
//!
//! Typed client for the ping service. Optionally records every request and
//! response as attachments of the current report step.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::types::HttpResponse;
use crate::report::{ReportLifecycle, ReportStatus};

/// Errors that can occur when calling the service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected status {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
}

impl ReportStatus for ClientError {}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Client for a ping service
///
/// # Example
/// ```no_run
/// use pingstep::client::PingClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = PingClient::new("http://localhost:8080")?;
/// assert_eq!(client.ping().await?, "pong");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PingClient {
    /// Base URL of the service, always ending in `/`
    base_url: Url,
    client: Client,
    /// Lifecycle receiving request/response attachments
    reporter: Option<Arc<ReportLifecycle>>,
}

impl PingClient {
    /// Create a client for the given base URL
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client whose requests time out after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(base_url: &str, client: Client) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client,
            reporter: None,
        })
    }

    /// Record requests and responses on `lifecycle`
    pub fn with_reporter(mut self, lifecycle: Arc<ReportLifecycle>) -> Self {
        self.reporter = Some(lifecycle);
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path against the base URL
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// GET `path` and read the whole response, whatever its status
    pub async fn get(&self, path: &str) -> ClientResult<HttpResponse> {
        let url = self.url(path)?;
        self.attach("Request", &format!("GET {url}"));

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        debug!(%url, status, "Response received");

        let response = HttpResponse {
            status,
            content_type,
            body,
        };
        self.attach("Response", &response.describe());
        Ok(response)
    }

    /// GET `path` and return the body; non-2xx statuses are errors
    pub async fn get_text(&self, path: &str) -> ClientResult<String> {
        let response = self.get(path).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(ClientError::Status {
                status: response.status,
                url: self.url(path)?.to_string(),
                body: response.body,
            })
        }
    }

    /// Call `GET /ping`
    pub async fn ping(&self) -> ClientResult<String> {
        self.get_text("/ping").await
    }

    fn attach(&self, name: &str, text: &str) {
        if let Some(lifecycle) = &self.reporter {
            lifecycle.add_attachment(name, "text/plain", "txt", text.as_bytes());
        }
    }
}
