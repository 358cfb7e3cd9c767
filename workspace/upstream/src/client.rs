use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};

use crate::error::{FetchError, Result};

const USER_AGENT: &str = concat!("stockscope/", env!("CARGO_PKG_VERSION"));

/// JSON-over-HTTP client bound to one upstream base URL.
///
/// Every request carries the same fixed timeout and every response is
/// decoded into a typed record here, so callers only ever see validated data
/// or a classified [`FetchError`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    http_client: Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::Config(format!("Base URL '{}' cannot carry a path", base_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client, base_url })
    }

    /// Builds `base/segment/segment...`, percent-encoding each segment.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Config(format!("Base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `segments` with `query` and decodes the JSON body as `T`.
    #[instrument(skip(self, query), fields(base = %self.base_url))]
    pub async fn get_json<T>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(segments)?;
        debug!("GET {}", url);

        let response = self.http_client.get(url).query(query).send().await?;
        let status = response.status();
        trace!("Upstream answered {}", status);

        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!("Failed to decode upstream body: {}", e);
            FetchError::DataFormat(e.to_string())
        })
    }

    /// Maps a non-2xx response to `FetchError::Server`, preferring the body's `message`.
    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> FetchError {
        let body_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body_text)
            .ok()
            .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));

        warn!("Server error {}: {}", status.as_u16(), body_text);
        FetchError::Server {
            status: status.as_u16(),
            message,
        }
    }
}
