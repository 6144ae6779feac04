//! HTTP implementation of [`LogBackend`].

use crate::model::{BackendError, DateId, MessageRecord};
use crate::source::LogBackend;
use crate::state::DayTarget;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// JSON client for the log server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    client: Client,
}

impl HttpBackend {
    /// Client for the server at `base_url`, aborting requests after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`BackendError::Request`] if the TLS/client
    /// setup fails.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base = normalize_base(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chanlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Request {
                endpoint: base.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { base, client })
    }

    /// Base URL requests are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a backend-relative `path` (no leading slash).
    pub fn endpoint_url(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|e| BackendError::InvalidBaseUrl {
                url: self.base.to_string(),
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let endpoint = format!("/{path}");
        let url = self.endpoint_url(path)?;
        debug!(%url, "Requesting");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::Request {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "Backend returned error status");
            return Err(BackendError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                BackendError::Decode {
                    endpoint,
                    reason: e.to_string(),
                }
            } else {
                BackendError::Request {
                    endpoint,
                    reason: e.to_string(),
                }
            }
        })
    }
}

#[async_trait(?Send)]
impl LogBackend for HttpBackend {
    async fn dates(&self) -> Result<Vec<DateId>, BackendError> {
        self.get_json("dates").await
    }

    async fn logs(&self, day: &DayTarget) -> Result<Vec<MessageRecord>, BackendError> {
        let path = format!("logs/{}", urlencoding::encode(day.as_segment()));
        self.get_json(&path).await
    }

    async fn search(&self, query: &str) -> Result<Vec<MessageRecord>, BackendError> {
        let path = format!("search?q={}", urlencoding::encode(query));
        self.get_json(&path).await
    }
}

/// Parse `raw` and make sure its path ends with `/` so joins append.
fn normalize_base(raw: &str) -> Result<Url, BackendError> {
    let invalid = |reason: String| BackendError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
