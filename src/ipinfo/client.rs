//! HTTP client for the ipinfo.io per-target JSON endpoint.

use std::{future::Future, time::Duration};

use log::{debug, warn};
use reqwest::StatusCode;
use url::Url;

use crate::error::LookupError;

use super::LookupResult;

pub const IPINFO_BASE_URL: &str = "https://ipinfo.io/";

/// Total time allowed for one lookup, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of geolocation data for a single target.
pub trait GeoLookup {
    /// Look up an IP address or hostname. One attempt, no caching.
    fn fetch(
        &self,
        target: &str,
    ) -> impl Future<Output = Result<LookupResult, LookupError>> + Send;
}

pub struct IpInfoClient {
    client: reqwest::Client,
    base_url: Option<Url>,
    token: Option<String>,
}

impl IpInfoClient {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
            token,
        }
    }

    /// Point the client at another ipinfo-compatible host.
    #[must_use]
    pub fn with_base_url(base_url: Url, token: Option<String>) -> Self {
        Self {
            base_url: Some(base_url),
            ..Self::new(token)
        }
    }

    /// `<base>/<target>/json`, with `?token=` only when a token is configured.
    fn endpoint(&self, target: &str) -> Result<Url, LookupError> {
        let mut url = match &self.base_url {
            Some(base_url) => base_url.clone(),
            None => Url::parse(IPINFO_BASE_URL).map_err(|e| LookupError::Request(e.to_string()))?,
        };
        url.path_segments_mut()
            .map_err(|()| LookupError::Request("base URL cannot take path segments".to_string()))?
            .pop_if_empty()
            .push(target)
            .push("json");

        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }

    fn build_request(&self, target: &str) -> Result<reqwest::Request, LookupError> {
        let url = self.endpoint(target)?;
        Ok(self.client.get(url).timeout(REQUEST_TIMEOUT).build()?)
    }
}

impl GeoLookup for IpInfoClient {
    async fn fetch(&self, target: &str) -> Result<LookupResult, LookupError> {
        let request = self.build_request(target)?;
        debug!("Querying ipinfo for '{target}'");

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!("ipinfo returned status {status} for '{target}'");
            return Err(LookupError::Provider { status, body });
        }

        let value = serde_json::from_str(&body)
            .map_err(|e| LookupError::Request(format!("invalid JSON from ipinfo: {e}")))?;

        debug!("ipinfo lookup for '{target}' succeeded");
        LookupResult::from_json(value)
    }
}
