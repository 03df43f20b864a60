// File: clinibot-core/src/platforms/dentalink/client.rs

use std::sync::Arc;
use std::time::Duration;
use reqwest::{Client as ReqwestClient, Response};
use url::Url;

use crate::config::AppConfig;
use crate::Error;

/// Entry point for the Dentalink REST API. The individual calls live in
/// `requests::*` as further `impl DentalinkClient` blocks.
///
/// Every request carries `Authorization: Bearer <api key>` and is bounded
/// by the configured timeout. There is no retry.
pub struct DentalinkClient {
    http: Arc<ReqwestClient>,
    base_url: Url,
    api_key: String,
}

impl DentalinkClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, Error> {
        let http = ReqwestClient::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("DENTALINK_BASE '{}' is not a base URL", base_url)));
        }
        Ok(Self {
            http: Arc::new(http),
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.dentalink_base, &config.dentalink_api_key, config.http_timeout)
    }

    pub fn http_client(&self) -> Arc<ReqwestClient> {
        self.http.clone()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("DENTALINK_BASE '{}' is not a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turns a non-2xx reply into `Error::Gateway`, keeping the status and
/// whatever body Dentalink sent back.
pub(crate) async fn ensure_success(resp: Response, call: &str) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Gateway(format!("{call}: HTTP {status} ⇒ {body}")))
}
