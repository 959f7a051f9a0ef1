//! HTTP transport against the public registry endpoint
//!
//! The service still expects the request shape of its Flash-era map client,
//! so every call carries the headers that client sent.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, ORIGIN, PRAGMA, REFERER, USER_AGENT};
use tracing::warn;

pub const BASE_URL: &str = "http://register.metsad.ee/avalik/";
const ENDPOINT: &str = "flashconf.php";
const REQUEST_SRS: &str = "EPSG:3301";

const RETRY_ATTEMPTS: u32 = 6;
const RETRY_BASE: Duration = Duration::from_secs(1);
const RETRY_CAP: Duration = Duration::from_secs(60);

/// Transport seam, so drivers can be exercised against canned responses
#[allow(async_fn_in_trait)]
pub trait RegistryClient {
    /// Fetches the XML listing of all map layers
    async fn layer_list(&self) -> Result<String>;

    /// Fetches the XML listing of objects in `layer_id` intersecting the AOI,
    /// given as a WKT polygon in EPSG:3301
    async fn query_layer(&self, aoi: &str, layer_id: u32) -> Result<String>;

    /// Fetches a detail page body, normalized to LF line endings and trimmed
    async fn fetch_info(&self, url: &str) -> Result<String>;
}

/// Live client with retry on transient failures
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(flash_headers())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{ENDPOINT}", self.base_url)
    }
}

fn flash_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/59.0.3071.115 Safari/537.36",
        ),
    );
    headers.insert(ORIGIN, HeaderValue::from_static("http://register.metsad.ee"));
    headers.insert(
        REFERER,
        HeaderValue::from_static("http://register.metsad.ee/avalik/map.swf"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        "X-Requested-With",
        HeaderValue::from_static("ShockwaveFlash/26.0.0.131"),
    );
    headers
}

/// Retries `op` with exponential backoff, capped at [`RETRY_CAP`]
async fn with_retry<T, F, Fut>(what: &str, op: F) -> reqwest::Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = reqwest::Result<T>>,
{
    let mut delay = RETRY_BASE;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < RETRY_ATTEMPTS => {
                warn!(%err, attempt, "request for {what} failed, retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(RETRY_CAP);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

impl RegistryClient for HttpClient {
    async fn layer_list(&self) -> Result<String> {
        let url = self.endpoint();
        with_retry("layer list", || async {
            self.client
                .get(&url)
                .query(&[("in", "layers")])
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        })
        .await
        .context("failed to fetch layer list")
    }

    async fn query_layer(&self, aoi: &str, layer_id: u32) -> Result<String> {
        let url = self.endpoint();
        let layer_id = layer_id.to_string();
        with_retry("layer query", || async {
            self.client
                .post(&url)
                .query(&[
                    ("in", "objects"),
                    ("layer_id", layer_id.as_str()),
                    ("operation", "fw"),
                ])
                .form(&[("requestArea", aoi), ("srs", REQUEST_SRS)])
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        })
        .await
        .with_context(|| format!("failed to query layer {layer_id}"))
    }

    async fn fetch_info(&self, url: &str) -> Result<String> {
        let absolute = if url.contains("metsad.ee") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url.trim_start_matches('/'))
        };
        let body = with_retry("detail page", || async {
            self.client
                .get(&absolute)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        })
        .await
        .with_context(|| format!("failed to fetch detail page {url}"))?;
        Ok(body.replace("\r\n", "\n").trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_urls_resolve_against_base() {
        let client = HttpClient::with_base_url("http://localhost:9999/avalik/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/avalik/flashconf.php");
    }

    #[test]
    fn test_flash_headers_present() {
        let headers = flash_headers();
        assert!(headers.contains_key(ORIGIN));
        assert_eq!(
            headers.get("X-Requested-With").unwrap(),
            "ShockwaveFlash/26.0.0.131"
        );
    }
}
