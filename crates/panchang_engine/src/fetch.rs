use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use panchang_core::DateSpec;
use panchang_logging::{panchang_debug, panchang_info, panchang_warn};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, USER_AGENT,
};
use url::Url;

use crate::connectivity::{ConnectivityProbe, ProbeSettings, TcpProbe};
use crate::{FailureKind, FetchError, RawDocument};

pub const DEFAULT_ENDPOINT: &str = "https://www.drikpanchang.com/panchang/day-panchang.html";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Retries after the first attempt; a persistent failure costs `max_retries + 1` requests.
    pub max_retries: u32,
    /// Retry `n` waits `backoff_factor^n` seconds.
    pub backoff_factor: f64,
    pub max_backoff: Duration,
    pub retry_statuses: Vec<u16>,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub probe: ProbeSettings,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff_factor: 2.0,
            max_backoff: Duration::from_secs(60),
            retry_statuses: vec![429, 500, 502, 503, 504],
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            probe: ProbeSettings::default(),
        }
    }
}

impl FetchSettings {
    /// Delay before retry number `retry` (1-based), capped at `max_backoff`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self
            .backoff_factor
            .powi(exponent)
            .min(self.max_backoff.as_secs_f64());
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}

/// Target URL for `date`: the endpoint with `date=DD/MM/YYYY` appended to its query.
pub fn page_url(endpoint: &str, date: &DateSpec) -> Result<Url, FetchError> {
    let mut url = Url::parse(endpoint)
        .map_err(|err| FetchError::failed(FailureKind::InvalidRequest, err))?;
    let param = format!("date={}", date.query_format());
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{param}"),
        _ => param,
    };
    url.set_query(Some(&query));
    Ok(url)
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_page(&self, date: &DateSpec) -> Result<RawDocument, FetchError>;
}

pub struct ReqwestFetcher {
    settings: FetchSettings,
    probe: Arc<dyn ConnectivityProbe>,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        let probe = Arc::new(TcpProbe::new(settings.probe.clone()));
        Self { settings, probe }
    }

    /// Use a custom reachability check instead of the TCP probe from the settings.
    pub fn with_probe(settings: FetchSettings, probe: Arc<dyn ConnectivityProbe>) -> Self {
        Self { settings, probe }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (USER_AGENT, self.settings.user_agent.as_str()),
            (ACCEPT, self.settings.accept.as_str()),
            (ACCEPT_LANGUAGE, self.settings.accept_language.as_str()),
            (CONNECTION, "keep-alive"),
        ] {
            let value = HeaderValue::from_str(value)
                .map_err(|err| FetchError::failed(FailureKind::InvalidRequest, err))?;
            headers.insert(name, value);
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::failed(FailureKind::Network, err))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    async fn attempt(&self, client: &reqwest::Client, url: &Url) -> Result<RawDocument, FetchError> {
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::failed(
                FailureKind::HttpStatus(status.as_u16()),
                status,
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, Some(content_len)));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::failed(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    format!("unsupported content type {ct}"),
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(RawDocument {
            bytes,
            content_type,
            final_url,
            attempts: 1,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_page(&self, date: &DateSpec) -> Result<RawDocument, FetchError> {
        let url = page_url(&self.settings.endpoint, date)?;

        if !self.probe.is_connected().await {
            return Err(FetchError::no_connectivity());
        }

        let client = self.build_client()?;
        panchang_info!("Fetching Panchang for {} from {}", date.query_format(), url);

        let mut attempt: u32 = 1;
        loop {
            match self.attempt(&client, &url).await {
                Ok(mut document) => {
                    document.attempts = attempt;
                    panchang_info!(
                        "Fetched {} bytes in {} attempt(s)",
                        document.bytes.len(),
                        attempt
                    );
                    return Ok(document);
                }
                Err(err) => {
                    let retry = attempt;
                    if retry > self.settings.max_retries
                        || !err.kind.is_transient(&self.settings.retry_statuses)
                    {
                        panchang_warn!("Giving up after {} attempt(s): {}", attempt, err.kind);
                        return Err(err);
                    }
                    let delay = self.settings.backoff_delay(retry);
                    panchang_warn!(
                        "Attempt {} failed ({}); retry {}/{} in {:?}",
                        attempt,
                        err.kind,
                        retry,
                        self.settings.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    panchang_debug!("Retrying {}", url);
                }
            }
        }
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> FetchError {
    FetchError::failed(
        FailureKind::TooLarge { max_bytes, actual },
        format!("response larger than {max_bytes} bytes"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::failed(FailureKind::Timeout, err);
    }
    FetchError::failed(FailureKind::Network, err)
}
