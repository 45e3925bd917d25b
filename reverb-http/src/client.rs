//! Replay transport implementation

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Url,
};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::debug;

use reverb_config::HttpConfig;

use crate::errors::HttpError;
use crate::types::{OutboundRequest, ReplayResponse};

/// Issues one replayed request against the target
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`, resolving within [`Transport::request_timeout`]
    async fn send(&self, request: &OutboundRequest) -> Result<ReplayResponse, HttpError>;

    /// Upper bound of one `send` call
    fn request_timeout(&self) -> Duration;
}

/// reqwest-backed transport sharing one connection pool
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
    config: HttpConfig,
}

impl HttpManager {
    /// Create a manager with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout.min(config.timeout))
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .build()
            .map_err(|e| HttpError::ConfigError(e.to_string()))?;

        debug!(
            timeout_ms = config.timeout.as_millis() as u64,
            max_redirects = config.max_redirects,
            "Replay transport ready"
        );
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn header_map(request: &OutboundRequest) -> Result<HeaderMap, HttpError> {
        let mut header_map = HeaderMap::new();
        for (key, value) in &request.headers {
            let name = HeaderName::from_str(key)
                .map_err(|_| HttpError::InvalidHeader(key.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeader(format!("{}: {}", key, value)))?;
            header_map.insert(name, value);
        }
        Ok(header_map)
    }
}

#[async_trait::async_trait]
impl Transport for HttpManager {
    async fn send(&self, request: &OutboundRequest) -> Result<ReplayResponse, HttpError> {
        let url = Url::parse(&request.url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        debug!("Replaying {} {}", request.method, url);
        let mut builder = self
            .client
            .request(reqwest::Method::from(request.method), url)
            .headers(Self::header_map(request)?);

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(&request.url, self.config.timeout, e))?;
        let status = response.status().as_u16();

        // Drain the body so the connection returns to the pool
        response
            .bytes()
            .await
            .map_err(|e| HttpError::from_reqwest(&request.url, self.config.timeout, e))?;

        let elapsed = started.elapsed();
        debug!("{} {} -> {} in {:?}", request.method, request.url, status, elapsed);

        Ok(ReplayResponse { status, elapsed })
    }

    fn request_timeout(&self) -> Duration {
        self.config.timeout
    }
}
