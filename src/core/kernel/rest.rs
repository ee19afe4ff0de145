use crate::core::errors::ExchangeError;
use crate::core::kernel::classifier::ErrorClassifier;
use crate::core::kernel::signer::encode_query;
use crate::core::types::{HttpMethod, Params};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio_retry::RetryIf;
use tracing::{debug, instrument, trace, warn};

/// Statuses worth retrying by default. 429 is deliberately absent: it means
/// the caller is going too fast and has to slow down on its own.
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 13] = [
    408, 420, 500, 501, 502, 503, 504, 520, 521, 522, 523, 524, 525,
];

const TOO_MANY_REQUESTS: u16 = 429;

/// Retry and backoff settings for transport failures and transient statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for every further attempt
    pub backoff_base: Duration,
    pub retryable_statuses: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_base: Duration::from_secs(1),
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.into_iter().collect(),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Stop retrying a status, for exchanges where it signals a client error
    pub fn without_status(mut self, status: u16) -> Self {
        self.retryable_statuses.remove(&status);
        self
    }

    pub fn retries_status(&self, status: u16) -> bool {
        status != TOO_MANY_REQUESTS && self.retryable_statuses.contains(&status)
    }

    /// `backoff_base * 2^(attempt-1)` for every retry after the first attempt
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let base = self.backoff_base;
        (0..self.max_attempts.saturating_sub(1)).map(move |n| base.saturating_mul(1_u32 << n.min(16)))
    }

    fn should_retry(&self, err: &ExchangeError) -> bool {
        match err {
            ExchangeError::Timeout { .. } | ExchangeError::Connection { .. } => true,
            ExchangeError::Http { status, .. } => self.retries_status(*status),
            _ => false,
        }
    }
}

/// How a successful response body is turned into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    /// Newline-delimited records, each `<timestamp><separator><json>`; the
    /// first record is returned.
    TimestampPrefixed { separator: char },
}

impl ResponseFormat {
    /// Decode a successful body. An empty body decodes to `null`.
    pub fn decode(self, body: &[u8]) -> Result<Value, String> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        match self {
            Self::Json => serde_json::from_slice(body).map_err(|e| e.to_string()),
            Self::TimestampPrefixed { separator } => {
                let text = std::str::from_utf8(body).map_err(|e| e.to_string())?;
                let record = text
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or_default();
                let (_timestamp, payload) = record
                    .split_once(separator)
                    .ok_or_else(|| format!("Record has no timestamp prefix: {}", record))?;
                serde_json::from_str(payload).map_err(|e| e.to_string())
            }
        }
    }
}

/// A fully built request, ready to go on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    /// Scheme, host and path, without query string
    pub url: String,
    pub params: Params,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl PreparedRequest {
    /// URL including the encoded query string
    pub fn full_url(&self) -> String {
        if self.params.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, encode_query(&self.params))
        }
    }
}

/// REST client trait for executing prepared requests
///
/// Implementations own retries, timeouts and decoding; callers only see the
/// decoded JSON or a classified `ExchangeError`.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn execute(&self, request: &PreparedRequest) -> Result<Value, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    pub connect_timeout: Duration,
    /// Budget for the whole exchange once connected
    pub read_timeout: Duration,
    pub user_agent: String,
    pub retry_policy: RetryPolicy,
    pub response_format: ResponseFormat,
    pub classifier: ErrorClassifier,
}

impl RestClientConfig {
    pub fn new(exchange_name: String) -> Self {
        Self {
            exchange_name,
            connect_timeout: Duration::from_millis(3050),
            read_timeout: Duration::from_secs(30),
            user_agent: "exchange-apis/0.1".to_string(),
            retry_policy: RetryPolicy::default(),
            response_format: ResponseFormat::Json,
            classifier: ErrorClassifier::default(),
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = response_format;
        self
    }

    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.config.retry_policy = retry_policy;
        self
    }

    /// Build the REST client. The HTTP connection pool is created on first use.
    pub fn build(self) -> ReqwestRest {
        ReqwestRest {
            client: OnceCell::new(),
            config: self.config,
        }
    }
}

/// Implementation of `RestClient` using reqwest, with one keep-alive pool per instance
pub struct ReqwestRest {
    client: OnceCell<Client>,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("connected", &self.client.initialized())
            .finish()
    }
}

impl ReqwestRest {
    pub fn new(config: RestClientConfig) -> Self {
        RestClientBuilder::new(config).build()
    }

    pub const fn config(&self) -> &RestClientConfig {
        &self.config
    }

    async fn client(&self) -> Result<&Client, ExchangeError> {
        self.client
            .get_or_try_init(|| async {
                Client::builder()
                    .connect_timeout(self.config.connect_timeout)
                    .timeout(self.config.connect_timeout + self.config.read_timeout)
                    .user_agent(&self.config.user_agent)
                    .build()
                    .map_err(|e| {
                        ExchangeError::InvalidParameters(format!(
                            "Failed to build HTTP client: {}",
                            e
                        ))
                    })
            })
            .await
    }

    fn transport_error(method: HttpMethod, url: &str, err: &reqwest::Error) -> ExchangeError {
        if err.is_timeout() {
            ExchangeError::Timeout {
                method,
                url: url.to_string(),
            }
        } else {
            ExchangeError::Connection {
                method,
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// One attempt: send, read the body, classify or decode
    async fn send_once(
        &self,
        client: &Client,
        request: &PreparedRequest,
        url: &str,
    ) -> Result<Value, ExchangeError> {
        let method = request.method;
        let mut builder = client.request(method.into(), url);

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ExchangeError::InvalidParameters(format!("Invalid header name {}: {}", name, e))
            })?;
            let value = HeaderValue::from_bytes(value.as_bytes()).map_err(|e| {
                ExchangeError::InvalidParameters(format!("Invalid value for header {}: {}", name.as_str(), e))
            })?;
            builder = builder.header(name, value);
        }

        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::transport_error(method, url, &e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(method, url, &e))?;

        trace!("Response body: {}", String::from_utf8_lossy(&body));

        if !status.is_success() {
            return Err(ExchangeError::Http {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                message: self.config.classifier.classify(&body, content_type.as_deref()),
            });
        }

        self.config
            .response_format
            .decode(&body)
            .map_err(|message| ExchangeError::Decode {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                message,
            })
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, request), fields(exchange = %self.config.exchange_name, method = %request.method, url = %request.url))]
    async fn execute(&self, request: &PreparedRequest) -> Result<Value, ExchangeError> {
        if request.method == HttpMethod::Get && !request.body.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "GET requests carry parameters in the query string, never a body".to_string(),
            ));
        }

        let url = request.full_url();
        debug!("Requesting {} {}", request.method, url);
        if !request.headers.is_empty() {
            let names: Vec<&str> = request.headers.iter().map(|(k, _)| k.as_str()).collect();
            debug!("Request headers: {:?}", names);
        }

        let client = self.client().await?;
        let policy = &self.config.retry_policy;
        let attempt = AtomicU32::new(0);

        RetryIf::start(
            policy.delays(),
            || {
                attempt.fetch_add(1, Ordering::Relaxed);
                self.send_once(client, request, &url)
            },
            |err: &ExchangeError| {
                let retry = policy.should_retry(err);
                if retry {
                    warn!(
                        attempt = attempt.load(Ordering::Relaxed),
                        max_attempts = policy.max_attempts,
                        "Retrying after transient failure: {}",
                        err
                    );
                }
                retry
            },
        )
        .await
    }
}
