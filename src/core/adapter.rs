//! Configuration-driven exchange adapter.
//!
//! Every supported exchange is one `ExchangeAdapter` parameterized by an
//! `AdapterProfile` (hosts, path layout, limits, parsers) plus a signer and a
//! symbol codec chosen at construction.

use crate::core::{
    errors::ExchangeError,
    kernel::{
        CallLimiter, NonceGenerator, NonceRejection, NonceScale, PreparedRequest, RateLimit,
        ReqwestRest, RestClient, RestClientConfig, SignedEnvelope, Signer, SigningRequest,
    },
    traits::{ExchangeApi, SymbolCodec},
    types::{Body, BusinessRequest, HttpMethod, SymbolPair, TradeRecord},
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Sent with every request; signer headers of the same name take precedence.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json"),
];

/// Host selection for an exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routing {
    Single(String),
    /// Unauthenticated calls on `public_versions` go to a separate host
    SplitPublic {
        private: String,
        public: String,
        public_versions: Vec<u32>,
    },
    /// Endpoints starting with `prefix` go to `host` as `/{endpoint}`, outside the path layout
    EndpointHost {
        default: String,
        prefix: String,
        host: String,
    },
}

impl Routing {
    /// Point every host at `base_url`, keeping the routing shape
    pub fn with_base_url(self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        match self {
            Self::Single(_) => Self::Single(base_url),
            Self::SplitPublic {
                public_versions, ..
            } => Self::SplitPublic {
                private: base_url.clone(),
                public: base_url,
                public_versions,
            },
            Self::EndpointHost { prefix, .. } => Self::EndpointHost {
                default: base_url.clone(),
                prefix,
                host: base_url,
            },
        }
    }
}

/// How `(api_version, endpoint)` becomes a path on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    /// Leading segment such as `api`, `sapi` or `fapi`
    pub prefix: Option<String>,
    /// Whether a `v{n}` segment follows the prefix
    pub versioned: bool,
}

impl PathLayout {
    /// `/v{n}/{endpoint}`
    pub fn versioned() -> Self {
        Self {
            prefix: None,
            versioned: true,
        }
    }

    /// `/{prefix}/v{n}/{endpoint}`
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
            versioned: true,
        }
    }

    /// `/{prefix}/{endpoint}`, the version is ignored
    pub fn unversioned(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
            versioned: false,
        }
    }

    pub fn path(&self, api_version: u32, endpoint: &str) -> String {
        let mut path = String::new();
        if let Some(prefix) = &self.prefix {
            path.push('/');
            path.push_str(prefix);
        }
        if self.versioned {
            path.push_str(&format!("/v{}", api_version));
        }
        path.push('/');
        path.push_str(endpoint);
        path
    }

    /// Reject endpoints that already carry this layout's own leading segment.
    pub fn check_endpoint(&self, endpoint: &str) -> Result<(), ExchangeError> {
        if endpoint.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "endpoint must not be empty".to_string(),
            ));
        }

        if endpoint.contains('?') {
            return Err(ExchangeError::InvalidParameters(format!(
                "endpoint must not carry a query string, pass it as params: {}",
                endpoint
            )));
        }

        let relative = endpoint.trim_start_matches('/');
        let first = relative.split('/').next().unwrap_or_default();
        let doubled = match &self.prefix {
            Some(prefix) => first == prefix.as_str(),
            None => self.versioned && is_version_segment(first),
        };

        if doubled {
            return Err(ExchangeError::InvalidParameters(format!(
                "endpoint should not be a full path, but the url after the API prefix: {}",
                endpoint
            )));
        }
        if relative.len() != endpoint.len() {
            return Err(ExchangeError::InvalidParameters(format!(
                "endpoint must be relative: {}",
                endpoint
            )));
        }
        Ok(())
    }
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// When credentials are attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Only when the caller asks for an authenticated call
    #[default]
    OnRequest,
    /// On every call; the key doubles as an access token
    Always,
}

/// A fixed call whose response is turned into typed data by `parse`
pub struct DataSource<T> {
    pub api_version: u32,
    pub endpoint: &'static str,
    pub authenticate: bool,
    pub parse: fn(&Value) -> Result<T, ExchangeError>,
}

impl<T> std::fmt::Debug for DataSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .field("authenticate", &self.authenticate)
            .finish_non_exhaustive()
    }
}

impl<T> DataSource<T> {
    fn request(&self) -> BusinessRequest {
        let request = BusinessRequest::get(self.api_version, self.endpoint);
        if self.authenticate {
            request.authenticated()
        } else {
            request
        }
    }
}

pub type SymbolListing = DataSource<Vec<(String, SymbolPair)>>;
pub type TradeHistorySource = DataSource<Vec<TradeRecord>>;

/// Everything that distinguishes one exchange from another, apart from
/// signing and symbol notation.
#[derive(Debug)]
pub struct AdapterProfile {
    pub name: String,
    pub routing: Routing,
    pub layout: PathLayout,
    /// `None` accepts any version
    pub supported_versions: Option<Vec<u32>>,
    pub auth_mode: AuthMode,
    pub nonce_scale: NonceScale,
    pub nonce_rejection: Option<NonceRejection>,
    pub rate_limit: Option<RateLimit>,
    /// Send `{}` instead of nothing on POST/DELETE without a body
    pub empty_body_as_object: bool,
    pub symbol_listing: Option<SymbolListing>,
    pub trade_history: Option<TradeHistorySource>,
    pub rest: RestClientConfig,
}

impl AdapterProfile {
    pub fn new(name: &str, routing: Routing, layout: PathLayout) -> Self {
        Self {
            name: name.to_string(),
            routing,
            layout,
            supported_versions: None,
            auth_mode: AuthMode::OnRequest,
            nonce_scale: NonceScale::TenMillionths,
            nonce_rejection: None,
            rate_limit: None,
            empty_body_as_object: false,
            symbol_listing: None,
            trade_history: None,
            rest: RestClientConfig::new(name.to_string()),
        }
    }

    pub fn with_supported_versions(mut self, versions: &[u32]) -> Self {
        self.supported_versions = Some(versions.to_vec());
        self
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn with_nonce_scale(mut self, scale: NonceScale) -> Self {
        self.nonce_scale = scale;
        self
    }

    pub fn with_nonce_rejection(mut self, rejection: NonceRejection) -> Self {
        self.nonce_rejection = Some(rejection);
        self
    }

    pub fn with_rate_limit(mut self, limit: RateLimit) -> Self {
        self.rate_limit = Some(limit);
        self
    }

    pub fn with_empty_body_as_object(mut self) -> Self {
        self.empty_body_as_object = true;
        self
    }

    pub fn with_symbol_listing(mut self, listing: SymbolListing) -> Self {
        self.symbol_listing = Some(listing);
        self
    }

    pub fn with_trade_history(mut self, source: TradeHistorySource) -> Self {
        self.trade_history = Some(source);
        self
    }

    pub fn with_rest_config(mut self, rest: RestClientConfig) -> Self {
        self.rest = rest;
        self
    }

    /// Apply a caller-supplied base URL, if any, to every host
    pub fn with_base_url_override(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.routing = self.routing.with_base_url(url);
        }
        self
    }

    fn check_version(&self, api_version: u32) -> Result<(), ExchangeError> {
        match &self.supported_versions {
            Some(versions) if !versions.contains(&api_version) => {
                Err(ExchangeError::InvalidParameters(format!(
                    "{} supports API versions {:?}, got {}",
                    self.name, versions, api_version
                )))
            }
            _ => Ok(()),
        }
    }

    /// Host and path for a request
    pub fn resolve(&self, request: &BusinessRequest) -> (&str, String) {
        let layout_path = || self.layout.path(request.api_version, &request.endpoint);
        match &self.routing {
            Routing::Single(base) => (base.as_str(), layout_path()),
            Routing::SplitPublic {
                private,
                public,
                public_versions,
            } => {
                if !request.authenticate && public_versions.contains(&request.api_version) {
                    (public.as_str(), layout_path())
                } else {
                    (private.as_str(), layout_path())
                }
            }
            Routing::EndpointHost {
                default,
                prefix,
                host,
            } => {
                if request.endpoint.starts_with(prefix.as_str()) {
                    (host.as_str(), format!("/{}", request.endpoint))
                } else {
                    (default.as_str(), layout_path())
                }
            }
        }
    }
}

fn merge_headers(signed: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = DEFAULT_HEADERS
        .iter()
        .filter(|(name, _)| !signed.iter().any(|(k, _)| k.eq_ignore_ascii_case(name)))
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect();
    headers.extend(signed);
    headers
}

/// One exchange: profile, signer and codec over a shared request executor
pub struct ExchangeAdapter<R: RestClient = ReqwestRest> {
    profile: AdapterProfile,
    signer: Option<Arc<dyn Signer>>,
    codec: Arc<dyn SymbolCodec>,
    rest: R,
    nonces: NonceGenerator,
    limiter: Option<CallLimiter>,
}

impl<R: RestClient> std::fmt::Debug for ExchangeAdapter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeAdapter")
            .field("profile", &self.profile)
            .field("authenticated", &self.signer.is_some())
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl ExchangeAdapter<ReqwestRest> {
    pub fn new(
        profile: AdapterProfile,
        signer: Option<Arc<dyn Signer>>,
        codec: Arc<dyn SymbolCodec>,
    ) -> Self {
        let rest = ReqwestRest::new(profile.rest.clone());
        Self::with_rest(profile, signer, codec, rest)
    }
}

impl<R: RestClient> ExchangeAdapter<R> {
    /// Build over a custom executor
    pub fn with_rest(
        profile: AdapterProfile,
        signer: Option<Arc<dyn Signer>>,
        codec: Arc<dyn SymbolCodec>,
        rest: R,
    ) -> Self {
        let limiter = profile
            .rate_limit
            .map(|limit| CallLimiter::new(&profile.name, limit));
        Self {
            nonces: NonceGenerator::new(profile.nonce_scale),
            profile,
            signer,
            codec,
            rest,
            limiter,
        }
    }

    pub const fn profile(&self) -> &AdapterProfile {
        &self.profile
    }

    pub fn codec(&self) -> &dyn SymbolCodec {
        self.codec.as_ref()
    }

    pub fn can_authenticate(&self) -> bool {
        self.signer.is_some()
    }

    fn outgoing_body(&self, request: &BusinessRequest) -> Body {
        if request.body.is_empty()
            && request.method != HttpMethod::Get
            && self.profile.empty_body_as_object
        {
            Body::Json(Value::Object(serde_json::Map::new()))
        } else {
            request.body.clone()
        }
    }

    fn signer_for(&self, request: &BusinessRequest) -> Result<Option<&dyn Signer>, ExchangeError> {
        match (request.authenticate, self.profile.auth_mode, &self.signer) {
            (true, _, None) => Err(ExchangeError::AuthError(format!(
                "{} needs credentials for authenticated endpoint {}",
                self.profile.name, request.endpoint
            ))),
            (true, _, Some(signer)) | (false, AuthMode::Always, Some(signer)) => {
                Ok(Some(signer.as_ref()))
            }
            (false, AuthMode::Always, None) => {
                debug!("No credentials configured, sending without authorization");
                Ok(None)
            }
            (false, AuthMode::OnRequest, _) => Ok(None),
        }
    }

    fn is_nonce_rejection(&self, message: &str) -> bool {
        self.profile
            .nonce_rejection
            .as_ref()
            .is_some_and(|rule| rule.matches(message))
    }

    fn prepare(
        &self,
        request: &BusinessRequest,
        url: &str,
        signing: &SigningRequest<'_>,
        signer: Option<&dyn Signer>,
        attempt: u32,
    ) -> Result<PreparedRequest, ExchangeError> {
        let envelope = match signer {
            Some(signer) => signer.sign(signing, self.nonces.next(u64::from(attempt)))?,
            None => SignedEnvelope::passthrough(signing)?,
        };
        Ok(PreparedRequest {
            method: request.method,
            url: url.to_string(),
            params: envelope.params,
            headers: merge_headers(envelope.headers),
            body: envelope.body,
        })
    }
}

#[async_trait]
impl<R: RestClient> ExchangeApi for ExchangeAdapter<R> {
    fn name(&self) -> &str {
        &self.profile.name
    }

    #[instrument(skip(self, request), fields(exchange = %self.profile.name, method = %request.method, endpoint = %request.endpoint))]
    async fn business_request(&self, request: BusinessRequest) -> Result<Value, ExchangeError> {
        self.profile.check_version(request.api_version)?;
        self.profile.layout.check_endpoint(&request.endpoint)?;

        let signer = self.signer_for(&request)?;
        let (base_url, path) = self.profile.resolve(&request);
        let url = format!("{}{}", base_url, path);
        let body = self.outgoing_body(&request);
        let signing = SigningRequest {
            method: request.method,
            path: &path,
            params: &request.params,
            body: &body,
            api_version: request.api_version,
        };

        // Re-signing only helps when a nonce went into the signature
        let max_attempts = match (signer, &self.profile.nonce_rejection) {
            (Some(_), Some(rule)) => rule.max_attempts,
            _ => 1,
        };
        let mut rejected = (None, String::new());

        for attempt in 0..max_attempts {
            if let Some(limiter) = &self.limiter {
                limiter.acquire().await;
            }

            let prepared = self.prepare(&request, &url, &signing, signer, attempt)?;
            match self.rest.execute(&prepared).await {
                Err(ExchangeError::Http {
                    status, message, ..
                }) if self.is_nonce_rejection(&message) => {
                    if attempt + 1 < max_attempts {
                        warn!(
                            attempt = attempt + 1,
                            max_attempts, "Nonce rejected, signing again: {}", message
                        );
                    }
                    rejected = (Some(status), message);
                }
                other => return other,
            }
        }

        Err(ExchangeError::NonceRejected {
            method: request.method,
            url,
            status: rejected.0,
            message: rejected.1,
            attempts: max_attempts,
        })
    }

    fn get_symbol(&self, stake_currency: &str, trade_currency: &str) -> Result<String, ExchangeError> {
        self.codec.encode(trade_currency, stake_currency)
    }

    fn get_pair(&self, symbol: &str) -> Result<String, ExchangeError> {
        self.codec.decode(symbol).map(|pair| pair.to_string())
    }

    #[instrument(skip(self), fields(exchange = %self.profile.name))]
    async fn refresh_symbols(&self) -> Result<usize, ExchangeError> {
        let (Some(listing), Some(cache)) = (&self.profile.symbol_listing, self.codec.cache()) else {
            return Ok(0);
        };

        info!("Loading {} symbol listing", self.profile.name);
        let value = self.business_request(listing.request()).await?;
        let entries = (listing.parse)(&value)?;
        Ok(cache.extend(entries))
    }

    #[instrument(skip(self), fields(exchange = %self.profile.name))]
    async fn trade_history(&self) -> Result<Vec<TradeRecord>, ExchangeError> {
        let source = self.profile.trade_history.as_ref().ok_or_else(|| {
            ExchangeError::NotSupported(format!(
                "{} does not provide trade history",
                self.profile.name
            ))
        })?;

        let value = self.business_request(source.request()).await?;
        let history = (source.parse)(&value)?;
        debug!("Parsed {} trades", history.len());
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::NoPairs;
    use std::sync::Mutex;

    /// Records every prepared request and answers from a script
    struct ScriptedRest {
        seen: Mutex<Vec<PreparedRequest>>,
        reply: fn(&PreparedRequest) -> Result<Value, ExchangeError>,
    }

    impl ScriptedRest {
        fn new(reply: fn(&PreparedRequest) -> Result<Value, ExchangeError>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply,
            }
        }

        fn seen(&self) -> Vec<PreparedRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RestClient for ScriptedRest {
        async fn execute(&self, request: &PreparedRequest) -> Result<Value, ExchangeError> {
            self.seen.lock().unwrap().push(request.clone());
            (self.reply)(request)
        }
    }

    struct NonceHeaderSigner;

    impl Signer for NonceHeaderSigner {
        fn sign(
            &self,
            request: &SigningRequest<'_>,
            nonce: crate::core::kernel::Nonce,
        ) -> crate::core::kernel::SignatureResult {
            Ok(SignedEnvelope::passthrough(request)?.with_header("X-Nonce", nonce.to_string()))
        }
    }

    fn ok(_: &PreparedRequest) -> Result<Value, ExchangeError> {
        Ok(Value::Null)
    }

    fn stale_nonce(request: &PreparedRequest) -> Result<Value, ExchangeError> {
        Err(ExchangeError::Http {
            method: request.method,
            url: request.url.clone(),
            status: 400,
            message: "Nonce is too small.".to_string(),
        })
    }

    fn adapter(
        profile: AdapterProfile,
        signer: Option<Arc<dyn Signer>>,
        reply: fn(&PreparedRequest) -> Result<Value, ExchangeError>,
    ) -> ExchangeAdapter<ScriptedRest> {
        ExchangeAdapter::with_rest(
            profile,
            signer,
            Arc::new(NoPairs { exchange: "test" }),
            ScriptedRest::new(reply),
        )
    }

    fn split_profile() -> AdapterProfile {
        AdapterProfile::new(
            "test",
            Routing::SplitPublic {
                private: "https://private.example".to_string(),
                public: "https://public.example".to_string(),
                public_versions: vec![2],
            },
            PathLayout::versioned(),
        )
        .with_supported_versions(&[1, 2])
    }

    #[test]
    fn test_layout_paths() {
        assert_eq!(PathLayout::versioned().path(1, "offer/cancel"), "/v1/offer/cancel");
        assert_eq!(PathLayout::prefixed("sapi").path(1, "margin/account"), "/sapi/v1/margin/account");
        assert_eq!(PathLayout::unversioned("api").path(9, "markets"), "/api/markets");
    }

    #[test]
    fn test_double_prefix_is_rejected() {
        assert!(PathLayout::prefixed("api").check_endpoint("/api/v3/account").is_err());
        assert!(PathLayout::prefixed("api").check_endpoint("api/v3/account").is_err());
        assert!(PathLayout::unversioned("api").check_endpoint("api").is_err());
        assert!(PathLayout::versioned().check_endpoint("/v1/offer/cancel").is_err());
        assert!(PathLayout::versioned().check_endpoint("v2/auth/r/wallets").is_err());
        assert!(PathLayout::versioned().check_endpoint("/offers").is_err());

        assert!(PathLayout::prefixed("api").check_endpoint("apiKeys").is_ok());
        assert!(PathLayout::versioned().check_endpoint("vault/v1").is_ok());
        assert!(PathLayout::versioned().check_endpoint("offer/cancel").is_ok());
    }

    #[test]
    fn test_query_in_endpoint_is_rejected() {
        assert!(matches!(
            PathLayout::versioned().check_endpoint("candlesticks?pair=btcusd"),
            Err(ExchangeError::InvalidParameters(_))
        ));
        assert!(PathLayout::unversioned("api").check_endpoint("markets?depth=1").is_err());
    }

    #[test]
    fn test_split_routing() {
        let profile = split_profile();
        let public = BusinessRequest::get(2, "platform/status");
        let private = BusinessRequest::post(2, "auth/r/wallets").authenticated();
        let v1 = BusinessRequest::get(1, "pubticker/btcusd");

        assert_eq!(profile.resolve(&public), ("https://public.example", "/v2/platform/status".to_string()));
        assert_eq!(profile.resolve(&private).0, "https://private.example");
        assert_eq!(profile.resolve(&v1).0, "https://private.example");
    }

    #[test]
    fn test_endpoint_host_routing() {
        let profile = AdapterProfile::new(
            "test",
            Routing::EndpointHost {
                default: "https://api.example".to_string(),
                prefix: "candlesticks".to_string(),
                host: "https://charts.example".to_string(),
            },
            PathLayout::versioned(),
        );

        let candles = BusinessRequest::get(1, "candlesticks");
        assert_eq!(
            profile.resolve(&candles),
            ("https://charts.example", "/candlesticks".to_string())
        );
        assert_eq!(
            profile.resolve(&BusinessRequest::get(1, "offers")),
            ("https://api.example", "/v1/offers".to_string())
        );
    }

    #[test]
    fn test_base_url_override_keeps_routing_shape() {
        let profile = split_profile().with_base_url_override(Some("http://127.0.0.1:1234/"));
        let public = BusinessRequest::get(2, "platform/status");
        assert_eq!(profile.resolve(&public).0, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_signer_headers_override_defaults() {
        let headers = merge_headers(vec![("content-type".to_string(), "text/plain".to_string())]);
        assert_eq!(headers.len(), 2);
        assert!(headers.iter().any(|(k, v)| k == "Accept" && v == "application/json"));
        assert!(headers.iter().any(|(k, v)| k == "content-type" && v == "text/plain"));
    }

    #[tokio::test]
    async fn test_unsupported_version_fails_before_network() {
        let adapter = adapter(split_profile(), None, ok);
        let result = adapter.business_request(BusinessRequest::get(3, "ticker")).await;
        assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));
        assert!(adapter.rest.seen().is_empty());
    }

    #[tokio::test]
    async fn test_authenticated_call_without_credentials() {
        let adapter = adapter(split_profile(), None, ok);
        let result = adapter
            .business_request(BusinessRequest::post(1, "balances").authenticated())
            .await;
        assert!(matches!(result, Err(ExchangeError::AuthError(_))));
        assert!(adapter.rest.seen().is_empty());
    }

    #[tokio::test]
    async fn test_empty_post_body_becomes_object() {
        let profile = split_profile().with_empty_body_as_object();
        let adapter = adapter(profile, None, ok);
        adapter
            .business_request(BusinessRequest::post(1, "order/new"))
            .await
            .unwrap();
        adapter
            .business_request(BusinessRequest::get(1, "pubticker/btcusd"))
            .await
            .unwrap();

        let seen = adapter.rest.seen();
        assert_eq!(seen[0].body, b"{}");
        assert!(seen[1].body.is_empty());
        assert_eq!(seen[0].headers.len(), DEFAULT_HEADERS.len());
    }

    #[tokio::test]
    async fn test_nonce_rejection_is_bounded() {
        let profile = split_profile().with_nonce_rejection(NonceRejection::new(["Nonce is too small."], 4));
        let adapter = adapter(profile, Some(Arc::new(NonceHeaderSigner)), stale_nonce);

        let result = adapter
            .business_request(BusinessRequest::post(1, "balances").authenticated())
            .await;
        match result {
            Err(ExchangeError::NonceRejected {
                attempts, status, ..
            }) => {
                assert_eq!(attempts, 4);
                assert_eq!(status, Some(400));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let nonces: Vec<u64> = adapter
            .rest
            .seen()
            .iter()
            .map(|r| {
                r.headers
                    .iter()
                    .find(|(k, _)| k == "X-Nonce")
                    .map(|(_, v)| v.parse().unwrap())
                    .unwrap()
            })
            .collect();
        assert_eq!(nonces.len(), 4);
        assert!(nonces.windows(2).all(|w| w[1] > w[0]));
    }

    #[tokio::test]
    async fn test_public_nonce_message_is_not_retried() {
        let profile = split_profile().with_nonce_rejection(NonceRejection::new(["Nonce is too small."], 4));
        let adapter = adapter(profile, None, stale_nonce);

        let result = adapter.business_request(BusinessRequest::get(1, "nonce")).await;
        assert!(matches!(
            result,
            Err(ExchangeError::NonceRejected { attempts: 1, .. })
        ));
        assert_eq!(adapter.rest.seen().len(), 1);
    }

    #[tokio::test]
    async fn test_no_history_source_is_not_supported() {
        let adapter = adapter(split_profile(), None, ok);
        assert!(matches!(
            adapter.trade_history().await,
            Err(ExchangeError::NotSupported(_))
        ));
        assert_eq!(adapter.refresh_symbols().await.unwrap(), 0);
    }
}
