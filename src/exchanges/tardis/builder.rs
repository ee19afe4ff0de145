use crate::core::adapter::{AdapterProfile, AuthMode, ExchangeAdapter, PathLayout, Routing};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{BearerSigner, RateLimit, ResponseFormat, RestClientConfig, Signer};
use crate::core::traits::NoPairs;
use nonzero_ext::nonzero;
use std::sync::Arc;

pub const BASE_URL: &str = "https://api.tardis.dev";

/// Replay responses are newline-delimited `<timestamp> <json>` records
pub const RECORD_FORMAT: ResponseFormat = ResponseFormat::TimestampPrefixed { separator: ' ' };

pub fn profile() -> AdapterProfile {
    let rest = RestClientConfig::new("tardis".to_string()).with_response_format(RECORD_FORMAT);

    AdapterProfile::new(
        "tardis",
        Routing::Single(BASE_URL.to_string()),
        PathLayout::versioned(),
    )
    .with_auth_mode(AuthMode::Always)
    .with_rate_limit(RateLimit::per_second(nonzero!(100u32)))
    .with_rest_config(rest)
}

/// The API key is sent as a bearer token on every call when configured
pub fn build_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    let signer: Option<Arc<dyn Signer>> = config
        .api_key()
        .map(|key| Arc::new(BearerSigner::new(key.to_string())) as Arc<dyn Signer>);

    let profile = profile().with_base_url_override(config.base_url.as_deref());
    Ok(ExchangeAdapter::new(
        profile,
        signer,
        Arc::new(NoPairs { exchange: "tardis" }),
    ))
}
