use crate::core::adapter::{AdapterProfile, ExchangeAdapter, PathLayout, Routing};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{NonceScale, RestClientConfig, RetryPolicy, Signer};
use crate::core::traits::NoPairs;
use crate::exchanges::shrimpy::ShrimpySigner;
use std::sync::Arc;

pub const BASE_URL: &str = "https://api.shrimpy.io";

/// Shrimpy answers bad requests and bad credentials with a 500; retrying those hides the problem.
pub const CLIENT_ERROR_STATUS: u16 = 500;

pub fn profile() -> AdapterProfile {
    let rest = RestClientConfig::new("shrimpy".to_string())
        .with_retry_policy(RetryPolicy::default().without_status(CLIENT_ERROR_STATUS));

    AdapterProfile::new(
        "shrimpy",
        Routing::Single(BASE_URL.to_string()),
        PathLayout::versioned(),
    )
    .with_nonce_scale(NonceScale::Millis)
    .with_rest_config(rest)
}

/// Positions are tracked per currency, so the connector has no symbol codec
pub fn build_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    let signer: Option<Arc<dyn Signer>> = match (config.api_key(), config.secret_key()) {
        (Some(key), Some(secret)) => Some(Arc::new(ShrimpySigner::new(
            key.to_string(),
            secret.to_string(),
        ))),
        _ => None,
    };

    let profile = profile().with_base_url_override(config.base_url.as_deref());
    Ok(ExchangeAdapter::new(
        profile,
        signer,
        Arc::new(NoPairs {
            exchange: "shrimpy",
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::ExchangeApi;

    #[test]
    fn test_500_is_not_retried() {
        let policy = profile().rest.retry_policy;
        assert!(!policy.retries_status(500));
        assert!(policy.retries_status(502));
    }

    #[test]
    fn test_symbols_not_supported() {
        let adapter = build_connector(&ExchangeConfig::read_only()).unwrap();
        assert!(matches!(
            adapter.get_symbol("USD", "BTC"),
            Err(ExchangeError::NotSupported(_))
        ));
    }
}
