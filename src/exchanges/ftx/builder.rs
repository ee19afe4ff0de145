use crate::core::adapter::{AdapterProfile, ExchangeAdapter, PathLayout, Routing};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{NonceScale, RateLimit, Signer};
use crate::exchanges::ftx::{FtxCodec, FtxSigner};
use nonzero_ext::nonzero;
use std::sync::Arc;

pub const BASE_URL: &str = "https://ftx.com";

/// Unversioned `/api/{endpoint}`, at most 60 calls per second
pub fn profile() -> AdapterProfile {
    AdapterProfile::new(
        "ftx",
        Routing::Single(BASE_URL.to_string()),
        PathLayout::unversioned("api"),
    )
    .with_nonce_scale(NonceScale::Millis)
    .with_rate_limit(RateLimit::per_second(nonzero!(60u32)))
}

pub fn build_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    let signer: Option<Arc<dyn Signer>> = match (config.api_key(), config.secret_key()) {
        (Some(key), Some(secret)) => Some(Arc::new(FtxSigner::new(
            key.to_string(),
            secret.to_string(),
            config.subaccount.clone(),
        ))),
        _ => None,
    };

    let profile = profile().with_base_url_override(config.base_url.as_deref());
    Ok(ExchangeAdapter::new(profile, signer, Arc::new(FtxCodec)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BusinessRequest;

    #[test]
    fn test_version_is_ignored() {
        assert_eq!(
            profile().resolve(&BusinessRequest::get(7, "markets")),
            (BASE_URL, "/api/markets".to_string())
        );
    }
}
