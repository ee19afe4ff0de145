use crate::core::adapter::{AdapterProfile, ExchangeAdapter, PathLayout, Routing};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{NonceRejection, NonceScale, Signer};
use crate::exchanges::bitfinex::{BitfinexCodec, BitfinexSigner};
use std::sync::Arc;

pub const PRIVATE_URL: &str = "https://api.bitfinex.com";
pub const PUBLIC_URL: &str = "https://api-pub.bitfinex.com";

/// Messages Bitfinex answers with when a nonce is not above the last one seen
pub const NONCE_TOO_SMALL: [&str; 2] = ["nonce: small", "Nonce is too small."];
pub const NONCE_ATTEMPTS: u32 = 4;

/// v1 for writes, v2 for reads; public v2 traffic has its own host
pub fn profile() -> AdapterProfile {
    AdapterProfile::new(
        "bitfinex",
        Routing::SplitPublic {
            private: PRIVATE_URL.to_string(),
            public: PUBLIC_URL.to_string(),
            public_versions: vec![2],
        },
        PathLayout::versioned(),
    )
    .with_supported_versions(&[1, 2])
    .with_nonce_scale(NonceScale::TenMillionths)
    .with_nonce_rejection(NonceRejection::new(NONCE_TOO_SMALL, NONCE_ATTEMPTS))
    .with_empty_body_as_object()
}

pub fn build_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    let signer: Option<Arc<dyn Signer>> = match (config.api_key(), config.secret_key()) {
        (Some(key), Some(secret)) => Some(Arc::new(BitfinexSigner::new(
            key.to_string(),
            secret.to_string(),
        ))),
        _ => None,
    };

    let profile = profile().with_base_url_override(config.base_url.as_deref());
    Ok(ExchangeAdapter::new(profile, signer, Arc::new(BitfinexCodec)))
}
