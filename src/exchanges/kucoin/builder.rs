use crate::core::adapter::{AdapterProfile, ExchangeAdapter, PathLayout, Routing};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{NonceScale, Signer};
use crate::exchanges::kucoin::{KucoinCodec, KucoinSigner};
use std::sync::Arc;

pub const BASE_URL: &str = "https://api.kucoin.com";

pub fn profile() -> AdapterProfile {
    AdapterProfile::new(
        "kucoin",
        Routing::Single(BASE_URL.to_string()),
        PathLayout::prefixed("api"),
    )
    .with_nonce_scale(NonceScale::Millis)
}

pub fn build_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    let signer: Option<Arc<dyn Signer>> = match (config.api_key(), config.secret_key()) {
        (Some(key), Some(secret)) => Some(Arc::new(KucoinSigner::new(
            key.to_string(),
            secret.to_string(),
            config.passphrase_value().map(str::to_string),
        ))),
        _ => None,
    };

    let profile = profile().with_base_url_override(config.base_url.as_deref());
    Ok(ExchangeAdapter::new(profile, signer, Arc::new(KucoinCodec)))
}
