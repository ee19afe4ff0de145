use crate::core::adapter::{AdapterProfile, DataSource, ExchangeAdapter, PathLayout, Routing};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{NonceScale, Signer};
use crate::exchanges::binance::{codec::parse_exchange_info, BinanceCodec, BinanceSigner};
use std::sync::Arc;

pub const SPOT_URL: &str = "https://api.binance.com";
pub const FUTURES_URL: &str = "https://fapi.binance.com";

fn base_profile(name: &str, base_url: &str, prefix: &str) -> AdapterProfile {
    AdapterProfile::new(name, Routing::Single(base_url.to_string()), PathLayout::prefixed(prefix))
        .with_nonce_scale(NonceScale::Millis)
}

/// Spot API under `/api/v{n}/`, symbol table from `exchangeInfo`
pub fn spot_profile() -> AdapterProfile {
    base_profile("binance", SPOT_URL, "api").with_symbol_listing(DataSource {
        api_version: 3,
        endpoint: "exchangeInfo",
        authenticate: false,
        parse: parse_exchange_info,
    })
}

/// Margin API under `/sapi/v{n}/`
pub fn margin_profile() -> AdapterProfile {
    base_profile("binance_margin", SPOT_URL, "sapi")
}

/// USD-M futures API under `/fapi/v{n}/`
pub fn futures_profile() -> AdapterProfile {
    base_profile("binance_futures", FUTURES_URL, "fapi").with_symbol_listing(DataSource {
        api_version: 1,
        endpoint: "exchangeInfo",
        authenticate: false,
        parse: parse_exchange_info,
    })
}

fn signer(config: &ExchangeConfig) -> Option<Arc<dyn Signer>> {
    match (config.api_key(), config.secret_key()) {
        (Some(key), Some(secret)) => Some(Arc::new(BinanceSigner::new(
            key.to_string(),
            secret.to_string(),
        ))),
        _ => None,
    }
}

fn build(profile: AdapterProfile, config: &ExchangeConfig) -> ExchangeAdapter {
    let profile = profile.with_base_url_override(config.base_url.as_deref());
    ExchangeAdapter::new(profile, signer(config), Arc::new(BinanceCodec::new()))
}

/// Create a Binance spot connector; credentials are optional
pub fn build_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    Ok(build(spot_profile(), config))
}

pub fn build_margin_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    Ok(build(margin_profile(), config))
}

pub fn build_futures_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    Ok(build(futures_profile(), config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BusinessRequest;

    #[test]
    fn test_variants_differ_only_in_prefix_and_host() {
        let request = BusinessRequest::get(1, "margin/account");
        assert_eq!(
            margin_profile().resolve(&request),
            (SPOT_URL, "/sapi/v1/margin/account".to_string())
        );
        assert_eq!(
            futures_profile().resolve(&BusinessRequest::get(1, "ticker/price")),
            (FUTURES_URL, "/fapi/v1/ticker/price".to_string())
        );
        assert_eq!(
            spot_profile().resolve(&BusinessRequest::get(3, "account")).1,
            "/api/v3/account"
        );
    }

    #[test]
    fn test_margin_guard_rejects_sapi() {
        let layout = margin_profile().layout;
        assert!(layout.check_endpoint("sapi/v1/margin/account").is_err());
        assert!(layout.check_endpoint("/sapi/v1/margin/account").is_err());
        assert!(layout.check_endpoint("margin/account").is_ok());
    }

    #[test]
    fn test_read_only_connector_builds() {
        let adapter = build_connector(&ExchangeConfig::read_only()).unwrap();
        assert!(!adapter.can_authenticate());
    }
}
