use crate::core::adapter::{AdapterProfile, DataSource, ExchangeAdapter, PathLayout, Routing};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{BearerSigner, Signer};
use crate::exchanges::sfox::{history::parse_transactions, SfoxCodec};
use std::sync::Arc;

pub const BASE_URL: &str = "https://api.sfox.com";
pub const CHART_URL: &str = "https://chartdata.sfox.com";

/// Chart endpoints live on their own host, outside the versioned layout
pub const CHART_PREFIX: &str = "candlesticks";

pub fn profile() -> AdapterProfile {
    AdapterProfile::new(
        "sfox",
        Routing::EndpointHost {
            default: BASE_URL.to_string(),
            prefix: CHART_PREFIX.to_string(),
            host: CHART_URL.to_string(),
        },
        PathLayout::versioned(),
    )
    .with_trade_history(DataSource {
        api_version: 1,
        endpoint: "account/transactions",
        authenticate: true,
        parse: parse_transactions,
    })
}

/// Bearer-token connector; only the API key is used
pub fn build_connector(config: &ExchangeConfig) -> Result<ExchangeAdapter, ExchangeError> {
    let signer: Option<Arc<dyn Signer>> = config
        .api_key()
        .map(|key| Arc::new(BearerSigner::new(key.to_string())) as Arc<dyn Signer>);

    let profile = profile().with_base_url_override(config.base_url.as_deref());
    Ok(ExchangeAdapter::new(profile, signer, Arc::new(SfoxCodec::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BusinessRequest;

    #[test]
    fn test_candlesticks_route_to_chart_host() {
        let profile = profile();
        assert_eq!(
            profile.resolve(&BusinessRequest::get(1, "candlesticks")),
            (CHART_URL, "/candlesticks".to_string())
        );
        assert_eq!(
            profile.resolve(&BusinessRequest::get(1, "offer/buy")),
            (BASE_URL, "/v1/offer/buy".to_string())
        );
    }
}
