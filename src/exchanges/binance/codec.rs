use crate::core::errors::ExchangeError;
use crate::core::kernel::symbols::{pair_from_parts, SymbolCache};
use crate::core::traits::SymbolCodec;
use crate::core::types::SymbolPair;
use crate::exchanges::binance::types::BinanceExchangeInfo;
use serde_json::Value;
use tracing::debug;

/// `ETH/USDT` <-> `ETHUSDT`.
///
/// Concatenated symbols cannot be split without the listing, so decoding
/// relies on the instance table filled by `refresh_symbols` and by `encode`.
#[derive(Debug, Default)]
pub struct BinanceCodec {
    symbols: SymbolCache,
}

impl BinanceCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymbolCodec for BinanceCodec {
    fn encode(&self, trade: &str, stake: &str) -> Result<String, ExchangeError> {
        let pair = pair_from_parts(trade, stake)?;
        let native = format!("{}{}", pair.trade, pair.stake);
        self.symbols.insert(&native, pair);
        Ok(native)
    }

    fn decode(&self, native: &str) -> Result<SymbolPair, ExchangeError> {
        self.symbols.get(native).ok_or_else(|| {
            ExchangeError::InvalidSymbolFormat(format!("Trading pair {} not found on Binance.", native))
        })
    }

    fn cache(&self) -> Option<&SymbolCache> {
        Some(&self.symbols)
    }
}

/// Symbol table entries out of an `exchangeInfo` response
pub fn parse_exchange_info(value: &Value) -> Result<Vec<(String, SymbolPair)>, ExchangeError> {
    let info: BinanceExchangeInfo = serde_json::from_value(value.clone()).map_err(|e| {
        ExchangeError::InvalidParameters(format!("Unexpected exchangeInfo format: {}", e))
    })?;

    Ok(info
        .symbols
        .into_iter()
        .filter_map(|market| match SymbolPair::new(&market.base_asset, &market.quote_asset) {
            Ok(pair) => Some((market.symbol, pair)),
            Err(e) => {
                debug!("Skipping listing entry {}: {}", market.symbol, e);
                None
            }
        })
        .collect())
}
