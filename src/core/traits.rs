use crate::core::{
    errors::ExchangeError,
    kernel::symbols::SymbolCache,
    types::{BusinessRequest, SymbolPair, TradeRecord},
};
use async_trait::async_trait;
use serde_json::Value;

/// Bidirectional mapping between `TRADE/STAKE` pairs and an exchange's native symbols
pub trait SymbolCodec: Send + Sync {
    fn encode(&self, trade: &str, stake: &str) -> Result<String, ExchangeError>;

    fn decode(&self, native: &str) -> Result<SymbolPair, ExchangeError>;

    /// Per-instance table filled from the exchange listing, if the codec uses one
    fn cache(&self) -> Option<&SymbolCache> {
        None
    }
}

/// Codec for exchanges that track positions per currency rather than pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPairs {
    pub exchange: &'static str,
}

impl SymbolCodec for NoPairs {
    fn encode(&self, trade: &str, stake: &str) -> Result<String, ExchangeError> {
        Err(ExchangeError::NotSupported(format!(
            "{} has no trading pairs ({}/{})",
            self.exchange, trade, stake
        )))
    }

    fn decode(&self, native: &str) -> Result<SymbolPair, ExchangeError> {
        Err(ExchangeError::NotSupported(format!(
            "{} has no trading pairs ({})",
            self.exchange, native
        )))
    }
}

/// One configured exchange behind a uniform request entry point
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    fn name(&self) -> &str;

    /// Issue a call against the exchange and return the decoded JSON
    async fn business_request(&self, request: BusinessRequest) -> Result<Value, ExchangeError>;

    /// Native symbol for a pair, stake currency first
    fn get_symbol(&self, stake_currency: &str, trade_currency: &str) -> Result<String, ExchangeError>;

    /// `TRADE/STAKE` for a native symbol
    fn get_pair(&self, symbol: &str) -> Result<String, ExchangeError>;

    /// Load the exchange's symbol listing into this instance; returns the table size
    async fn refresh_symbols(&self) -> Result<usize, ExchangeError>;

    /// Normalized executed-trade history, deposits and withdrawals excluded
    async fn trade_history(&self) -> Result<Vec<TradeRecord>, ExchangeError>;
}
