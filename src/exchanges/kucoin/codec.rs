use crate::core::errors::ExchangeError;
use crate::core::kernel::symbols::{checked_side, pair_from_parts};
use crate::core::traits::SymbolCodec;
use crate::core::types::SymbolPair;

/// `BTC/USDT` <-> `BTC-USDT`
#[derive(Debug, Clone, Copy, Default)]
pub struct KucoinCodec;

impl SymbolCodec for KucoinCodec {
    fn encode(&self, trade: &str, stake: &str) -> Result<String, ExchangeError> {
        let pair = pair_from_parts(trade, stake)?;
        Ok(format!("{}-{}", pair.trade, pair.stake))
    }

    fn decode(&self, native: &str) -> Result<SymbolPair, ExchangeError> {
        let (trade, stake) = native.split_once('-').ok_or_else(|| {
            ExchangeError::InvalidSymbolFormat(format!("Unexpected KuCoin symbol: {}", native))
        })?;
        SymbolPair::new(checked_side(trade, native)?, checked_side(stake, native)?)
    }
}
