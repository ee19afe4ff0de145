use crate::core::errors::ExchangeError;
use crate::core::kernel::symbols::{checked_side, pair_from_parts};
use crate::core::traits::SymbolCodec;
use crate::core::types::SymbolPair;

/// Spot markets are already written `BTC/USD`; futures (`BTC-PERP`) are not pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FtxCodec;

impl SymbolCodec for FtxCodec {
    fn encode(&self, trade: &str, stake: &str) -> Result<String, ExchangeError> {
        pair_from_parts(trade, stake).map(|pair| pair.to_string())
    }

    fn decode(&self, native: &str) -> Result<SymbolPair, ExchangeError> {
        let (trade, stake) = native.split_once('/').ok_or_else(|| {
            ExchangeError::InvalidSymbolFormat(format!("Not a spot market: {}", native))
        })?;
        SymbolPair::new(checked_side(trade, native)?, checked_side(stake, native)?)
    }
}
