use crate::core::errors::ExchangeError;
use crate::core::kernel::symbols::{checked_side, pair_from_parts, SymbolCache};
use crate::core::traits::SymbolCodec;
use crate::core::types::SymbolPair;

/// `ETH/USD` <-> `ethusd`.
///
/// Symbols this instance encoded are decoded from its table; anything else is
/// split after the third character.
#[derive(Debug, Default)]
pub struct SfoxCodec {
    symbols: SymbolCache,
}

impl SfoxCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymbolCodec for SfoxCodec {
    fn encode(&self, trade: &str, stake: &str) -> Result<String, ExchangeError> {
        let pair = pair_from_parts(trade, stake)?;
        let native = format!("{}{}", pair.trade, pair.stake).to_lowercase();
        self.symbols.insert(&native, pair);
        Ok(native)
    }

    fn decode(&self, native: &str) -> Result<SymbolPair, ExchangeError> {
        if let Some(pair) = self.symbols.get(native) {
            return Ok(pair);
        }

        let upper = native.to_uppercase();
        if !upper.is_char_boundary(3) {
            return Err(ExchangeError::InvalidSymbolFormat(format!(
                "Unexpected SFOX symbol: {}",
                native
            )));
        }
        let (trade, stake) = upper.split_at(3);
        SymbolPair::new(checked_side(trade, native)?, checked_side(stake, native)?)
    }

    fn cache(&self) -> Option<&SymbolCache> {
        Some(&self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_notation() {
        let codec = SfoxCodec::new();
        assert_eq!(codec.encode("ETH", "USD").unwrap(), "ethusd");
        assert_eq!(codec.decode("btcusd").unwrap().to_string(), "BTC/USD");
    }

    #[test]
    fn test_long_sides_round_trip_through_table() {
        let codec = SfoxCodec::new();
        let native = codec.encode("USDC", "USD").unwrap();
        assert_eq!(native, "usdcusd");
        assert_eq!(codec.decode(&native).unwrap().to_string(), "USDC/USD");
    }

    #[test]
    fn test_invalid() {
        let codec = SfoxCodec::new();
        assert!(codec.decode("btcu").is_err());
        assert!(codec.encode("eth", "usd").is_err());
    }
}
