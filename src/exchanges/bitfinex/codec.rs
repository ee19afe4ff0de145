use crate::core::errors::ExchangeError;
use crate::core::kernel::symbols::{checked_side, pair_from_parts};
use crate::core::traits::SymbolCodec;
use crate::core::types::SymbolPair;

const PAIR_PREFIX: char = 't';

/// `ETH/USD` <-> `tETHUSD`; `TESTBTC/TESTUSD` <-> `tTESTBTC:TESTUSD`.
///
/// The `:` delimiter is used exactly when either side is longer than three characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitfinexCodec;

fn needs_delimiter(trade: &str, stake: &str) -> bool {
    trade.len() > 3 || stake.len() > 3
}

fn invalid(native: &str) -> ExchangeError {
    ExchangeError::InvalidSymbolFormat(format!("Unexpected Bitfinex symbol: {}", native))
}

impl SymbolCodec for BitfinexCodec {
    fn encode(&self, trade: &str, stake: &str) -> Result<String, ExchangeError> {
        let pair = pair_from_parts(trade, stake)?;
        if needs_delimiter(&pair.trade, &pair.stake) {
            Ok(format!("{}{}:{}", PAIR_PREFIX, pair.trade, pair.stake))
        } else {
            Ok(format!("{}{}{}", PAIR_PREFIX, pair.trade, pair.stake))
        }
    }

    fn decode(&self, native: &str) -> Result<SymbolPair, ExchangeError> {
        let body = native.strip_prefix(PAIR_PREFIX).ok_or_else(|| invalid(native))?;

        let (trade, stake) = match body.split_once(':') {
            Some((trade, stake)) if needs_delimiter(trade, stake) => (trade, stake),
            Some(_) => return Err(invalid(native)),
            None if body.len() == 6 && body.is_char_boundary(3) => body.split_at(3),
            None => return Err(invalid(native)),
        };

        SymbolPair::new(checked_side(trade, native)?, checked_side(stake, native)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_symbols() {
        assert_eq!(BitfinexCodec.encode("ETH", "USD").unwrap(), "tETHUSD");
        assert_eq!(BitfinexCodec.decode("tETHUSD").unwrap().to_string(), "ETH/USD");
    }

    #[test]
    fn test_long_symbols_use_delimiter() {
        assert_eq!(BitfinexCodec.encode("TESTBTC", "TESTUSD").unwrap(), "tTESTBTC:TESTUSD");
        assert_eq!(BitfinexCodec.encode("DOGE", "USD").unwrap(), "tDOGE:USD");
        assert_eq!(
            BitfinexCodec.decode("tTESTBTC:TESTUSD").unwrap().to_string(),
            "TESTBTC/TESTUSD"
        );
    }

    #[test]
    fn test_malformed_symbols() {
        for native in ["ETHUSD", "tETH:USD", "tDOGEUSD", "tET", "tethusd", "fUSD"] {
            assert!(
                matches!(BitfinexCodec.decode(native), Err(ExchangeError::InvalidSymbolFormat(_))),
                "{} should be rejected",
                native
            );
        }
        assert!(BitfinexCodec.encode("ET", "USD").is_err());
    }
}
