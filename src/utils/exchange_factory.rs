use crate::core::{config::ExchangeConfig, errors::ExchangeError, traits::ExchangeApi};
use crate::exchanges::{binance, bitfinex, ftx, kucoin, sfox, shrimpy, tardis};
use std::str::FromStr;

/// Supported exchanges, one per registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeType {
    Binance,
    BinanceMargin,
    BinanceFutures,
    Bitfinex,
    Ftx,
    Kucoin,
    Sfox,
    Shrimpy,
    Tardis,
}

impl ExchangeType {
    pub const fn all() -> [Self; 9] {
        [
            Self::Binance,
            Self::BinanceMargin,
            Self::BinanceFutures,
            Self::Bitfinex,
            Self::Ftx,
            Self::Kucoin,
            Self::Sfox,
            Self::Shrimpy,
            Self::Tardis,
        ]
    }

    /// Registry key, e.g. `binance_margin`
    pub const fn key(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::BinanceMargin => "binance_margin",
            Self::BinanceFutures => "binance_futures",
            Self::Bitfinex => "bitfinex",
            Self::Ftx => "ftx",
            Self::Kucoin => "kucoin",
            Self::Sfox => "sfox",
            Self::Shrimpy => "shrimpy",
            Self::Tardis => "tardis",
        }
    }

    /// Prefix of the `{PREFIX}_API_KEY` style variables; the Binance variants share credentials
    pub const fn env_prefix(self) -> &'static str {
        match self {
            Self::Binance | Self::BinanceMargin | Self::BinanceFutures => "BINANCE",
            Self::Bitfinex => "BITFINEX",
            Self::Ftx => "FTX",
            Self::Kucoin => "KUCOIN",
            Self::Sfox => "SFOX",
            Self::Shrimpy => "SHRIMPY",
            Self::Tardis => "TARDIS",
        }
    }
}

impl std::fmt::Display for ExchangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExchangeType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|exchange| exchange.key() == key)
            .ok_or_else(|| ExchangeError::NotSupported(format!("Unknown exchange: {}", s)))
    }
}

/// Factory for creating exchange connectors
pub struct ExchangeFactory;

impl ExchangeFactory {
    /// Create a connector for the given exchange type
    pub fn create_connector(
        exchange_type: ExchangeType,
        config: &ExchangeConfig,
    ) -> Result<Box<dyn ExchangeApi>, ExchangeError> {
        Ok(match exchange_type {
            ExchangeType::Binance => Box::new(binance::build_connector(config)?),
            ExchangeType::BinanceMargin => Box::new(binance::build_margin_connector(config)?),
            ExchangeType::BinanceFutures => Box::new(binance::build_futures_connector(config)?),
            ExchangeType::Bitfinex => Box::new(bitfinex::build_connector(config)?),
            ExchangeType::Ftx => Box::new(ftx::build_connector(config)?),
            ExchangeType::Kucoin => Box::new(kucoin::build_connector(config)?),
            ExchangeType::Sfox => Box::new(sfox::build_connector(config)?),
            ExchangeType::Shrimpy => Box::new(shrimpy::build_connector(config)?),
            ExchangeType::Tardis => Box::new(tardis::build_connector(config)?),
        })
    }

    /// Look up a connector by registry key
    pub fn create_by_key(key: &str, config: &ExchangeConfig) -> Result<Box<dyn ExchangeApi>, ExchangeError> {
        Self::create_connector(key.parse()?, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_round_trips() {
        for exchange in ExchangeType::all() {
            assert_eq!(exchange.key().parse::<ExchangeType>().unwrap(), exchange);
        }
        assert_eq!("  Bitfinex ".parse::<ExchangeType>().unwrap(), ExchangeType::Bitfinex);
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            ExchangeFactory::create_by_key("mtgox", &ExchangeConfig::read_only()),
            Err(ExchangeError::NotSupported(_))
        ));
    }

    #[test]
    fn test_connectors_build_without_credentials() {
        for exchange in ExchangeType::all() {
            let connector = ExchangeFactory::create_connector(exchange, &ExchangeConfig::read_only()).unwrap();
            assert_eq!(connector.name(), exchange.key());
        }
    }
}
