pub mod core;
pub mod exchanges;
pub mod utils;

pub use core::{
    adapter::ExchangeAdapter,
    config::ExchangeConfig,
    errors::ExchangeError,
    traits::{ExchangeApi, SymbolCodec},
    types::*,
};
pub use utils::exchange_factory::{ExchangeFactory, ExchangeType};
