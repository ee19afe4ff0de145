pub mod binance;
pub mod bitfinex;
pub mod ftx;
pub mod kucoin;
pub mod sfox;
pub mod shrimpy;
pub mod tardis;
