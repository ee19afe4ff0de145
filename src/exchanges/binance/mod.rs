pub mod builder;
pub mod codec;
pub mod signer;
pub mod types;

pub use builder::{build_connector, build_futures_connector, build_margin_connector};
pub use codec::BinanceCodec;
pub use signer::BinanceSigner;
