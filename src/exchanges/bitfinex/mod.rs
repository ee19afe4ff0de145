pub mod builder;
pub mod codec;
pub mod signer;

pub use builder::build_connector;
pub use codec::BitfinexCodec;
pub use signer::BitfinexSigner;
