pub mod builder;
pub mod codec;
pub mod signer;

pub use builder::build_connector;
pub use codec::KucoinCodec;
pub use signer::KucoinSigner;
