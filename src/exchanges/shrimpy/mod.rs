pub mod builder;
pub mod signer;

pub use builder::build_connector;
pub use signer::ShrimpySigner;
