pub mod builder;
pub mod codec;
pub mod history;
pub mod types;

pub use builder::build_connector;
pub use codec::SfoxCodec;
