//! Exchange-agnostic transport layer.
//!
//! The kernel holds everything that is shared by every exchange and knows
//! nothing about any single one of them:
//!
//! - `RestClient` / `ReqwestRest`: retrying HTTP executor and response decoding
//! - `Signer`: pluggable request authentication
//! - `NonceGenerator`: strictly increasing per-instance nonces
//! - `ErrorClassifier`: readable messages out of failed response bodies
//! - `CallLimiter`: client-side call rate limiting
//! - `SymbolCache`: native symbol tables loaded from exchange listings
//!
//! # Example
//! ```rust,no_run
//! use exchange_apis::core::kernel::*;
//! use exchange_apis::core::types::{HttpMethod, Params};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rest = ReqwestRest::new(RestClientConfig::new("bitfinex".to_string()));
//! let request = PreparedRequest {
//!     method: HttpMethod::Get,
//!     url: "https://api.bitfinex.com/v1/symbols".to_string(),
//!     params: Params::new(),
//!     headers: Vec::new(),
//!     body: Vec::new(),
//! };
//! let symbols = rest.execute(&request).await?;
//! # Ok(())
//! # }
//! ```
pub mod classifier;
pub mod nonce;
pub mod rate_limit;
pub mod rest;
pub mod signer;
pub mod symbols;

pub use classifier::{ClassifyRule, ErrorClassifier};
pub use nonce::{Nonce, NonceGenerator, NonceRejection, NonceScale};
pub use rate_limit::{CallLimiter, RateLimit};
pub use rest::{
    PreparedRequest, ReqwestRest, ResponseFormat, RestClient, RestClientBuilder,
    RestClientConfig, RetryPolicy,
};
pub use signer::{BearerSigner, SignatureResult, SignedEnvelope, Signer, SigningRequest};
pub use symbols::SymbolCache;
