use crate::core::errors::ExchangeError;
use crate::core::kernel::nonce::Nonce;
use crate::core::types::{Body, HttpMethod, Params};
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::{Sha256, Sha384};

/// Result type for signing operations
pub type SignatureResult = Result<SignedEnvelope, ExchangeError>;

/// Everything a signer may look at. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    pub method: HttpMethod,
    /// Path on the host, e.g. `/v1/offer/cancel`
    pub path: &'a str,
    pub params: &'a Params,
    pub body: &'a Body,
    pub api_version: u32,
}

/// Output of a signer, consumed immediately by the executor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub headers: Vec<(String, String)>,
    pub params: Params,
    pub body: Vec<u8>,
}

impl SignedEnvelope {
    /// Envelope that forwards the request unchanged.
    pub fn passthrough(request: &SigningRequest<'_>) -> Result<Self, ExchangeError> {
        Ok(Self {
            headers: Vec::new(),
            params: request.params.clone(),
            body: request.body.to_bytes()?,
        })
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Signer trait for request authentication
///
/// One implementation per exchange family. Given identical inputs and nonce a
/// signer must produce an identical envelope.
pub trait Signer: Send + Sync {
    /// Sign a request and return the headers, params and body to send
    fn sign(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult;
}

/// Static `Authorization: Bearer <key>` header, no signing
pub struct BearerSigner {
    api_key: Secret<String>,
}

impl BearerSigner {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
        }
    }
}

impl Signer for BearerSigner {
    fn sign(&self, request: &SigningRequest<'_>, _nonce: Nonce) -> SignatureResult {
        Ok(SignedEnvelope::passthrough(request)?.with_header(
            "Authorization",
            format!("Bearer {}", self.api_key.expose_secret()),
        ))
    }
}

/// URL-encode params in their given order (`application/x-www-form-urlencoded`).
///
/// The executor encodes the outgoing query with this same function, so a
/// signature computed over its output matches the bytes on the wire.
pub fn encode_query(params: &Params) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

pub fn hmac_sha256(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn hmac_sha384(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    let mut mac = Hmac::<Sha384>::new_from_slice(secret)
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn base64_encode(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

pub fn base64_decode(text: &str) -> Result<Vec<u8>, ExchangeError> {
    general_purpose::STANDARD
        .decode(text)
        .map_err(|e| ExchangeError::AuthError(format!("Secret is not valid base64: {}", e)))
}
