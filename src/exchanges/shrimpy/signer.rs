use crate::core::kernel::signer::{base64_decode, base64_encode, encode_query, hmac_sha256};
use crate::core::kernel::{Nonce, SignatureResult, SignedEnvelope, Signer, SigningRequest};
use secrecy::{ExposeSecret, Secret};

/// Base64 HMAC-SHA256 over `path[?query] + METHOD + nonce + body`, keyed by the
/// base64-decoded secret.
pub struct ShrimpySigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
}

impl ShrimpySigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
        }
    }
}

impl Signer for ShrimpySigner {
    fn sign(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult {
        let key = base64_decode(self.secret_key.expose_secret())?;
        let envelope = SignedEnvelope::passthrough(request)?;

        let mut message = request.path.to_string();
        if !request.params.is_empty() {
            message.push('?');
            message.push_str(&encode_query(request.params));
        }
        message.push_str(request.method.as_str());
        message.push_str(&nonce.to_string());
        let mut message = message.into_bytes();
        message.extend_from_slice(&envelope.body);

        let signature = base64_encode(&hmac_sha256(&key, &message)?);

        Ok(envelope
            .with_header("SHRIMPY-API-KEY", self.api_key.expose_secret().clone())
            .with_header("SHRIMPY-API-NONCE", nonce.to_string())
            .with_header("SHRIMPY-API-SIGNATURE", signature))
    }
}
