use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{base64_encode, encode_query, hmac_sha256};
use crate::core::kernel::{Nonce, SignatureResult, SignedEnvelope, Signer, SigningRequest};
use secrecy::{ExposeSecret, Secret};

pub const KEY_VERSION: &str = "2";

/// Key version 2 scheme: base64 HMAC-SHA256 over `ts + METHOD + path[?query] + body`,
/// with the passphrase itself HMAC'd by the same secret.
pub struct KucoinSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
    passphrase: Option<Secret<String>>,
}

impl KucoinSigner {
    pub fn new(api_key: String, secret_key: String, passphrase: Option<String>) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: passphrase.map(Secret::new),
        }
    }

    fn digest(&self, message: &[u8]) -> Result<String, ExchangeError> {
        hmac_sha256(self.secret_key.expose_secret().as_bytes(), message).map(|d| base64_encode(&d))
    }
}

impl Signer for KucoinSigner {
    fn sign(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult {
        let passphrase = self.passphrase.as_ref().ok_or_else(|| {
            ExchangeError::AuthError("KuCoin requires a passphrase for authenticated calls".to_string())
        })?;
        let envelope = SignedEnvelope::passthrough(request)?;

        let mut message = format!("{}{}{}", nonce, request.method, request.path);
        if !request.params.is_empty() {
            message.push('?');
            message.push_str(&encode_query(request.params));
        }
        let mut message = message.into_bytes();
        message.extend_from_slice(&envelope.body);

        let signature = self.digest(&message)?;
        let signed_passphrase = self.digest(passphrase.expose_secret().as_bytes())?;

        Ok(envelope
            .with_header("KC-API-KEY", self.api_key.expose_secret().clone())
            .with_header("KC-API-SIGN", signature)
            .with_header("KC-API-TIMESTAMP", nonce.to_string())
            .with_header("KC-API-PASSPHRASE", signed_passphrase)
            .with_header("KC-API-KEY-VERSION", KEY_VERSION))
    }
}
