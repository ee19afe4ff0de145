use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{base64_encode, hmac_sha384};
use crate::core::kernel::{Nonce, SignatureResult, SignedEnvelope, Signer, SigningRequest};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

/// HMAC-SHA384 signer covering both REST generations.
///
/// v1 signs the base64 of `{"request": path, "nonce": n, ...body}` and sends it
/// in `X-BFX-*` headers. v2 signs `/api{path}{nonce}{body}` as-is and sends
/// `bfx-*` headers. The JSON that is signed is byte-for-byte the JSON that is sent.
pub struct BitfinexSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
}

impl BitfinexSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
        }
    }

    fn signature(&self, message: &[u8]) -> Result<String, ExchangeError> {
        hmac_sha384(self.secret_key.expose_secret().as_bytes(), message).map(hex::encode)
    }

    fn sign_v1(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult {
        let mut payload = serde_json::Map::new();
        payload.insert("request".to_string(), Value::String(request.path.to_string()));
        payload.insert("nonce".to_string(), Value::String(nonce.to_string()));
        payload.extend(request.body.to_object()?);

        let payload = serde_json::to_vec(&Value::Object(payload)).map_err(|e| {
            ExchangeError::InvalidParameters(format!("Failed to serialize payload: {}", e))
        })?;
        let encoded = base64_encode(&payload);
        let signature = self.signature(encoded.as_bytes())?;

        Ok(SignedEnvelope::passthrough(request)?
            .with_header("X-BFX-APIKEY", self.api_key.expose_secret().clone())
            .with_header("X-BFX-PAYLOAD", encoded)
            .with_header("X-BFX-SIGNATURE", signature))
    }

    fn sign_v2(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult {
        let envelope = SignedEnvelope::passthrough(request)?;
        let body = if envelope.body.is_empty() {
            b"{}".as_slice()
        } else {
            envelope.body.as_slice()
        };

        let mut message = format!("/api{}{}", request.path, nonce).into_bytes();
        message.extend_from_slice(body);
        let signature = self.signature(&message)?;

        Ok(envelope
            .with_header("bfx-nonce", nonce.to_string())
            .with_header("bfx-apikey", self.api_key.expose_secret().clone())
            .with_header("bfx-signature", signature))
    }
}

impl Signer for BitfinexSigner {
    fn sign(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult {
        match request.api_version {
            1 => self.sign_v1(request, nonce),
            2 => self.sign_v2(request, nonce),
            other => Err(ExchangeError::InvalidParameters(format!(
                "Bitfinex has no signing scheme for API version {}",
                other
            ))),
        }
    }
}
