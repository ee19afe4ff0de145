use crate::core::kernel::signer::{encode_query, hmac_sha256};
use crate::core::kernel::{Nonce, SignatureResult, SignedEnvelope, Signer, SigningRequest};
use secrecy::{ExposeSecret, Secret};

/// HMAC-SHA256 hex over `ts + METHOD + path[?query] + body`
pub struct FtxSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
    subaccount: Option<String>,
}

impl FtxSigner {
    pub fn new(api_key: String, secret_key: String, subaccount: Option<String>) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            subaccount,
        }
    }
}

/// Percent-encode a subaccount name the way the exchange expects it in a header
fn quote(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl Signer for FtxSigner {
    fn sign(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult {
        let envelope = SignedEnvelope::passthrough(request)?;

        let mut message = format!("{}{}{}", nonce, request.method, request.path);
        if !request.params.is_empty() {
            message.push('?');
            message.push_str(&encode_query(request.params));
        }
        let mut message = message.into_bytes();
        message.extend_from_slice(&envelope.body);

        let signature = hex::encode(hmac_sha256(
            self.secret_key.expose_secret().as_bytes(),
            &message,
        )?);

        let envelope = envelope
            .with_header("FTX-KEY", self.api_key.expose_secret().clone())
            .with_header("FTX-SIGN", signature)
            .with_header("FTX-TS", nonce.to_string());

        Ok(match &self.subaccount {
            Some(subaccount) => envelope.with_header("FTX-SUBACCOUNT", quote(subaccount)),
            None => envelope,
        })
    }
}
