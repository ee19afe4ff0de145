use crate::core::kernel::signer::{encode_query, hmac_sha256};
use crate::core::kernel::{Nonce, SignatureResult, SignedEnvelope, Signer, SigningRequest};
use secrecy::{ExposeSecret, Secret};

/// Query-string signer: millisecond `timestamp` param plus an uppercase
/// HMAC-SHA256 `signature`, repeated as a header for endpoints that read it there.
pub struct BinanceSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
}

impl BinanceSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
        }
    }
}

impl Signer for BinanceSigner {
    fn sign(&self, request: &SigningRequest<'_>, nonce: Nonce) -> SignatureResult {
        let mut params = request.params.clone();
        params.push("timestamp", nonce.to_string());

        let query = encode_query(&params);
        let digest = hmac_sha256(self.secret_key.expose_secret().as_bytes(), query.as_bytes())?;
        let signature = hex::encode_upper(digest);
        params.push("signature", signature.clone());

        Ok(SignedEnvelope {
            headers: vec![
                ("X-MBX-APIKEY".to_string(), self.api_key.expose_secret().clone()),
                ("signature".to_string(), signature),
            ],
            params,
            body: request.body.to_bytes()?,
        })
    }
}
