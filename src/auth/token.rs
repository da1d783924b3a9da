use crate::error::app_error::AppError;
use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const NONCE_LEN: usize = 12;

/// Seals `identity_id:timestamp_ms` into an opaque bearer token.
///
/// The payload is encrypted with AES-256-GCM so a token can neither be read nor minted
/// without the server key. The token itself is `base64url(nonce || ciphertext)`.
pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl TokenCodec {
    /// Derives the AES key from an arbitrary configured secret.
    pub fn from_secret(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    /// Per-process random key. Tokens do not survive a restart.
    pub fn ephemeral() -> Self {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    pub fn encode(&self, identity_id: &Uuid, timestamp_ms: i64) -> Result<String, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let payload = format_payload(identity_id, timestamp_ms);

        let ciphertext = self.cipher.encrypt(&nonce, payload.as_bytes()).map_err(|e| AppError::Token {
            message: format!("Failed to seal session token: {}", e),
        })?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    pub fn decode(&self, token: &str) -> Result<(Uuid, i64), AppError> {
        let sealed = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| AppError::MalformedToken)?;
        if sealed.len() <= NONCE_LEN {
            return Err(AppError::MalformedToken);
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| AppError::MalformedToken)?;
        let payload = String::from_utf8(plaintext).map_err(|_| AppError::MalformedToken)?;

        parse_payload(&payload)
    }
}

pub(crate) fn format_payload(identity_id: &Uuid, timestamp_ms: i64) -> String {
    format!("{}:{}", identity_id, timestamp_ms)
}

pub(crate) fn parse_payload(payload: &str) -> Result<(Uuid, i64), AppError> {
    let mut parts = payload.split(':');
    let (Some(id), Some(timestamp)) = (parts.next(), parts.next()) else {
        return Err(AppError::MalformedToken);
    };

    let identity_id = Uuid::parse_str(id).map_err(|_| AppError::MalformedToken)?;
    let timestamp_ms = timestamp.parse::<i64>().map_err(|_| AppError::MalformedToken)?;

    Ok((identity_id, timestamp_ms))
}
