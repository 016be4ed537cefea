//! # Utilidades criptográficas
//! src/client/crypto.rs
//!
//! - `sha256_hex`: digest SHA-256 en hexadecimal (tokens firmados)
//! - `encrypt_json` / `decrypt_json`: AES-256-GCM sobre el JSON de un valor
//!
//! Formato del payload cifrado, codificado en base64:
//!
//! ```text
//! nonce (12 bytes) ‖ ciphertext ‖ tag (16 bytes)
//! ```

use aws_lc_rs::aead::{Aad, Nonce, RandomizedNonceKey, AES_256_GCM, NONCE_LEN};
use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Largo de una clave AES-256
pub const KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("key must be {KEY_LEN} bytes, got {0}")]
    KeyLength(usize),

    #[error("invalid base64 payload")]
    Base64,

    #[error("payload too short")]
    TooShort,

    /// Tag inválido: clave equivocada o datos alterados
    #[error("decryption failed")]
    Open,

    #[error("encryption failed")]
    Seal,

    #[error("invalid json: {0}")]
    Json(String),
}

/// Hash SHA-256 de un string en hexadecimal
///
/// # Ejemplo
/// ```
/// use http_lab::client::crypto::sha256_hex;
/// assert_eq!(
///     sha256_hex("abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Token firmado para `GET /users/{id}`
pub fn user_token(id: u64, unix_secs: u64, secret: &str) -> String {
    sha256_hex(&format!("user_{}_{}_{}", id, unix_secs, secret))
}

fn key(key_bytes: &[u8]) -> Result<RandomizedNonceKey, CryptoError> {
    if key_bytes.len() != KEY_LEN {
        return Err(CryptoError::KeyLength(key_bytes.len()));
    }
    RandomizedNonceKey::new(&AES_256_GCM, key_bytes).map_err(|_| CryptoError::KeyLength(key_bytes.len()))
}

/// Serializa `value` a JSON, lo cifra y devuelve el payload en base64
pub fn encrypt_json<T: Serialize>(value: &T, key_bytes: &[u8]) -> Result<String, CryptoError> {
    let key = key(key_bytes)?;
    let mut in_out = serde_json::to_vec(value).map_err(|e| CryptoError::Json(e.to_string()))?;

    let nonce = key
        .seal_in_place_append_tag(Aad::empty(), &mut in_out)
        .map_err(|_| CryptoError::Seal)?;

    let mut payload = nonce.as_ref().to_vec();
    payload.extend_from_slice(&in_out);
    Ok(BASE64_STANDARD.encode(payload))
}

/// Operación inversa de `encrypt_json`
pub fn decrypt_json<T: DeserializeOwned>(payload: &str, key_bytes: &[u8]) -> Result<T, CryptoError> {
    let key = key(key_bytes)?;
    let mut data = BASE64_STANDARD.decode(payload.trim()).map_err(|_| CryptoError::Base64)?;
    if data.len() < NONCE_LEN {
        return Err(CryptoError::TooShort);
    }

    let mut in_out = data.split_off(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(&data).map_err(|_| CryptoError::TooShort)?;
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CryptoError::Open)?;

    serde_json::from_slice(plaintext).map_err(|e| CryptoError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const KEY: &[u8; 32] = b"your-32-byte-encryption-key-here";

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Secret {
        name: String,
    }

    #[test]
    fn test_sha256_hex_format() {
        let hash = sha256_hex("user_1_1700000000_secret");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, user_token(1, 1_700_000_000, "secret"));
    }

    #[test]
    fn test_encrypt_then_decrypt() {
        let secret = Secret { name: "赵六".to_string() };
        let payload = encrypt_json(&secret, KEY).unwrap();

        let back: Secret = decrypt_json(&payload, KEY).unwrap();
        assert_eq!(back, secret);
    }

    #[test]
    fn test_nonce_is_random() {
        let secret = Secret { name: "a".to_string() };
        let first = encrypt_json(&secret, KEY).unwrap();
        let second = encrypt_json(&secret, KEY).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_key_fails() {
        let payload = encrypt_json(&Secret { name: "a".to_string() }, KEY).unwrap();
        let other = [7u8; 32];

        let result: Result<Secret, _> = decrypt_json(&payload, &other);
        assert_eq!(result.unwrap_err(), CryptoError::Open);
    }

    #[test]
    fn test_bad_inputs() {
        assert_eq!(
            encrypt_json(&1, b"short").unwrap_err(),
            CryptoError::KeyLength(5)
        );
        assert_eq!(
            decrypt_json::<Secret>("not base64!!", KEY).unwrap_err(),
            CryptoError::Base64
        );
        assert_eq!(
            decrypt_json::<Secret>(&BASE64_STANDARD.encode([1u8; 4]), KEY).unwrap_err(),
            CryptoError::TooShort
        );
    }
}
