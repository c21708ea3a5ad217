//! AES-256-GCM helpers for secrets at rest.
//!
//! Operator credentials and the token inventory cache are stored as
//! `base64(iv):base64(ciphertext)` where the ciphertext carries the GCM tag.
//! The key itself travels base64-encoded through configuration.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::{Result, anyhow};
use base64ct::{Base64, Encoding};
use rand::{RngCore, rngs::OsRng};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

fn cipher(base64_key: &str) -> Result<Aes256Gcm> {
    let key = Base64::decode_vec(base64_key)
        .map_err(|e| anyhow!("Error decoding encryption key: {e}"))?;

    if key.len() != KEY_LEN {
        return Err(anyhow!(
            "Encryption key is {} bytes, expected {}",
            key.len(),
            KEY_LEN
        ));
    }

    Aes256Gcm::new_from_slice(&key).map_err(|e| anyhow!("Error initializing cipher: {e}"))
}

/// Generate a fresh random 256-bit key, base64-encoded.
#[must_use]
pub fn generate_key() -> String {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    Base64::encode_string(&key)
}

/// Encrypt `plaintext`, returning `base64(iv):base64(ciphertext)`.
///
/// # Errors
/// Returns an error if the key is invalid or encryption fails.
pub fn encrypt(base64_key: &str, plaintext: &str) -> Result<String> {
    let cipher = cipher(base64_key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| anyhow!("Encryption failure: {e}"))?;

    Ok(format!(
        "{}:{}",
        Base64::encode_string(&nonce_bytes),
        Base64::encode_string(&ciphertext)
    ))
}

/// Decrypt a `base64(iv):base64(ciphertext)` string produced by [`encrypt`].
///
/// # Errors
/// Returns an error if the input is malformed, the key is invalid, or the
/// ciphertext fails authentication.
pub fn decrypt(base64_key: &str, encoded: &str) -> Result<String> {
    let cipher = cipher(base64_key)?;

    let (iv_b64, ct_b64) = encoded
        .split_once(':')
        .ok_or_else(|| anyhow!("Encrypted input should have the format 'IV:ciphertext'"))?;

    let nonce_bytes =
        Base64::decode_vec(iv_b64).map_err(|e| anyhow!("Error decoding IV: {e}"))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(anyhow!(
            "IV is {} bytes, expected {}",
            nonce_bytes.len(),
            NONCE_LEN
        ));
    }

    let ciphertext =
        Base64::decode_vec(ct_b64).map_err(|e| anyhow!("Error decoding ciphertext: {e}"))?;

    let nonce = Nonce::from_slice(&nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_slice())
        .map_err(|e| anyhow!("Decryption failure: {e}"))?;

    String::from_utf8(plaintext).map_err(|e| anyhow!("Decrypted data is not UTF-8: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_encrypt_decrypt_roundtrip() {
        let key = generate_key();
        let encrypted = encrypt(&key, "operator@example.com").unwrap();

        assert!(encrypted.contains(':'));
        assert_ne!(encrypted, "operator@example.com");

        let decrypted = decrypt(&key, &encrypted).unwrap();
        assert_eq!(decrypted, "operator@example.com");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_decrypt_fails_tampered_ciphertext() {
        let key = generate_key();
        let encrypted = encrypt(&key, "secret").unwrap();

        let (iv, ct) = encrypted.split_once(':').unwrap();
        let mut ct_bytes = Base64::decode_vec(ct).unwrap();
        let len = ct_bytes.len();
        if let Some(byte) = ct_bytes.get_mut(len - 1) {
            *byte ^= 0xFF;
        }
        let tampered = format!("{iv}:{}", Base64::encode_string(&ct_bytes));

        assert!(decrypt(&key, &tampered).is_err());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_decrypt_fails_wrong_key() {
        let encrypted = encrypt(&generate_key(), "secret").unwrap();
        assert!(decrypt(&generate_key(), &encrypted).is_err());
    }

    #[test]
    fn test_decrypt_rejects_missing_separator() {
        let key = generate_key();
        let result = decrypt(&key, "not-a-valid-blob");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_short_key() {
        let short_key = Base64::encode_string(b"too-short");
        assert!(encrypt(&short_key, "secret").is_err());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_generated_keys_differ() {
        assert_ne!(generate_key(), generate_key());
        let key = Base64::decode_vec(&generate_key()).unwrap();
        assert_eq!(key.len(), 32);
    }
}
