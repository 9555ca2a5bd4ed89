//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! Entry secrets are stored in a TEXT column, so `encrypt_secret` wraps
//! that buffer in standard base64 and `decrypt_secret` unwraps it.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use super::keys::DerivedKey;
use crate::errors::{CrypticalError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CrypticalError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CrypticalError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Expects the first 12 bytes to be the nonce, followed by the ciphertext
/// and its tag.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
        return Err(CrypticalError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CrypticalError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CrypticalError::DecryptionFailed)
}

/// Encrypt a site password into the text blob stored in `entries.esp`.
pub fn encrypt_secret(key: &DerivedKey, plaintext: &str) -> Result<String> {
    let blob = encrypt(key.as_bytes(), plaintext.as_bytes())?;
    Ok(BASE64.encode(blob))
}

/// Decrypt a blob produced by `encrypt_secret`.
///
/// Malformed base64, truncated data, a failed tag check and non-UTF-8
/// plaintext all map to `DecryptionFailed`.
pub fn decrypt_secret(key: &DerivedKey, blob: &str) -> Result<Zeroizing<String>> {
    let raw = BASE64
        .decode(blob.trim())
        .map_err(|_| CrypticalError::DecryptionFailed)?;

    let plaintext = decrypt(key.as_bytes(), &raw)?;

    String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        CrypticalError::DecryptionFailed
    })
}
