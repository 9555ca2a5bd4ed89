//! Cryptographic primitives for Cryptical.
//!
//! This module provides:
//! - SHA-256 master-password digests, salts and verification (`hashing`)
//! - Argon2id derivation of a vault's entry key (`kdf`)
//! - A zeroizing key holder (`keys`)
//! - AES-256-GCM encryption and decryption (`encryption`)

pub mod encryption;
pub mod hashing;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, decrypt_secret, encrypt, encrypt_secret};
pub use hashing::{generate_salt, hash_master_password, verify_master_password, DEFAULT_SALT_LEN};
pub use kdf::{derive_key, Argon2Params};
pub use keys::DerivedKey;
