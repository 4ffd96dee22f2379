//! Encryption codec for will record sections.
//! AES-256-GCM with a PBKDF2-derived key; reads legacy plaintext records and
//! degrades instead of failing so a document can always be produced.

pub mod codec;
pub mod key;

pub use codec::Codec;
pub use key::{KeyMaterial, SecretSource};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("no usable key: {0}")]
    Unavailable(String),
    #[error("encrypt failed: {0}")]
    Encryption(String),
    #[error("blob decode failed: {0}")]
    Encoding(String),
    #[error("decrypt failed: {0}")]
    Decryption(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}
