use std::fmt;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::{key::KeyMaterial, CodecError};

const NONCE_LEN: usize = 12;

/// URL-safe base64: never emits `{` or `[`, so the plaintext sniff is unambiguous.
/// Padding is optional on read.
const BLOB_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

enum KeyState {
    Ready { id: String, cipher: Aes256Gcm },
    Unavailable { reason: String },
}

/// Encrypts and decrypts record sections.
///
/// Construct once at process start and share by reference; the derived key is
/// held here rather than in global state. Both directions are infallible at
/// the public surface: `encrypt` falls back to canonical plaintext and
/// `decrypt` falls back to an empty object.
pub struct Codec {
    state: KeyState,
}

impl Codec {
    /// Derive the key from `secret`. A derivation failure leaves the codec in
    /// the unavailable state, where `encrypt` stores plaintext.
    pub fn new(secret: &str) -> Self {
        match KeyMaterial::derive(secret) {
            Ok(material) => Self::from_key(&material),
            Err(err) => {
                warn!(error = %err, "key derivation failed; encryption disabled");
                Self::unavailable(err.to_string())
            }
        }
    }

    pub fn from_key(material: &KeyMaterial) -> Self {
        match Aes256Gcm::new_from_slice(material.bytes()) {
            Ok(cipher) => Self {
                state: KeyState::Ready {
                    id: material.id.clone(),
                    cipher,
                },
            },
            Err(err) => Self::unavailable(format!("cipher init failed: {err}")),
        }
    }

    /// A codec with no usable key.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: KeyState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, KeyState::Ready { .. })
    }

    /// Fingerprint of the active key, if any.
    pub fn key_id(&self) -> Option<&str> {
        match &self.state {
            KeyState::Ready { id, .. } => Some(id),
            KeyState::Unavailable { .. } => None,
        }
    }

    /// Encrypt a record section into a storable text blob. Never fails: on
    /// any error the canonical plaintext serialization is returned instead.
    #[instrument(skip_all)]
    pub fn encrypt<T: Serialize + ?Sized>(&self, record: &T) -> String {
        match self.try_encrypt(record) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(error = %err, "encryption failed; storing canonical plaintext");
                canonical_plaintext(record)
            }
        }
    }

    pub fn try_encrypt<T: Serialize + ?Sized>(&self, record: &T) -> Result<String, CodecError> {
        let value =
            serde_json::to_value(record).map_err(|e| CodecError::Serialization(e.to_string()))?;
        if let Some(marker) = empty_marker(&value) {
            return Ok(marker.to_string());
        }

        let plaintext =
            serde_json::to_vec(&value).map_err(|e| CodecError::Serialization(e.to_string()))?;
        let cipher = self.cipher()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|e| CodecError::Encryption(e.to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&ciphertext);
        Ok(BLOB_ENGINE.encode(payload))
    }

    /// Decrypt a stored blob. Never fails: unreadable input degrades to a
    /// plaintext parse of the raw text, then to an empty object.
    #[instrument(skip_all)]
    pub fn decrypt(&self, blob: &str) -> Value {
        match self.try_decrypt(blob) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "decryption failed; trying raw plaintext");
                match parse_container(blob.trim()) {
                    Some(value) => value,
                    None => {
                        warn!("blob unreadable; using empty record");
                        empty_object()
                    }
                }
            }
        }
    }

    pub fn try_decrypt(&self, blob: &str) -> Result<Value, CodecError> {
        let blob = blob.trim();
        if blob.is_empty() {
            return Ok(empty_object());
        }
        if is_legacy_plaintext(blob) {
            debug!("reading unencrypted legacy section");
            return serde_json::from_str(blob).map_err(|e| CodecError::Serialization(e.to_string()));
        }

        let payload = BLOB_ENGINE
            .decode(blob)
            .map_err(|e| CodecError::Encoding(e.to_string()))?;
        if payload.len() <= NONCE_LEN {
            return Err(CodecError::Decryption(format!(
                "payload too short: {} bytes",
                payload.len()
            )));
        }
        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let cipher = self.cipher()?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| CodecError::Decryption(e.to_string()))?;

        serde_json::from_slice(&plaintext).map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Decrypt straight into a typed section; shape mismatches yield `T::default()`.
    pub fn decrypt_as<T: DeserializeOwned + Default>(&self, blob: &str) -> T {
        serde_json::from_value(self.decrypt(blob)).unwrap_or_else(|err| {
            warn!(error = %err, "decrypted section has unexpected shape; using default");
            T::default()
        })
    }

    fn cipher(&self) -> Result<&Aes256Gcm, CodecError> {
        match &self.state {
            KeyState::Ready { cipher, .. } => Ok(cipher),
            KeyState::Unavailable { reason } => Err(CodecError::Unavailable(reason.clone())),
        }
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            KeyState::Ready { id, .. } => f.debug_struct("Codec").field("key_id", id).finish(),
            KeyState::Unavailable { reason } => f
                .debug_struct("Codec")
                .field("unavailable", reason)
                .finish(),
        }
    }
}

/// Records written before encryption existed are bare JSON.
pub fn is_legacy_plaintext(blob: &str) -> bool {
    blob.starts_with('{') || blob.starts_with('[')
}

fn empty_marker(value: &Value) -> Option<&'static str> {
    match value {
        Value::Null => Some("{}"),
        Value::Object(map) if map.is_empty() => Some("{}"),
        Value::Array(items) if items.is_empty() => Some("[]"),
        Value::String(text) if text.trim().is_empty() => Some("{}"),
        _ => None,
    }
}

fn canonical_plaintext<T: Serialize + ?Sized>(record: &T) -> String {
    serde_json::to_value(record)
        .and_then(|value| serde_json::to_string(&value))
        .unwrap_or_else(|_| "{}".to_string())
}

fn parse_container(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
