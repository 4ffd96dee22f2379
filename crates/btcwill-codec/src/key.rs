use std::fmt;

use hmac::Hmac;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::CodecError;

/// Environment variable holding the process-wide secret.
pub const SECRET_ENV: &str = "BTCWILL_ENCRYPTION_KEY";

/// Used when no secret is configured. Kept for compatibility with data
/// written by deployments that never set one; anyone holding this crate can
/// decrypt such data.
pub const DEFAULT_SECRET: &str = "btcwill-default-secret-change-me";

/// Application-wide salt. Not per record: every record and user shares it.
pub const KDF_SALT: &[u8] = b"btcwill-static-salt-v1";

pub const KDF_ITERATIONS: u32 = 100_000;

pub const KEY_LEN: usize = 32;

/// Derived 256-bit symmetric key.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// Short fingerprint for logging/rotation (never log key bytes).
    pub id: String,
    bytes: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// PBKDF2-HMAC-SHA256 over `secret` with the fixed application salt.
    pub fn derive(secret: &str) -> Result<Self, CodecError> {
        let mut bytes = [0u8; KEY_LEN];
        pbkdf2::pbkdf2::<Hmac<Sha256>>(secret.as_bytes(), KDF_SALT, KDF_ITERATIONS, &mut bytes)
            .map_err(|e| CodecError::KeyDerivation(e.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            id: fingerprint(&bytes),
            bytes,
        }
    }

    pub fn bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("id", &self.id)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .take(4)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Where the active secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Environment,
    Config,
    Default,
}

/// Resolve the secret: environment, then config, then the weak default.
pub fn resolve_secret(configured: Option<&str>) -> (String, SecretSource) {
    resolve_secret_from(std::env::var(SECRET_ENV).ok(), configured)
}

fn resolve_secret_from(env: Option<String>, configured: Option<&str>) -> (String, SecretSource) {
    if let Some(secret) = env.filter(|s| !s.trim().is_empty()) {
        return (secret, SecretSource::Environment);
    }
    if let Some(secret) = configured.filter(|s| !s.trim().is_empty()) {
        return (secret.to_string(), SecretSource::Config);
    }
    warn!(
        "{SECRET_ENV} is not set; falling back to the built-in default secret. \
         Records encrypted this way are not confidential."
    );
    (DEFAULT_SECRET.to_string(), SecretSource::Default)
}
