use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    normalize::{parse_or_pass_through, RecordError},
    record::{WillRecord, WillStatus},
};

pub const DEFAULT_TITLE: &str = "My Bitcoin Will";

/// Will entity as persisted. Section fields hold codec blobs, never plaintext
/// structures, so they can be stored and listed without the key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredWill {
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    #[serde(default)]
    pub status: WillStatus,
    #[serde(default)]
    pub personal_info: String,
    #[serde(default)]
    pub bitcoin_assets: String,
    #[serde(default)]
    pub beneficiaries: String,
    #[serde(default)]
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Initial data for a new will; sections are already normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WillDraft {
    pub title: Option<String>,
    pub personal_info: Value,
    pub bitcoin_assets: Value,
    pub beneficiaries: Value,
    pub instructions: Value,
}

impl WillDraft {
    /// Build a draft from a submitted record whose sections may be text or structured.
    pub fn from_value(title: Option<String>, value: &Value) -> Result<Self, RecordError> {
        let map = top_level(value)?;
        let section = |field: &str| match map.get(field) {
            Some(raw) => parse_or_pass_through(field, raw),
            None => Ok(Value::Object(Map::new())),
        };
        Ok(Self {
            title,
            personal_info: section("personal_info")?,
            bitcoin_assets: section("bitcoin_assets")?,
            beneficiaries: section("beneficiaries")?,
            instructions: section("instructions")?,
        })
    }

    pub fn title_or_default(&self) -> String {
        self.title
            .clone()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }
}

/// Edit request: every present section replaces the stored one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WillUpdate {
    pub title: Option<String>,
    pub status: Option<WillStatus>,
    pub personal_info: Option<Value>,
    pub bitcoin_assets: Option<Value>,
    pub beneficiaries: Option<Value>,
    pub instructions: Option<Value>,
}

impl WillUpdate {
    /// Sections absent from `value` are left untouched by the update.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let map = top_level(value)?;
        let section = |field: &str| {
            map.get(field)
                .map(|raw| parse_or_pass_through(field, raw))
                .transpose()
        };
        Ok(Self {
            title: None,
            status: None,
            personal_info: section("personal_info")?,
            bitcoin_assets: section("bitcoin_assets")?,
            beneficiaries: section("beneficiaries")?,
            instructions: section("instructions")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn top_level(value: &Value) -> Result<Map<String, Value>, RecordError> {
    match parse_or_pass_through("record", value)? {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(RecordError::MalformedShape {
            field: "record".to_string(),
            found: "array",
        }),
        _ => Ok(Map::new()),
    }
}

/// Requested will does not exist for this owner.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("will {id} not found")]
pub struct WillNotFound {
    pub id: Uuid,
}

/// Owner-scoped persistence of wills. Callers resolve `owner` from an
/// authenticated identity before calling in.
#[async_trait]
pub trait WillRepository: Send + Sync {
    async fn create(&self, owner: &str, draft: WillDraft) -> anyhow::Result<StoredWill>;
    /// Newest first.
    async fn list(&self, owner: &str) -> anyhow::Result<Vec<StoredWill>>;
    async fn get(&self, owner: &str, id: Uuid) -> anyhow::Result<StoredWill>;
    /// Decrypt and normalize a stored will into a compilable record.
    async fn open(&self, owner: &str, id: Uuid) -> anyhow::Result<WillRecord>;
    async fn update(&self, owner: &str, id: Uuid, update: WillUpdate)
        -> anyhow::Result<StoredWill>;
    async fn delete(&self, owner: &str, id: Uuid) -> anyhow::Result<()>;
}
