use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::lenient;

/// Text fields use the empty string as the "not specified" sentinel.
pub fn is_specified(value: &str) -> bool {
    !value.trim().is_empty()
}

/// One estate record: everything the document compiler needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WillRecord {
    #[serde(deserialize_with = "lenient::object")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "lenient::object")]
    pub bitcoin_assets: BitcoinAssets,
    pub beneficiaries: Beneficiaries,
    #[serde(deserialize_with = "lenient::object")]
    pub instructions: Instructions,
    pub status: WillStatus,
}

impl WillRecord {
    /// Build a record from four independently decoded section values.
    pub fn from_sections(
        personal_info: Value,
        bitcoin_assets: Value,
        beneficiaries: Value,
        instructions: Value,
        status: WillStatus,
    ) -> Self {
        Self {
            personal_info: lenient::object_from(personal_info),
            bitcoin_assets: lenient::object_from(bitcoin_assets),
            beneficiaries: serde_json::from_value(beneficiaries).unwrap_or_default(),
            instructions: lenient::object_from(instructions),
            status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "address")]
    pub address: Address,
    #[serde(deserialize_with = "lenient::object")]
    pub executor: Executor,
}

impl PersonalInfo {
    pub fn is_empty(&self) -> bool {
        [
            &self.full_name,
            &self.date_of_birth,
            &self.phone,
            &self.email,
            &self.executor.name,
            &self.executor.contact,
        ]
        .iter()
        .all(|field| !is_specified(field))
            && self.address.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "lenient::text")]
    pub street: String,
    #[serde(deserialize_with = "lenient::text")]
    pub city: String,
    #[serde(deserialize_with = "lenient::text")]
    pub state: String,
    #[serde(deserialize_with = "lenient::text")]
    pub zip_code: String,
    #[serde(deserialize_with = "lenient::text")]
    pub country: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .all(|field| !is_specified(field))
    }

    /// Single-line form, skipping unset components.
    pub fn one_line(&self) -> String {
        let state_zip = [self.state.trim(), self.zip_code.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        [
            self.street.trim(),
            self.city.trim(),
            state_zip.as_str(),
            self.country.trim(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Older records stored the address as one free-form line.
fn address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(line) => Address {
            street: line,
            ..Address::default()
        },
        other => lenient::object_from(other),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Executor {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub contact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "AssetFields")]
pub struct BitcoinAssets {
    pub wallets: Vec<Wallet>,
    pub exchanges: Vec<Exchange>,
    pub storage: StorageInfo,
}

/// Older records name the storage section `storage_info`; when both keys are
/// present the canonical one wins unless it is empty.
#[derive(Default, Deserialize)]
#[serde(default)]
struct AssetFields {
    #[serde(deserialize_with = "lenient::list")]
    wallets: Vec<Wallet>,
    #[serde(deserialize_with = "lenient::list")]
    exchanges: Vec<Exchange>,
    #[serde(deserialize_with = "lenient::object")]
    storage: StorageInfo,
    #[serde(deserialize_with = "lenient::object")]
    storage_info: StorageInfo,
}

impl From<AssetFields> for BitcoinAssets {
    fn from(fields: AssetFields) -> Self {
        let storage = if fields.storage.is_empty() {
            fields.storage_info
        } else {
            fields.storage
        };
        Self {
            wallets: fields.wallets,
            exchanges: fields.exchanges,
            storage,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "WalletFields")]
pub struct Wallet {
    pub name: String,
    #[serde(rename = "type")]
    pub wallet_type: String,
    pub description: String,
    pub access_method: String,
    pub seed_phrase_location: String,
    pub private_key_location: String,
    pub notes: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct WalletFields {
    #[serde(deserialize_with = "lenient::text")]
    name: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    wallet_type: String,
    #[serde(deserialize_with = "lenient::text")]
    description: String,
    #[serde(deserialize_with = "lenient::text")]
    access_method: String,
    #[serde(deserialize_with = "lenient::text")]
    seed_phrase_location: String,
    #[serde(deserialize_with = "lenient::text")]
    private_key_location: String,
    #[serde(deserialize_with = "lenient::text")]
    notes: String,
    #[serde(deserialize_with = "lenient::text")]
    additional_notes: String,
}

impl From<WalletFields> for Wallet {
    fn from(fields: WalletFields) -> Self {
        Self {
            name: fields.name,
            wallet_type: fields.wallet_type,
            description: fields.description,
            access_method: fields.access_method,
            seed_phrase_location: fields.seed_phrase_location,
            private_key_location: fields.private_key_location,
            notes: prefer(fields.notes, fields.additional_notes),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "ExchangeFields")]
pub struct Exchange {
    pub name: String,
    pub username: String,
    pub email: String,
    pub two_factor_backup: String,
    pub notes: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ExchangeFields {
    #[serde(deserialize_with = "lenient::text")]
    name: String,
    #[serde(deserialize_with = "lenient::text")]
    username: String,
    #[serde(deserialize_with = "lenient::text")]
    email: String,
    #[serde(deserialize_with = "lenient::text")]
    two_factor_backup: String,
    #[serde(deserialize_with = "lenient::text")]
    notes: String,
    #[serde(deserialize_with = "lenient::text")]
    additional_notes: String,
}

impl From<ExchangeFields> for Exchange {
    fn from(fields: ExchangeFields) -> Self {
        Self {
            name: fields.name,
            username: fields.username,
            email: fields.email,
            two_factor_backup: fields.two_factor_backup,
            notes: prefer(fields.notes, fields.additional_notes),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub method: String,
    #[serde(deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(deserialize_with = "lenient::text")]
    pub details: String,
}

impl StorageInfo {
    pub fn is_empty(&self) -> bool {
        [&self.method, &self.location, &self.details]
            .iter()
            .all(|field| !is_specified(field))
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Beneficiaries {
    pub primary: Vec<Beneficiary>,
    pub contingent: Vec<Beneficiary>,
}

impl<'de> Deserialize<'de> for Beneficiaries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct Split {
            #[serde(deserialize_with = "lenient::list")]
            primary: Vec<Beneficiary>,
            #[serde(deserialize_with = "lenient::list")]
            contingent: Vec<Beneficiary>,
        }

        Ok(match Value::deserialize(deserializer)? {
            // Before the primary/contingent split, beneficiaries were a flat list.
            list @ Value::Array(_) => Self {
                primary: lenient::items_from(list),
                contingent: Vec::new(),
            },
            other => {
                let split: Split = lenient::object_from(other);
                Self {
                    primary: split.primary,
                    contingent: split.contingent,
                }
            }
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Beneficiary {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub relationship: String,
    /// Share as entered; never validated or normalized here.
    #[serde(deserialize_with = "lenient::text")]
    pub percentage: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    /// Free-form contact line used by older records instead of phone/email.
    #[serde(deserialize_with = "lenient::text")]
    pub contact: String,
    #[serde(deserialize_with = "address")]
    pub address: Address,
    /// Optional payout address.
    #[serde(deserialize_with = "lenient::text")]
    pub bitcoin_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Instructions {
    #[serde(deserialize_with = "lenient::text")]
    pub access_instructions: String,
    #[serde(deserialize_with = "lenient::text")]
    pub security_notes: String,
    #[serde(deserialize_with = "lenient::list")]
    pub trusted_contacts: Vec<TrustedContact>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "ContactFields")]
pub struct TrustedContact {
    pub name: String,
    pub contact: String,
    pub relationship: String,
    pub role: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ContactFields {
    #[serde(deserialize_with = "lenient::text")]
    name: String,
    #[serde(deserialize_with = "lenient::text")]
    contact: String,
    #[serde(deserialize_with = "lenient::text")]
    relationship: String,
    #[serde(deserialize_with = "lenient::text")]
    role: String,
    #[serde(deserialize_with = "lenient::text")]
    expertise: String,
}

impl From<ContactFields> for TrustedContact {
    fn from(fields: ContactFields) -> Self {
        Self {
            name: fields.name,
            contact: fields.contact,
            relationship: fields.relationship,
            role: prefer(fields.role, fields.expertise),
        }
    }
}

/// Canonical key wins; the legacy spelling only fills a blank.
fn prefer(canonical: String, legacy: String) -> String {
    if is_specified(&canonical) {
        canonical
    } else {
        legacy
    }
}

/// Lifecycle tag for a will document.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WillStatus {
    #[default]
    Draft,
    Completed,
    Archived,
}

impl WillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WillStatus::Draft => "draft",
            WillStatus::Completed => "completed",
            WillStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for WillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown will status: {0} (expected draft, completed, or archived)")]
pub struct UnknownStatus(pub String);

impl FromStr for WillStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(WillStatus::Draft),
            "completed" => Ok(WillStatus::Completed),
            "archived" => Ok(WillStatus::Archived),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for WillStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = lenient::text(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}
