use serde::{Deserialize, Serialize};

/// Slot a section occupies in the document. The compiler walks these in the
/// order given by `SECTION_ORDER`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Title,
    Declaration,
    Revocation,
    ExecutorAppointment,
    PersonalInformation,
    Wallets,
    Exchanges,
    Storage,
    PrimaryBeneficiaries,
    ContingentBeneficiaries,
    AccessInstructions,
    SecurityNotes,
    TrustedContacts,
    NoContest,
    SimultaneousDeath,
    Taxes,
    FiduciaryProtection,
    Signature,
}

impl SectionId {
    /// True for slots emitted only when the record has data for them.
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            SectionId::PersonalInformation
                | SectionId::Wallets
                | SectionId::Exchanges
                | SectionId::Storage
                | SectionId::PrimaryBeneficiaries
                | SectionId::ContingentBeneficiaries
                | SectionId::AccessInstructions
                | SectionId::SecurityNotes
                | SectionId::TrustedContacts
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSection {
    pub id: SectionId,
    #[serde(flatten)]
    pub body: SectionBody,
}

/// Content block handed to the renderer. All text is plain; layout is the
/// renderer's business.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Title {
        document_type: String,
        testator: String,
    },
    KeyValueTable {
        heading: String,
        rows: Vec<(String, String)>,
    },
    RepeatedEntityBlock {
        heading: String,
        entries: Vec<Entity>,
    },
    FreeTextClause {
        heading: String,
        text: String,
    },
    SignatureBlock {
        testator: String,
        /// Bulleted cautions printed ahead of execution.
        warnings: Vec<String>,
        attestation: String,
        lines: Vec<SignatureLine>,
        /// Acknowledgment text for the notary; state and county are left blank.
        notarization: String,
    },
}

impl SectionBody {
    pub fn heading(&self) -> Option<&str> {
        match self {
            SectionBody::KeyValueTable { heading, .. }
            | SectionBody::RepeatedEntityBlock { heading, .. }
            | SectionBody::FreeTextClause { heading, .. } => Some(heading),
            SectionBody::Title { .. } | SectionBody::SignatureBlock { .. } => None,
        }
    }
}

/// One numbered sub-table inside a repeated block, e.g. "Wallet 2".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureLine {
    pub label: String,
    /// Pre-printed name under the line; empty for witnesses to fill in.
    pub printed_name: String,
    /// Whether a date blank follows the signature line.
    pub dated: bool,
}
