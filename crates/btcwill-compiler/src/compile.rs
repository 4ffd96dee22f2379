use btcwill_core::{
    normalize::{record_from_value, RecordError},
    record::{is_specified, Beneficiary, Exchange, TrustedContact, Wallet, WillRecord},
};
use serde_json::Value;
use tracing::debug;

use crate::{
    boilerplate,
    section::{DocumentSection, Entity, SectionBody, SectionId, SignatureLine},
};

/// The document layout. Every compilation walks this table front to back;
/// optional slots with no data are skipped, fixed slots always emit.
pub const SECTION_ORDER: [SectionId; 18] = [
    SectionId::Title,
    SectionId::Declaration,
    SectionId::Revocation,
    SectionId::ExecutorAppointment,
    SectionId::PersonalInformation,
    SectionId::Wallets,
    SectionId::Exchanges,
    SectionId::Storage,
    SectionId::PrimaryBeneficiaries,
    SectionId::ContingentBeneficiaries,
    SectionId::AccessInstructions,
    SectionId::SecurityNotes,
    SectionId::TrustedContacts,
    SectionId::NoContest,
    SectionId::SimultaneousDeath,
    SectionId::Taxes,
    SectionId::FiduciaryProtection,
    SectionId::Signature,
];

/// Compile a record into its ordered document sections. Pure and
/// deterministic: the same record always yields the same sections.
pub fn compile(record: &WillRecord) -> Vec<DocumentSection> {
    let sections: Vec<DocumentSection> = SECTION_ORDER
        .iter()
        .filter_map(|&id| build(id, record).map(|body| DocumentSection { id, body }))
        .collect();
    debug!(sections = sections.len(), "compiled will document");
    sections
}

/// Normalize a raw record value (sections as text or structured JSON), then
/// compile it. Only a wrong top-level shape is reported as an error.
pub fn compile_value(value: &Value) -> Result<Vec<DocumentSection>, RecordError> {
    let record = record_from_value(value)?;
    Ok(compile(&record))
}

fn build(id: SectionId, record: &WillRecord) -> Option<SectionBody> {
    let personal = &record.personal_info;
    let assets = &record.bitcoin_assets;
    let beneficiaries = &record.beneficiaries;
    let instructions = &record.instructions;

    match id {
        SectionId::Title => Some(SectionBody::Title {
            document_type: boilerplate::DOCUMENT_TYPE.to_string(),
            testator: testator_name(record).to_uppercase(),
        }),
        SectionId::Declaration => Some(clause(
            "Declaration",
            boilerplate::declaration(
                testator_name(record),
                or_placeholder(&personal.address.city, boilerplate::CITY_PLACEHOLDER),
                or_placeholder(&personal.address.state, boilerplate::STATE_PLACEHOLDER),
            ),
        )),
        SectionId::Revocation => Some(clause(
            "Revocation of Prior Instruments",
            boilerplate::REVOCATION,
        )),
        SectionId::ExecutorAppointment => Some(clause(
            "Appointment of Executor",
            boilerplate::executor_appointment(or_placeholder(
                &personal.executor.name,
                boilerplate::EXECUTOR_PLACEHOLDER,
            )),
        )),
        SectionId::PersonalInformation => {
            if personal.is_empty() {
                return None;
            }
            let mut rows = vec![
                row("Full Name", &personal.full_name),
                row("Date of Birth", &personal.date_of_birth),
            ];
            if !personal.address.is_empty() {
                rows.push(row("Address", &personal.address.one_line()));
            }
            rows.extend([
                row("Phone", &personal.phone),
                row("Email", &personal.email),
                row("Executor", &personal.executor.name),
                row("Executor Contact", &personal.executor.contact),
            ]);
            Some(table("Personal Information", rows))
        }
        SectionId::Wallets => {
            repeated("Bitcoin Wallets", "Wallet", &assets.wallets, wallet_rows)
        }
        SectionId::Exchanges => repeated(
            "Cryptocurrency Exchange Accounts",
            "Exchange",
            &assets.exchanges,
            exchange_rows,
        ),
        SectionId::Storage => {
            let storage = &assets.storage;
            (!storage.is_empty()).then(|| {
                table(
                    "Private Key Storage",
                    vec![
                        row("Storage Method", &storage.method),
                        row("Storage Location", &storage.location),
                        row("Additional Details", &storage.details),
                    ],
                )
            })
        }
        SectionId::PrimaryBeneficiaries => repeated(
            "Primary Beneficiaries",
            "Primary Beneficiary",
            &beneficiaries.primary,
            beneficiary_rows,
        ),
        SectionId::ContingentBeneficiaries => repeated(
            "Contingent Beneficiaries",
            "Contingent Beneficiary",
            &beneficiaries.contingent,
            beneficiary_rows,
        ),
        SectionId::AccessInstructions => is_specified(&instructions.access_instructions)
            .then(|| clause("Access Instructions", &instructions.access_instructions)),
        SectionId::SecurityNotes => is_specified(&instructions.security_notes)
            .then(|| clause("Security Notes", &instructions.security_notes)),
        SectionId::TrustedContacts => repeated(
            "Trusted Contacts",
            "Trusted Contact",
            &instructions.trusted_contacts,
            contact_rows,
        ),
        SectionId::NoContest => Some(clause("No-Contest Clause", boilerplate::NO_CONTEST)),
        SectionId::SimultaneousDeath => Some(clause(
            "Simultaneous Death",
            boilerplate::SIMULTANEOUS_DEATH,
        )),
        SectionId::Taxes => Some(clause("Taxes and Expenses", boilerplate::TAXES)),
        SectionId::FiduciaryProtection => Some(clause(
            "Fiduciary Protection",
            boilerplate::FIDUCIARY_PROTECTION,
        )),
        SectionId::Signature => Some(signature_block(testator_name(record))),
    }
}

fn testator_name(record: &WillRecord) -> &str {
    or_placeholder(
        &record.personal_info.full_name,
        boilerplate::TESTATOR_PLACEHOLDER,
    )
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if is_specified(value) {
        value.trim()
    } else {
        placeholder
    }
}

fn row(label: &str, value: &str) -> (String, String) {
    (
        label.to_string(),
        or_placeholder(value, boilerplate::NOT_SPECIFIED).to_string(),
    )
}

fn clause(heading: &str, text: impl Into<String>) -> SectionBody {
    SectionBody::FreeTextClause {
        heading: heading.to_string(),
        text: text.into(),
    }
}

fn table(heading: &str, rows: Vec<(String, String)>) -> SectionBody {
    SectionBody::KeyValueTable {
        heading: heading.to_string(),
        rows,
    }
}

/// One numbered entity per item, 1-based, in input order.
fn repeated<T>(
    heading: &str,
    label: &str,
    items: &[T],
    rows: fn(&T) -> Vec<(String, String)>,
) -> Option<SectionBody> {
    if items.is_empty() {
        return None;
    }
    let entries = items
        .iter()
        .enumerate()
        .map(|(index, item)| Entity {
            title: format!("{label} {}", index + 1),
            rows: rows(item),
        })
        .collect();
    Some(SectionBody::RepeatedEntityBlock {
        heading: heading.to_string(),
        entries,
    })
}

fn wallet_rows(wallet: &Wallet) -> Vec<(String, String)> {
    let mut rows = vec![
        row("Name", &wallet.name),
        row("Type", &wallet.wallet_type),
        row("Description", &wallet.description),
        row("Access Method", &wallet.access_method),
        row("Seed Phrase Location", &wallet.seed_phrase_location),
        row("Private Key Location", &wallet.private_key_location),
    ];
    if is_specified(&wallet.notes) {
        rows.push(row("Notes", &wallet.notes));
    }
    rows
}

fn exchange_rows(exchange: &Exchange) -> Vec<(String, String)> {
    let mut rows = vec![
        row("Exchange", &exchange.name),
        row("Username", &exchange.username),
        row("Email", &exchange.email),
        row("Two-Factor Backup", &exchange.two_factor_backup),
    ];
    if is_specified(&exchange.notes) {
        rows.push(row("Notes", &exchange.notes));
    }
    rows
}

fn beneficiary_rows(beneficiary: &Beneficiary) -> Vec<(String, String)> {
    let mut rows = vec![
        row("Name", &beneficiary.name),
        row("Relationship", &beneficiary.relationship),
        row("Percentage", &percentage(&beneficiary.percentage)),
        row("Phone", &beneficiary.phone),
        row("Email", &beneficiary.email),
    ];
    if is_specified(&beneficiary.contact) {
        rows.push(row("Contact", &beneficiary.contact));
    }
    if !beneficiary.address.is_empty() {
        rows.push(row("Address", &beneficiary.address.one_line()));
    }
    if is_specified(&beneficiary.bitcoin_address) {
        rows.push(row("Bitcoin Address", &beneficiary.bitcoin_address));
    }
    rows
}

fn contact_rows(contact: &TrustedContact) -> Vec<(String, String)> {
    vec![
        row("Name", &contact.name),
        row("Contact", &contact.contact),
        row("Relationship", &contact.relationship),
        row("Role", &contact.role),
    ]
}

/// Shares are rendered as entered; they are never checked against 100.
fn percentage(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.ends_with('%') {
        raw.to_string()
    } else {
        format!("{raw}%")
    }
}

fn signature_block(testator: &str) -> SectionBody {
    // The attestation carries the execution date; witnesses date their own lines.
    let line = |label: &str, printed_name: &str, dated: bool| SignatureLine {
        label: label.to_string(),
        printed_name: printed_name.to_string(),
        dated,
    };
    SectionBody::SignatureBlock {
        testator: testator.to_string(),
        warnings: boilerplate::WARNINGS.iter().map(|w| w.to_string()).collect(),
        attestation: boilerplate::attestation(testator),
        lines: vec![
            line("Testator", testator, false),
            line("Witness 1", "", true),
            line("Witness 2", "", true),
        ],
        notarization: boilerplate::NOTARIZATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use btcwill_core::record::{
        Address, Beneficiaries, BitcoinAssets, Executor, Instructions, PersonalInfo,
        StorageInfo,
    };
    use serde_json::json;

    use super::*;

    fn ids(sections: &[DocumentSection]) -> Vec<SectionId> {
        sections.iter().map(|s| s.id).collect()
    }

    fn section(sections: &[DocumentSection], id: SectionId) -> &SectionBody {
        &sections
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("missing section {id:?}"))
            .body
    }

    fn rows_of(body: &SectionBody) -> &[(String, String)] {
        match body {
            SectionBody::KeyValueTable { rows, .. } => rows,
            other => panic!("expected table, got {other:?}"),
        }
    }

    fn entries_of(body: &SectionBody) -> &[Entity] {
        match body {
            SectionBody::RepeatedEntityBlock { entries, .. } => entries,
            other => panic!("expected repeated block, got {other:?}"),
        }
    }

    fn full_record() -> WillRecord {
        WillRecord {
            personal_info: PersonalInfo {
                full_name: "Satoshi Nakamoto".into(),
                date_of_birth: "1975-04-05".into(),
                phone: "555-0100".into(),
                email: "satoshi@example.com".into(),
                address: Address {
                    street: "1 Genesis Way".into(),
                    city: "Austin".into(),
                    state: "TX".into(),
                    zip_code: "78701".into(),
                    country: "USA".into(),
                },
                executor: Executor {
                    name: "Hal Finney".into(),
                    contact: "hal@example.com".into(),
                },
            },
            bitcoin_assets: BitcoinAssets {
                wallets: vec![
                    Wallet {
                        name: "Cold".into(),
                        wallet_type: "hardware".into(),
                        notes: "in the safe".into(),
                        ..Wallet::default()
                    },
                    Wallet {
                        name: "Hot".into(),
                        wallet_type: "mobile".into(),
                        ..Wallet::default()
                    },
                ],
                exchanges: vec![Exchange {
                    name: "Kraken".into(),
                    ..Exchange::default()
                }],
                storage: StorageInfo {
                    method: "steel plate".into(),
                    ..StorageInfo::default()
                },
            },
            beneficiaries: Beneficiaries {
                primary: vec![Beneficiary {
                    name: "Ann".into(),
                    percentage: "100".into(),
                    bitcoin_address: "bc1qexample".into(),
                    ..Beneficiary::default()
                }],
                contingent: vec![Beneficiary {
                    name: "Bo".into(),
                    ..Beneficiary::default()
                }],
            },
            instructions: Instructions {
                access_instructions: "Open the safe.".into(),
                security_notes: "Beware phishing.".into(),
                trusted_contacts: vec![TrustedContact {
                    name: "Cy".into(),
                    role: "multisig cosigner".into(),
                    ..TrustedContact::default()
                }],
            },
            ..WillRecord::default()
        }
    }

    const FIXED: [SectionId; 9] = [
        SectionId::Title,
        SectionId::Declaration,
        SectionId::Revocation,
        SectionId::ExecutorAppointment,
        SectionId::NoContest,
        SectionId::SimultaneousDeath,
        SectionId::Taxes,
        SectionId::FiduciaryProtection,
        SectionId::Signature,
    ];

    #[test]
    fn empty_record_compiles_to_fixed_sections_only() {
        let sections = compile(&WillRecord::default());
        assert_eq!(ids(&sections), FIXED.to_vec());

        assert_eq!(
            section(&sections, SectionId::Title),
            &SectionBody::Title {
                document_type: "LAST WILL AND TESTAMENT".into(),
                testator: "[TESTATOR NAME]".into(),
            }
        );
        match section(&sections, SectionId::Declaration) {
            SectionBody::FreeTextClause { text, .. } => {
                assert!(text.starts_with("I, [TESTATOR NAME], a resident of [CITY], [STATE],"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match section(&sections, SectionId::ExecutorAppointment) {
            SectionBody::FreeTextClause { text, .. } => {
                assert!(text.contains("appoint [EXECUTOR NAME] as Executor"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_value_compiles_like_empty_record() {
        let sections = compile_value(&json!({})).expect("compile");
        assert_eq!(sections, compile(&WillRecord::default()));
    }

    #[test]
    fn single_wallet_yields_single_block() {
        let sections = compile_value(&json!({
            "bitcoin_assets": {"wallets": [{"name": "W1", "type": "hardware"}]}
        }))
        .expect("compile");

        let mut expected = FIXED.to_vec();
        expected.insert(4, SectionId::Wallets);
        assert_eq!(ids(&sections), expected);

        let entries = entries_of(section(&sections, SectionId::Wallets));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Wallet 1");
        assert_eq!(entries[0].rows[0], ("Name".into(), "W1".into()));
        assert_eq!(entries[0].rows[1], ("Type".into(), "hardware".into()));
        assert_eq!(
            entries[0].rows[2],
            ("Description".into(), "Not specified".into())
        );
        assert!(entries[0].rows.iter().all(|(label, _)| label != "Notes"));
    }

    #[test]
    fn over_allocated_percentages_render_unmodified() {
        let sections = compile_value(&json!({
            "beneficiaries": {"primary": [
                {"name": "Ann", "percentage": 60},
                {"name": "Bo", "percentage": "50"}
            ]}
        }))
        .expect("compile");

        let entries = entries_of(section(&sections, SectionId::PrimaryBeneficiaries));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Primary Beneficiary 1");
        assert_eq!(entries[1].title, "Primary Beneficiary 2");
        assert!(entries[0]
            .rows
            .contains(&("Percentage".into(), "60%".into())));
        assert!(entries[1]
            .rows
            .contains(&("Percentage".into(), "50%".into())));
    }

    #[test]
    fn empty_beneficiary_address_omits_address_row() {
        let sections = compile_value(&json!({
            "beneficiaries": {"primary": [{"name": "Ann", "address": {}}]}
        }))
        .expect("compile");

        let entry = &entries_of(section(&sections, SectionId::PrimaryBeneficiaries))[0];
        let labels: Vec<&str> = entry.rows.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Name", "Relationship", "Percentage", "Phone", "Email"]
        );
    }

    #[test]
    fn full_record_follows_section_order() {
        let sections = compile(&full_record());
        assert_eq!(ids(&sections), SECTION_ORDER.to_vec());

        assert_eq!(
            section(&sections, SectionId::Title),
            &SectionBody::Title {
                document_type: "LAST WILL AND TESTAMENT".into(),
                testator: "SATOSHI NAKAMOTO".into(),
            }
        );

        let personal = rows_of(section(&sections, SectionId::PersonalInformation));
        assert!(personal.contains(&(
            "Address".into(),
            "1 Genesis Way, Austin, TX 78701, USA".into()
        )));
        assert!(personal.contains(&("Executor".into(), "Hal Finney".into())));

        let wallets = entries_of(section(&sections, SectionId::Wallets));
        assert_eq!(wallets[0].title, "Wallet 1");
        assert_eq!(wallets[1].title, "Wallet 2");
        assert!(wallets[0]
            .rows
            .contains(&("Notes".into(), "in the safe".into())));

        let primary = &entries_of(section(&sections, SectionId::PrimaryBeneficiaries))[0];
        assert!(primary
            .rows
            .contains(&("Bitcoin Address".into(), "bc1qexample".into())));

        match section(&sections, SectionId::Signature) {
            SectionBody::SignatureBlock {
                testator, lines, ..
            } => {
                assert_eq!(testator, "Satoshi Nakamoto");
                assert_eq!(lines.len(), 3);
                assert_eq!(lines[0].printed_name, "Satoshi Nakamoto");
                assert!(lines[1].printed_name.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sections_track_populated_fields_only() {
        let mut record = full_record();
        record.bitcoin_assets.exchanges.clear();
        record.bitcoin_assets.storage = StorageInfo::default();
        record.beneficiaries.contingent.clear();
        record.instructions.security_notes = "   ".into();

        let got = ids(&compile(&record));
        let expected: Vec<SectionId> = SECTION_ORDER
            .into_iter()
            .filter(|id| {
                !matches!(
                    id,
                    SectionId::Exchanges
                        | SectionId::Storage
                        | SectionId::ContingentBeneficiaries
                        | SectionId::SecurityNotes
                )
            })
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn declaration_uses_address_city_and_state() {
        let sections = compile(&full_record());
        match section(&sections, SectionId::Declaration) {
            SectionBody::FreeTextClause { text, .. } => {
                assert!(text.starts_with("I, Satoshi Nakamoto, a resident of Austin, TX,"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn compilation_is_idempotent() {
        let record = full_record();
        assert_eq!(compile(&record), compile(&record));
    }

    #[test]
    fn malformed_top_level_shape_is_reported() {
        let err = compile_value(&json!(12)).expect_err("number is not a record");
        assert!(matches!(err, RecordError::MalformedShape { .. }));
        let err = compile_value(&json!({"bitcoin_assets": 12})).expect_err("scalar section");
        assert!(matches!(err, RecordError::MalformedShape { .. }));
    }

    #[test]
    fn optional_slots_are_marked_optional() {
        for id in FIXED {
            assert!(!id.is_optional(), "{id:?}");
        }
        let optional = SECTION_ORDER.iter().filter(|id| id.is_optional()).count();
        assert_eq!(optional, SECTION_ORDER.len() - FIXED.len());
    }

    #[test]
    fn sections_serialize_with_kind_tags() {
        let sections = compile(&WillRecord::default());
        let value = serde_json::to_value(&sections).expect("serialize");
        assert_eq!(value[0]["id"], "title");
        assert_eq!(value[0]["kind"], "title");
        assert_eq!(value[1]["kind"], "free_text_clause");
        assert_eq!(value[8]["kind"], "signature_block");
    }

    #[test]
    fn signature_block_carries_warnings_and_notary() {
        let sections = compile(&WillRecord::default());
        match section(&sections, SectionId::Signature) {
            SectionBody::SignatureBlock {
                warnings,
                lines,
                notarization,
                ..
            } => {
                assert_eq!(warnings.len(), 6);
                assert!(warnings[2].contains("permanent loss"));
                let dated: Vec<bool> = lines.iter().map(|l| l.dated).collect();
                assert_eq!(dated, vec![false, true, true]);
                assert!(notarization.contains("before me personally appeared"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn beneficiary_contact_gets_its_own_row() {
        let sections = compile_value(&json!({
            "beneficiaries": {"primary": [{"name": "Ann", "contact": "ann@example.com"}]}
        }))
        .expect("compile");
        let ann = &entries_of(section(&sections, SectionId::PrimaryBeneficiaries))[0];
        assert!(ann
            .rows
            .contains(&("Contact".into(), "ann@example.com".into())));

        let sections = compile_value(&json!({"beneficiaries": [{"name": "Bo"}]})).expect("compile");
        let bo = &entries_of(section(&sections, SectionId::PrimaryBeneficiaries))[0];
        assert!(bo.rows.iter().all(|(label, _)| label != "Contact"));
    }

    #[test]
    fn mixed_legacy_keys_keep_asset_sections() {
        let sections = compile_value(&json!({
            "bitcoin_assets": {
                "wallets": [{"name": "W1", "type": "hardware",
                    "notes": "a", "additional_notes": "b"}],
                "storage": {"method": "steel plate"},
                "storage_info": {"method": "steel plate"}
            },
            "instructions": {"trusted_contacts": [
                {"name": "Cy", "role": "cosigner", "expertise": "multisig"}
            ]}
        }))
        .expect("compile");

        let got = ids(&sections);
        assert!(got.contains(&SectionId::Wallets));
        assert!(got.contains(&SectionId::Storage));
        assert!(got.contains(&SectionId::TrustedContacts));
        let wallet = &entries_of(section(&sections, SectionId::Wallets))[0];
        assert!(wallet.rows.contains(&("Notes".into(), "a".into())));
        let cy = &entries_of(section(&sections, SectionId::TrustedContacts))[0];
        assert!(cy.rows.contains(&("Role".into(), "cosigner".into())));
    }

    #[test]
    fn percentage_keeps_existing_sign() {
        assert_eq!(percentage("25%"), "25%");
        assert_eq!(percentage(" 12.5 "), "12.5%");
        assert_eq!(percentage(""), "");
    }
}
