//! Core abstractions for btcwill: the estate record model, boundary
//! normalization, and the persistence/repository contracts.
//! Encryption and document compilation live in their own crates.

mod lenient;
pub mod normalize;
pub mod record;
pub mod storage;
pub mod wills;

pub use normalize::{parse_or_pass_through, record_from_value, RecordError};
pub use record::WillRecord;
