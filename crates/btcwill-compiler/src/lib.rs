//! Document compiler: turns a decrypted `WillRecord` into an ordered list of
//! typed, renderer-agnostic document sections.

mod boilerplate;
pub mod compile;
pub mod render;
pub mod section;

pub use compile::{compile, compile_value, SECTION_ORDER};
pub use section::{DocumentSection, Entity, SectionBody, SectionId, SignatureLine};
