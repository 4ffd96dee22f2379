//! Concrete `BlobStore` implementations.
//! Record sections arrive already sealed by the codec, so the store itself
//! only has to be durable.

pub mod file_store;
