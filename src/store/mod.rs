//! Catalog tables holding per-object metadata and the uid to rid mapping.

pub mod metadata;
pub mod schema;
pub mod uids;

pub use metadata::MetadataStore;
pub use schema::{validate_name, Schema};
pub use uids::IdentifierMap;
