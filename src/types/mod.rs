//! Shared data types for the object catalog.

pub mod error;
pub mod object;
pub mod value;

pub use error::{AttributeError, CatalogError, CatalogResult, IndexError, IndexResult};
pub use object::{resolve_attribute, AttrResult, Attribute, Catalogable, Document, Method};
pub use value::Value;

/// Internal integer record identifier.
pub type Rid = u64;

/// Raw relevance score reported by ranked indexes.
pub type Score = u64;

/// A metadata record: one value per schema column, in column order.
pub type Record = Vec<Value>;

/// Prefix reserved for internal names; columns and indexes may not use it.
pub const RESERVED_PREFIX: char = '_';

/// Default number of results per page.
pub const DEFAULT_BATCH_SIZE: usize = 20;
