//! Cataloged objects and attribute resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::error::AttributeError;
use super::value::Value;

/// Result of invoking a method attribute.
pub type AttrResult = Result<Value, AttributeError>;

/// A shareable zero-argument accessor.
pub type Method = Arc<dyn Fn() -> AttrResult + Send + Sync>;

/// One attribute read from an object: either a plain value or a method that
/// is called with no arguments to produce the value.
pub enum Attribute<'a> {
    Value(Value),
    Method(Box<dyn Fn() -> AttrResult + 'a>),
}

/// Anything that can be cataloged: an object exposing named attributes.
pub trait Catalogable {
    /// Look up an attribute by name. `None` means the object has no such attribute.
    fn attribute(&self, name: &str) -> Option<Attribute<'_>>;
}

/// Read an attribute, invoking it if it is a method.
///
/// Returns `None` if the attribute is absent or the method failed.
pub fn resolve_attribute(object: &dyn Catalogable, name: &str) -> Option<Value> {
    match object.attribute(name)? {
        Attribute::Value(v) => Some(v),
        Attribute::Method(call) => match call() {
            Ok(v) => Some(v),
            Err(e) => {
                log::trace!("attribute {} unavailable: {}", name, e);
                None
            }
        },
    }
}

/// A simple attribute bag: named values plus optional named methods.
#[derive(Clone, Default)]
pub struct Document {
    fields: BTreeMap<String, Value>,
    methods: BTreeMap<String, Method>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attach a method attribute; it shadows a field of the same name.
    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn() -> AttrResult + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Set a field value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a plain field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Build a document from a JSON object. Non-object JSON yields an empty document.
    pub fn from_json(json: serde_json::Value) -> Self {
        let mut doc = Self::new();
        if let serde_json::Value::Object(map) = json {
            for (k, v) in map {
                doc.fields.insert(k, Value::from(v));
            }
        }
        doc
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("fields", &self.fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Catalogable for Document {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Attribute::Method(Box::new(move || (**method)())));
        }
        self.fields.get(name).cloned().map(Attribute::Value)
    }
}

impl Catalogable for BTreeMap<String, Value> {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        self.get(name).cloned().map(Attribute::Value)
    }
}
