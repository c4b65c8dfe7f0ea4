//! Query arguments: tagged query terms plus sort options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CatalogError, CatalogResult, Value};

/// One criterion applied to one index.
#[derive(Debug, Clone)]
pub enum QueryTerm {
    /// Match records whose indexed value equals this value. For full-text
    /// indexes a string value is a text query.
    Equals(Value),
    /// Match records whose indexed value (as text) matches the pattern.
    Regex(regex::Regex),
    /// Union of sub-terms.
    Or(Vec<QueryTerm>),
    /// Inclusive range; a missing bound is open.
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
}

impl QueryTerm {
    /// An equality term.
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::Equals(value.into())
    }

    /// A regex term.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(Self::Regex)
    }

    /// Equality with any of the given values.
    pub fn any_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Or(values.into_iter().map(|v| Self::Equals(v.into())).collect())
    }

    /// An inclusive range.
    pub fn range(min: Option<Value>, max: Option<Value>) -> Self {
        Self::Range { min, max }
    }

    /// Short name of the term kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Equals(_) => "equals",
            Self::Regex(_) => "regex",
            Self::Or(_) => "or",
            Self::Range { .. } => "range",
        }
    }

    /// Build a term from a JSON argument.
    ///
    /// Arrays become `Or`, `{"regex": ".."}` a regex, objects with `min`
    /// and/or `max` a range; anything else is an equality term.
    pub fn from_json(json: serde_json::Value) -> CatalogResult<Self> {
        match json {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Self::from_json)
                .collect::<CatalogResult<Vec<_>>>()
                .map(Self::Or),
            serde_json::Value::Object(mut map) => {
                if let Some(pattern) = map.remove("regex") {
                    let pattern = pattern.as_str().ok_or_else(|| {
                        CatalogError::InvalidQuery("regex pattern must be a string".to_string())
                    })?;
                    return Self::regex(pattern)
                        .map_err(|e| CatalogError::InvalidQuery(e.to_string()));
                }
                if map.contains_key("min") || map.contains_key("max") {
                    let min = map.remove("min").map(Value::from);
                    let max = map.remove("max").map(Value::from);
                    return Ok(Self::Range { min, max });
                }
                Ok(Self::Equals(Value::from(serde_json::Value::Object(map))))
            }
            other => Ok(Self::Equals(Value::from(other))),
        }
    }
}

/// Direction of sorted output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `reverse` and `descending` (any case) mean descending; anything else ascending.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "reverse" | "descending" => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

/// A multi-criterion search: one term per query argument name, plus sort options.
#[derive(Debug, Clone, Default)]
pub struct Query {
    terms: BTreeMap<String, QueryTerm>,
    sort_on: Option<String>,
    sort_order: Option<SortOrder>,
}

impl Query {
    /// An empty query (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term for an argument name.
    pub fn with(mut self, name: impl Into<String>, term: QueryTerm) -> Self {
        self.terms.insert(name.into(), term);
        self
    }

    /// Add an equality term.
    pub fn with_equals(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(name, QueryTerm::equals(value))
    }

    /// Sort output by the named index.
    pub fn with_sort_on(mut self, index: impl Into<String>) -> Self {
        self.sort_on = Some(index.into());
        self
    }

    /// Set the sort direction.
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Insert or replace a term.
    pub fn insert(&mut self, name: impl Into<String>, term: QueryTerm) {
        self.terms.insert(name.into(), term);
    }

    /// The term for an argument name.
    pub fn term(&self, name: &str) -> Option<&QueryTerm> {
        self.terms.get(name)
    }

    /// All terms, ordered by argument name.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &QueryTerm)> + '_ {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the query has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Name of the requested sort index.
    pub fn sort_on(&self) -> Option<&str> {
        self.sort_on.as_deref()
    }

    /// Requested sort direction, if any.
    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_order
    }

    /// Build a query from string arguments, as a request handler would see them.
    ///
    /// `sort-on`/`sort_on` and `sort-order`/`sort_order` set the sort options;
    /// every other argument is an equality term on a parsed literal.
    pub fn from_args<K, V>(args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::new();
        for (key, value) in args {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "sort-on" | "sort_on" => query.sort_on = Some(value.to_string()),
                "sort-order" | "sort_order" => query.sort_order = Some(SortOrder::parse(value)),
                _ => query.insert(key, QueryTerm::Equals(Value::parse_literal(value))),
            }
        }
        query
    }

    /// Build a query from a JSON object of arguments (see [`QueryTerm::from_json`]).
    pub fn from_json(json: serde_json::Value) -> CatalogResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(CatalogError::InvalidQuery(
                "query must be a JSON object".to_string(),
            ));
        };
        let mut query = Self::new();
        for (key, value) in map {
            match key.as_str() {
                "sort-on" | "sort_on" => {
                    let index = value.as_str().ok_or_else(|| {
                        CatalogError::InvalidQuery("sort-on must be a string".to_string())
                    })?;
                    query.sort_on = Some(index.to_string());
                }
                "sort-order" | "sort_order" => {
                    query.sort_order = Some(SortOrder::parse(value.as_str().unwrap_or_default()));
                }
                _ => query.insert(key, QueryTerm::from_json(value)?),
            }
        }
        Ok(query)
    }
}
