//! The catalog: a metadata table plus a set of pluggable indexes.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::{CatalogConfig, CatalogDefinition};
use crate::diagnostics::{Diagnostic, DiagnosticsSink, LogSink};
use crate::engine::{
    Emission, Hit, LazyCat, LazyMap, Query, QueryEngine, RecordView, SearchResults, SortOrder,
    ViewDescriptor,
};
use crate::index::{Index, IndexKind, IndexRegistry, Lexicon, SharedLexicon, Sortable};
use crate::store::{IdentifierMap, MetadataStore, Schema};
use crate::types::{
    resolve_attribute, Catalogable, CatalogError, CatalogResult, Document, Record, Rid, Value,
};

/// Outcome of a search: the lazy results plus evaluation bookkeeping.
pub struct Search<'a> {
    pub results: SearchResults<'a>,
    /// Query argument names consumed by some index.
    pub used: BTreeSet<String>,
    /// Index whose failure stopped the search early, if any.
    pub aborted_by: Option<String>,
}

/// An object catalog.
///
/// Keeps a metadata record per cataloged object for cheap result display,
/// maps caller-supplied uids to integer rids, and maintains a set of
/// independent indexes that searches intersect.
///
/// The catalog does no locking of its own; mutating calls take `&mut self`
/// and all-or-nothing behaviour across indexes is left to the caller.
pub struct Catalog {
    schema: Schema,
    data: MetadataStore,
    ids: IdentifierMap,
    indexes: IndexRegistry,
    lexicon: SharedLexicon,
    descriptor: Arc<ViewDescriptor>,
    config: CatalogConfig,
    sink: Arc<dyn DiagnosticsSink>,
}

impl Catalog {
    /// Create an empty catalog with default configuration.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create an empty catalog with the given configuration.
    pub fn with_config(config: CatalogConfig) -> Self {
        let schema = Schema::new();
        let descriptor = Arc::new(ViewDescriptor::new(0, &schema));
        Self {
            schema,
            data: MetadataStore::new(),
            ids: IdentifierMap::new(),
            indexes: IndexRegistry::new(),
            lexicon: Lexicon::shared(),
            descriptor,
            config,
            sink: Arc::new(LogSink),
        }
    }

    /// Report non-fatal conditions to `sink` instead of the log.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Share an existing lexicon with full-text indexes created from now on.
    pub fn with_lexicon(mut self, lexicon: SharedLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Build and populate a catalog from a definition.
    pub fn from_definition(definition: CatalogDefinition) -> CatalogResult<Self> {
        let mut catalog = Self::with_config(definition.config);
        for column in definition.columns {
            catalog.add_column(&column.name, column.default)?;
        }
        for index in definition.indexes {
            catalog.add_index(&index.name, index.kind)?;
        }
        for object in definition.objects {
            let document = Document::from_json(serde_json::Value::Object(object.attributes));
            catalog.catalog_object(&document, &object.uid, None)?;
        }
        Ok(catalog)
    }

    fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    /// Rebuild the view descriptor after a column or index change.
    fn refresh_view(&mut self) {
        let version = self.descriptor.version() + 1;
        self.descriptor = Arc::new(ViewDescriptor::new(version, &self.schema));
    }

    // ==================== Schema ====================

    /// Add a metadata column. Existing records get `default`, or the missing
    /// sentinel when no (or an empty) default is given.
    pub fn add_column(&mut self, name: &str, default: Option<Value>) -> CatalogResult<()> {
        let mut schema = self.schema.clone();
        schema.add(name)?;

        let default = match default {
            None | Some(Value::Null) | Some(Value::Missing) => Value::Missing,
            Some(Value::Str(s)) if s.is_empty() => Value::Missing,
            Some(v) => v,
        };
        let data = self.data.with_column_appended(&default);

        self.schema = schema;
        self.data = data;
        self.refresh_view();
        Ok(())
    }

    /// Remove a metadata column. An unknown column is reported and ignored.
    pub fn del_column(&mut self, name: &str) {
        let Some(offset) = self.schema.offset(name) else {
            self.report(Diagnostic::warning(
                "del_column",
                format!("attempted to delete nonexistent column {}", name),
            ));
            return;
        };
        let mut schema = self.schema.clone();
        schema.remove(name);
        let data = self.data.with_column_removed(offset);

        self.schema = schema;
        self.data = data;
        self.refresh_view();
    }

    // ==================== Indexes ====================

    /// Create and register a built-in index. Full-text indexes share the
    /// catalog lexicon.
    pub fn add_index(&mut self, name: &str, kind: IndexKind) -> CatalogResult<()> {
        let index = kind.build(name, &self.lexicon);
        self.add_custom_index(name, index)
    }

    /// Register any index implementation.
    pub fn add_custom_index(&mut self, name: &str, index: Box<dyn Index>) -> CatalogResult<()> {
        self.indexes.add(name, index)?;
        self.refresh_view();
        Ok(())
    }

    /// Remove an index.
    pub fn del_index(&mut self, name: &str) -> CatalogResult<()> {
        self.indexes.remove(name)?;
        self.refresh_view();
        Ok(())
    }

    // ==================== Cataloging ====================

    /// Snapshot an object's attributes into a metadata record.
    ///
    /// Method attributes are invoked; absent or failing attributes become
    /// the missing sentinel.
    pub fn recordify(&self, object: &dyn Catalogable) -> Record {
        self.schema
            .names()
            .iter()
            .map(|name| resolve_attribute(object, name).unwrap_or(Value::Missing))
            .collect()
    }

    /// Catalog (or recatalog) an object under `uid`.
    ///
    /// Returns the sum of the counts reported by the indexes. If an index
    /// fails, the error is returned but earlier indexes and the metadata
    /// table keep their updates.
    pub fn catalog_object(
        &mut self,
        object: &dyn Catalogable,
        uid: &str,
        threshold: Option<usize>,
    ) -> CatalogResult<usize> {
        let (rid, _) = self.ids.assign(uid);
        let record = self.recordify(object);
        self.data.insert(rid, record);

        let mut total = 0;
        for (name, index) in self.indexes.iter_mut() {
            match index.as_indexable() {
                Some(indexer) => {
                    total += indexer.index_object(rid, object, threshold).map_err(|source| {
                        CatalogError::Index {
                            index: name.to_string(),
                            source,
                        }
                    })?;
                }
                None => self.sink.report(Diagnostic::error(
                    "catalog_object",
                    format!("index {} cannot index objects", name),
                )),
            }
        }
        Ok(total)
    }

    /// Remove the object cataloged under `uid`, returning its rid.
    ///
    /// Never fails: an unknown uid or a failing index is reported and skipped.
    pub fn uncatalog_object(&mut self, uid: &str) -> Option<Rid> {
        let Some(rid) = self.ids.rid_for(uid) else {
            self.report(Diagnostic::warning(
                "uncatalog_object",
                format!("no object cataloged with uid {}", uid),
            ));
            return None;
        };

        for (name, index) in self.indexes.iter_mut() {
            if let Some(unindexer) = index.as_unindexable() {
                if let Err(e) = unindexer.unindex_object(rid) {
                    self.sink.report(Diagnostic::error(
                        "uncatalog_object",
                        format!("index {} failed to unindex rid {}: {}", name, rid, e),
                    ));
                }
            }
        }

        if self.data.remove(rid).is_none() {
            self.report(Diagnostic::error(
                "uncatalog_object",
                format!("rid {} missing from metadata table", rid),
            ));
        }
        self.ids.remove(uid);
        Some(rid)
    }

    /// Drop all cataloged data. Columns and indexes are kept.
    pub fn clear(&mut self) {
        self.data.clear();
        self.ids.clear();
        for (name, index) in self.indexes.iter_mut() {
            match index.as_clearable() {
                Some(clearable) => clearable.clear(),
                None => self.sink.report(Diagnostic::warning(
                    "clear",
                    format!("index {} cannot be cleared", name),
                )),
            }
        }
    }

    // ==================== Lookup ====================

    /// Distinct values held by an index.
    pub fn unique_values_for(&self, name: &str) -> CatalogResult<Vec<Value>> {
        let index = self
            .indexes
            .get(name)
            .ok_or_else(|| CatalogError::UnknownIndex(name.to_string()))?;
        let enumerable = index
            .as_enumerable()
            .ok_or_else(|| CatalogError::NotEnumerable(name.to_string()))?;
        Ok(enumerable.unique_values())
    }

    /// The rid of a cataloged uid.
    pub fn has_uid(&self, uid: &str) -> Option<Rid> {
        self.ids.rid_for(uid)
    }

    /// The uid a rid was cataloged under.
    pub fn uid_for(&self, rid: Rid) -> Option<&str> {
        self.ids.uid_for(rid)
    }

    /// The record view for one rid, with unranked scores.
    pub fn get(&self, rid: Rid) -> Option<RecordView<'_>> {
        let record = self.data.get(rid)?;
        Some(RecordView::new(
            self.descriptor.clone(),
            Some(record.as_slice()),
            Hit::unranked(rid),
        ))
    }

    // ==================== Search ====================

    /// Search and return lazily materialized record views.
    pub fn search_results(&self, query: &Query) -> CatalogResult<SearchResults<'_>> {
        Ok(self.search(query, None)?.results)
    }

    /// Search, also reporting which arguments were used and whether an index
    /// stopped the search. `used` seeds the consumed-argument set.
    pub fn search(
        &self,
        query: &Query,
        used: Option<BTreeSet<String>>,
    ) -> CatalogResult<Search<'_>> {
        let sort_index = match query.sort_on().or(self.config.default_sort_on.as_deref()) {
            Some(name) => Some(self.sort_index(name)?),
            None => None,
        };
        let order = query
            .sort_order()
            .unwrap_or(self.config.default_sort_order);

        let engine = QueryEngine::new(&self.indexes, &self.data, self.sink.as_ref());
        let evaluation = engine.evaluate(query, sort_index, used);
        let results = self.materialize(evaluation.emitted, order);

        Ok(Search {
            results,
            used: evaluation.used,
            aborted_by: evaluation.aborted_by,
        })
    }

    fn sort_index(&self, name: &str) -> CatalogResult<&dyn Sortable> {
        let index = self
            .indexes
            .get(name)
            .ok_or_else(|| CatalogError::UnknownIndex(name.to_string()))?;
        index
            .as_sortable()
            .ok_or_else(|| CatalogError::NotSortable(name.to_string()))
    }

    /// Turn evaluator output into one lazy sequence of views.
    ///
    /// Buckets are ordered by key, then reversed as a whole for descending
    /// order; hits within a bucket keep their order.
    fn materialize(&self, emitted: Vec<Emission>, order: SortOrder) -> SearchResults<'_> {
        let mut sequences: Vec<Vec<Hit>> = Vec::with_capacity(emitted.len());
        let mut buckets: Vec<(Value, Vec<Hit>)> = Vec::new();
        for emission in emitted {
            match emission {
                Emission::Sequence(hits) => sequences.push(hits),
                Emission::Bucket(key, hits) => buckets.push((key, hits)),
            }
        }
        if !buckets.is_empty() {
            buckets.sort_by(|a, b| a.0.cmp(&b.0));
            if order == SortOrder::Descending {
                buckets.reverse();
            }
            sequences.extend(buckets.into_iter().map(|(_, hits)| hits));
        }

        let mut results = LazyCat::empty();
        for hits in sequences {
            let data = &self.data;
            let descriptor = self.descriptor.clone();
            results.push(Box::new(LazyMap::new(hits, move |hit: &Hit| {
                RecordView::new(
                    descriptor.clone(),
                    data.get(hit.rid).map(|r| r.as_slice()),
                    *hit,
                )
            })));
        }
        results
    }

    // ==================== Accessors ====================

    /// Number of cataloged objects.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is cataloged.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The metadata schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Metadata column names in order.
    pub fn names(&self) -> &[String] {
        self.schema.names()
    }

    /// The metadata table.
    pub fn metadata(&self) -> &MetadataStore {
        &self.data
    }

    /// The uid/rid mapping.
    pub fn identifiers(&self) -> &IdentifierMap {
        &self.ids
    }

    /// The index registry.
    pub fn indexes(&self) -> &IndexRegistry {
        &self.indexes
    }

    /// Look up an index by name.
    pub fn index(&self, name: &str) -> Option<&dyn Index> {
        self.indexes.get(name)
    }

    /// Registered index names in order.
    pub fn index_names(&self) -> Vec<String> {
        self.indexes.names()
    }

    /// The lexicon shared by full-text indexes.
    pub fn lexicon(&self) -> &SharedLexicon {
        &self.lexicon
    }

    /// The current view descriptor.
    pub fn descriptor(&self) -> &Arc<ViewDescriptor> {
        &self.descriptor
    }

    /// Catalog configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
