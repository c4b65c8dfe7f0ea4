//! CLI command implementations.

use std::path::Path;

use crate::catalog::Catalog;
use crate::config::CatalogDefinition;
use crate::engine::{LazyFilter, LazySequence, Query, QueryTerm, RecordView, SortOrder};
use crate::types::{CatalogResult, Value};

/// Parameters for the `search` command.
pub struct SearchParams {
    /// (index name, term) pairs.
    pub terms: Vec<(String, QueryTerm)>,
    /// Sort index.
    pub sort_on: Option<String>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Metadata column equality filters applied after the search.
    pub filters: Vec<(String, Value)>,
    /// Page number, starting at 0.
    pub page: usize,
    /// Page size; the catalog default when absent.
    pub batch_size: Option<usize>,
}

fn load(path: &Path) -> CatalogResult<Catalog> {
    let definition = CatalogDefinition::from_file(path)?;
    Catalog::from_definition(definition)
}

/// Display information about a catalog definition.
pub fn cmd_info(path: &Path, json: bool) -> CatalogResult<()> {
    let catalog = load(path)?;
    let indexes: Vec<(String, String)> = catalog
        .indexes()
        .iter()
        .map(|(name, index)| (name.to_string(), index.kind().to_string()))
        .collect();

    if json {
        let info = serde_json::json!({
            "file": path.display().to_string(),
            "objects": catalog.len(),
            "columns": catalog.names(),
            "indexes": indexes
                .iter()
                .map(|(name, kind)| serde_json::json!({"name": name, "kind": kind}))
                .collect::<Vec<_>>(),
            "words": catalog.lexicon().read().len(),
            "batch_size": catalog.config().batch_size,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("File: {}", path.display());
        println!("Objects: {}", catalog.len());
        println!("Columns: {}", catalog.names().join(", "));
        println!("Indexes:");
        for (name, kind) in &indexes {
            println!("  {} ({})", name, kind);
        }
        println!("Lexicon words: {}", catalog.lexicon().read().len());
    }
    Ok(())
}

/// Run a search and print one page of results.
pub fn cmd_search(path: &Path, params: SearchParams, json: bool) -> CatalogResult<()> {
    let catalog = load(path)?;

    let mut query = Query::new();
    for (name, term) in params.terms {
        query.insert(name, term);
    }
    if let Some(sort_on) = params.sort_on {
        query = query.with_sort_on(sort_on);
    }
    if let Some(order) = params.sort_order {
        query = query.with_sort_order(order);
    }

    let search = catalog.search(&query, None)?;
    if let Some(index) = &search.aborted_by {
        eprintln!("Warning: search stopped early at index {}", index);
    }

    let batch_size = params.batch_size.unwrap_or(catalog.config().batch_size).max(1);
    let filters = params.filters;
    let page = if filters.is_empty() {
        search.results.page(params.page, batch_size)
    } else {
        let filtered = LazyFilter::new(search.results, move |view: &RecordView<'_>| {
            filters
                .iter()
                .all(|(column, value)| view.get(column) == Some(value))
        });
        filtered.page(params.page, batch_size)
    };

    if json {
        let rows: Vec<serde_json::Value> = page.iter().map(RecordView::to_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for view in &page {
            let uid = catalog.uid_for(view.rid()).unwrap_or("?");
            let columns: Vec<String> = catalog
                .names()
                .iter()
                .map(|name| {
                    let value = view.get(name).cloned().unwrap_or(Value::Missing);
                    format!("{}={}", name, value)
                })
                .collect();
            println!(
                "[{}] {} (score {}, {}%) {}",
                view.rid(),
                uid,
                view.score(),
                view.normalized_score(),
                columns.join(" ")
            );
        }
        println!("\n{} results on page {}", page.len(), params.page);
    }
    Ok(())
}

/// List the distinct values of an index.
pub fn cmd_unique(path: &Path, index: &str, json: bool) -> CatalogResult<()> {
    let catalog = load(path)?;
    let values = catalog.unique_values_for(index)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for value in &values {
            println!("{}", value);
        }
        println!("\n{} distinct values", values.len());
    }
    Ok(())
}
