//! CLI entry point for the `ocat` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use object_catalog::cli::commands::{self, SearchParams};
use object_catalog::engine::{QueryTerm, SortOrder};
use object_catalog::{CatalogError, Value};

#[derive(Parser)]
#[command(
    name = "ocat",
    about = "Object catalog CLI: load a JSON catalog definition and query it"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display columns, indexes and object count of a catalog definition
    Info {
        /// Path to the catalog definition (.json)
        file: PathBuf,
    },
    /// Search the catalog
    Search {
        /// Path to the catalog definition (.json)
        file: PathBuf,
        /// Exact match term: index=value (repeatable)
        #[arg(long = "query", short = 'q')]
        equals: Vec<String>,
        /// Any-of term: index=v1,v2,... (repeatable)
        #[arg(long = "or")]
        any_of: Vec<String>,
        /// Range term: index=min..max, either bound may be empty (repeatable)
        #[arg(long)]
        range: Vec<String>,
        /// Regex term: index=pattern (repeatable)
        #[arg(long)]
        regex: Vec<String>,
        /// Sort by this index
        #[arg(long)]
        sort_on: Option<String>,
        /// Sort order: ascending or descending ("reverse" also accepted)
        #[arg(long)]
        sort_order: Option<String>,
        /// Keep only results whose metadata column equals a value: column=value (repeatable)
        #[arg(long)]
        filter: Vec<String>,
        /// Page number, starting at 0
        #[arg(long, default_value = "0")]
        page: usize,
        /// Results per page
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// List the distinct values held by an index
    Unique {
        /// Path to the catalog definition (.json)
        file: PathBuf,
        /// Index name
        index: String,
    },
}

/// Split `name=rest` at the first '='.
fn split_arg(arg: &str) -> Option<(String, &str)> {
    let (name, rest) = arg.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), rest))
}

fn parse_bound(s: &str) -> Option<Value> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(Value::parse_literal(s))
    }
}

fn parse_terms(
    equals: Vec<String>,
    any_of: Vec<String>,
    range: Vec<String>,
    regex: Vec<String>,
) -> Result<Vec<(String, QueryTerm)>, String> {
    let mut terms = Vec::new();
    for arg in &equals {
        let (name, value) = split_arg(arg).ok_or_else(|| format!("bad --query {:?}", arg))?;
        terms.push((name, QueryTerm::equals(Value::parse_literal(value))));
    }
    for arg in &any_of {
        let (name, values) = split_arg(arg).ok_or_else(|| format!("bad --or {:?}", arg))?;
        let values: Vec<Value> = values.split(',').map(|v| Value::parse_literal(v.trim())).collect();
        terms.push((name, QueryTerm::any_of(values)));
    }
    for arg in &range {
        let (name, bounds) = split_arg(arg).ok_or_else(|| format!("bad --range {:?}", arg))?;
        let (min, max) = bounds
            .split_once("..")
            .ok_or_else(|| format!("bad --range {:?}: expected min..max", arg))?;
        terms.push((name, QueryTerm::range(parse_bound(min), parse_bound(max))));
    }
    for arg in &regex {
        let (name, pattern) = split_arg(arg).ok_or_else(|| format!("bad --regex {:?}", arg))?;
        let term = QueryTerm::regex(pattern).map_err(|e| format!("bad --regex {:?}: {}", arg, e))?;
        terms.push((name, term));
    }
    Ok(terms)
}

fn parse_filters(filters: Vec<String>) -> Result<Vec<(String, Value)>, String> {
    filters
        .iter()
        .map(|arg| {
            split_arg(arg)
                .map(|(name, value)| (name, Value::parse_literal(value)))
                .ok_or_else(|| format!("bad --filter {:?}", arg))
        })
        .collect()
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let json = cli.format == "json";

    let result = match cli.command {
        Commands::Info { file } => commands::cmd_info(&file, json),
        Commands::Search {
            file,
            equals,
            any_of,
            range,
            regex,
            sort_on,
            sort_order,
            filter,
            page,
            batch_size,
        } => {
            let terms = match parse_terms(equals, any_of, range, regex) {
                Ok(terms) => terms,
                Err(msg) => {
                    eprintln!("Error: {}", msg);
                    process::exit(3);
                }
            };
            let filters = match parse_filters(filter) {
                Ok(filters) => filters,
                Err(msg) => {
                    eprintln!("Error: {}", msg);
                    process::exit(3);
                }
            };
            let params = SearchParams {
                terms,
                sort_on,
                sort_order: sort_order.as_deref().map(SortOrder::parse),
                filters,
                page,
                batch_size,
            };
            commands::cmd_search(&file, params, json)
        }
        Commands::Unique { file, index } => commands::cmd_unique(&file, &index, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            CatalogError::Io(_) => 1,
            CatalogError::Json(_) => 2,
            CatalogError::UnknownIndex(_)
            | CatalogError::NotEnumerable(_)
            | CatalogError::NotSortable(_) => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
