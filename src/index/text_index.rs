//! Full-text index: word postings with term-frequency scores.
//!
//! Text queries are whitespace-separated words combined left to right.
//! Adjacent words are ANDed; `and`, `or` and `not` (`and not`) are infix
//! operators. Scores are term frequencies, summed across AND and OR.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::result_set::{difference_scored, intersect_scored, union_scored};
use crate::engine::{Query, QueryTerm, ResultSet};
use crate::types::{resolve_attribute, Catalogable, IndexError, IndexResult, Rid, Score, Value};

use super::lexicon::{SharedLexicon, WordId};
use super::tokenizer::tokenize;
use super::{Clearable, Enumerable, Index, Indexable, Queryable, Unindexable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
    AndNot,
}

/// Full-text index over one attribute, bound to a shared lexicon.
#[derive(Debug, Clone)]
pub struct TextIndex {
    id: String,
    lexicon: SharedLexicon,
    /// word id -> (rid -> term frequency)
    postings: BTreeMap<WordId, BTreeMap<Rid, Score>>,
    /// rid -> word ids indexed for it
    unindex: BTreeMap<Rid, Vec<WordId>>,
}

impl TextIndex {
    /// Create an index over the attribute named `id`.
    pub fn new(id: impl Into<String>, lexicon: SharedLexicon) -> Self {
        Self {
            id: id.into(),
            lexicon,
            postings: BTreeMap::new(),
            unindex: BTreeMap::new(),
        }
    }

    /// The lexicon this index writes words into.
    pub fn lexicon(&self) -> &SharedLexicon {
        &self.lexicon
    }

    /// Number of indexed rids.
    pub fn len(&self) -> usize {
        self.unindex.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.unindex.is_empty()
    }

    fn remove(&mut self, rid: Rid) {
        let Some(wids) = self.unindex.remove(&rid) else {
            return;
        };
        for wid in wids {
            if let Some(rids) = self.postings.get_mut(&wid) {
                rids.remove(&rid);
                if rids.is_empty() {
                    self.postings.remove(&wid);
                }
            }
        }
    }

    fn word_postings(&self, wid: Option<WordId>) -> BTreeMap<Rid, Score> {
        wid.and_then(|w| self.postings.get(&w))
            .cloned()
            .unwrap_or_default()
    }

    /// Scores for one query word. `None` if it produced no tokens.
    fn word_scores(&self, word: &str) -> Option<BTreeMap<Rid, Score>> {
        let lexicon = self.lexicon.read();
        let mut acc: Option<BTreeMap<Rid, Score>> = None;
        for token in tokenize(word) {
            let hits = self.word_postings(lexicon.word_id(&token));
            acc = Some(match acc {
                None => hits,
                Some(a) => intersect_scored(a, &hits),
            });
        }
        acc
    }

    /// Evaluate a text query string.
    pub fn search(&self, text: &str) -> IndexResult<BTreeMap<Rid, Score>> {
        let mut acc: Option<BTreeMap<Rid, Score>> = None;
        let mut op = Op::And;
        let mut pending = false;

        for word in text.split_whitespace() {
            match word.to_lowercase().as_str() {
                "and" => {
                    op = Op::And;
                    pending = true;
                }
                "or" => {
                    op = Op::Or;
                    pending = true;
                }
                "not" | "andnot" => {
                    op = Op::AndNot;
                    pending = true;
                }
                _ => {
                    // A word with no tokens is a no-op operand.
                    let Some(hits) = self.word_scores(word) else {
                        op = Op::And;
                        pending = false;
                        continue;
                    };
                    acc = Some(match (acc, op) {
                        (None, Op::AndNot) => BTreeMap::new(),
                        (None, _) => hits,
                        (Some(a), Op::And) => intersect_scored(a, &hits),
                        (Some(a), Op::Or) => union_scored([a, hits]),
                        (Some(a), Op::AndNot) => difference_scored(a, &hits),
                    });
                    op = Op::And;
                    pending = false;
                }
            }
        }

        if pending {
            return Err(IndexError::MalformedQuery(format!(
                "operator without operand in {:?}",
                text
            )));
        }
        Ok(acc.unwrap_or_default())
    }

    fn evaluate(&self, term: &QueryTerm) -> IndexResult<BTreeMap<Rid, Score>> {
        match term {
            QueryTerm::Equals(value) => match value.text() {
                Some(text) => self.search(&text),
                None => Ok(BTreeMap::new()),
            },
            QueryTerm::Or(terms) => {
                let parts = terms
                    .iter()
                    .map(|t| self.evaluate(t))
                    .collect::<IndexResult<Vec<_>>>()?;
                Ok(union_scored(parts))
            }
            QueryTerm::Regex(re) => {
                let wids = self.lexicon.read().matching(re);
                Ok(union_scored(
                    wids.into_iter().map(|wid| self.word_postings(Some(wid))),
                ))
            }
            QueryTerm::Range { .. } => Err(IndexError::UnsupportedTerm {
                index: self.id.clone(),
                term: term.kind(),
            }),
        }
    }
}

impl Index for TextIndex {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "TextIndex"
    }

    fn as_indexable(&mut self) -> Option<&mut dyn Indexable> {
        Some(self)
    }

    fn as_unindexable(&mut self) -> Option<&mut dyn Unindexable> {
        Some(self)
    }

    fn as_queryable(&self) -> Option<&dyn Queryable> {
        Some(self)
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        Some(self)
    }

    fn as_clearable(&mut self) -> Option<&mut dyn Clearable> {
        Some(self)
    }
}

impl Indexable for TextIndex {
    fn index_object(
        &mut self,
        rid: Rid,
        object: &dyn Catalogable,
        _threshold: Option<usize>,
    ) -> IndexResult<usize> {
        self.remove(rid);
        let Some(text) = resolve_attribute(object, &self.id).and_then(|v| v.text()) else {
            return Ok(0);
        };

        let mut counts: BTreeMap<String, Score> = BTreeMap::new();
        for token in tokenize(&text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        if counts.is_empty() {
            return Ok(0);
        }

        let mut wids = Vec::with_capacity(counts.len());
        {
            let mut lexicon = self.lexicon.write();
            for (word, count) in &counts {
                let wid = lexicon.get_or_insert(word);
                self.postings.entry(wid).or_default().insert(rid, *count);
                wids.push(wid);
            }
        }
        let affected = wids.len();
        self.unindex.insert(rid, wids);
        Ok(affected)
    }
}

impl Unindexable for TextIndex {
    fn unindex_object(&mut self, rid: Rid) -> IndexResult<()> {
        self.remove(rid);
        Ok(())
    }
}

impl Queryable for TextIndex {
    fn apply(&self, query: &Query) -> IndexResult<Option<(ResultSet, Vec<String>)>> {
        let Some(term) = query.term(&self.id) else {
            return Ok(None);
        };
        let scores = self.evaluate(term)?;
        Ok(Some((ResultSet::Ranked(scores), vec![self.id.clone()])))
    }
}

impl Enumerable for TextIndex {
    /// Distinct words currently held by this index, in word order.
    fn unique_values(&self) -> Vec<Value> {
        let lexicon = self.lexicon.read();
        let words: BTreeSet<&str> = self
            .postings
            .keys()
            .filter_map(|wid| lexicon.word(*wid))
            .collect();
        words.into_iter().map(Value::from).collect()
    }
}

impl Clearable for TextIndex {
    fn clear(&mut self) {
        self.postings.clear();
        self.unindex.clear();
    }
}
