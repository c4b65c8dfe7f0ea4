//! Lexicon: word dictionary shared by all full-text indexes of a catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Identifier of a word in the lexicon.
pub type WordId = u32;

/// Handle to a lexicon shared between text indexes.
pub type SharedLexicon = Arc<RwLock<Lexicon>>;

/// Assigns stable ids to words. Words are never removed.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    ids: BTreeMap<String, WordId>,
    words: Vec<String>,
}

impl Lexicon {
    /// Create an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty lexicon behind a shared handle.
    pub fn shared() -> SharedLexicon {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Id of a word, assigning a new one if needed.
    pub fn get_or_insert(&mut self, word: &str) -> WordId {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len() as WordId;
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        id
    }

    /// Id of a known word.
    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.ids.get(word).copied()
    }

    /// The word for an id.
    pub fn word(&self, id: WordId) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    /// Ids of every word matching a pattern.
    pub fn matching(&self, pattern: &regex::Regex) -> Vec<WordId> {
        self.ids
            .iter()
            .filter(|(word, _)| pattern.is_match(word))
            .map(|(_, id)| *id)
            .collect()
    }

    /// Number of known words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
