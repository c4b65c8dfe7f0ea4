//! Lazy, restartable sequences.
//!
//! Elements are computed only when accessed. Random access never evaluates
//! the elements it skips over (filters evaluate just enough of their input
//! to find the requested position), so paging deep into a large result is
//! cheap. Sequences can be iterated any number of times.

use std::cell::{Cell, RefCell};

/// A lazily evaluated, indexable sequence.
pub trait LazySequence {
    type Item;

    /// The element at `index`, computed on demand.
    fn get(&self, index: usize) -> Option<Self::Item>;

    /// Number of elements, counting at most `limit`. Never evaluates more
    /// of the sequence than needed to reach `limit`.
    fn bounded_len(&self, limit: usize) -> usize;

    /// Total number of elements. Forces filters to scan their whole input.
    fn len(&self) -> usize {
        self.bounded_len(usize::MAX)
    }

    /// Whether the sequence has no elements.
    fn is_empty(&self) -> bool {
        self.bounded_len(1) == 0
    }

    /// Up to `count` elements starting at `start`.
    fn slice(&self, start: usize, count: usize) -> Vec<Self::Item> {
        let mut out = Vec::new();
        for i in start..start.saturating_add(count) {
            match self.get(i) {
                Some(item) => out.push(item),
                None => break,
            }
        }
        out
    }

    /// One page of `batch_size` elements (pages start at 0).
    fn page(&self, page: usize, batch_size: usize) -> Vec<Self::Item> {
        self.slice(page.saturating_mul(batch_size), batch_size)
    }

    /// Iterate from the start.
    fn iter(&self) -> LazyIter<'_, Self>
    where
        Self: Sized,
    {
        LazyIter {
            seq: self,
            position: 0,
        }
    }
}

/// Forward iterator over a lazy sequence.
pub struct LazyIter<'s, S: LazySequence> {
    seq: &'s S,
    position: usize,
}

impl<S: LazySequence> Iterator for LazyIter<'_, S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.seq.get(self.position)?;
        self.position += 1;
        Some(item)
    }
}

/// A boxed sequence usable as a segment of a [`LazyCat`].
pub type BoxedSequence<'a, T> = Box<dyn LazySequence<Item = T> + 'a>;

impl<T> LazySequence for Box<dyn LazySequence<Item = T> + '_> {
    type Item = T;

    fn get(&self, index: usize) -> Option<T> {
        (**self).get(index)
    }

    fn bounded_len(&self, limit: usize) -> usize {
        (**self).bounded_len(limit)
    }
}

/// Applies a function to each source element when it is accessed.
pub struct LazyMap<'a, S, T> {
    source: Vec<S>,
    func: Box<dyn Fn(&S) -> T + 'a>,
}

impl<'a, S, T> LazyMap<'a, S, T> {
    /// Map `func` over `source`.
    pub fn new(source: Vec<S>, func: impl Fn(&S) -> T + 'a) -> Self {
        Self {
            source,
            func: Box::new(func),
        }
    }

    /// The unmapped source elements.
    pub fn source(&self) -> &[S] {
        &self.source
    }
}

impl<S, T> LazySequence for LazyMap<'_, S, T> {
    type Item = T;

    fn get(&self, index: usize) -> Option<T> {
        self.source.get(index).map(|s| (self.func)(s))
    }

    fn bounded_len(&self, limit: usize) -> usize {
        self.source.len().min(limit)
    }
}

/// Keeps the elements of an inner sequence that satisfy a predicate.
///
/// Positions of accepted elements are remembered, so repeated access does
/// not rescan. The inner sequence is only scanned as far as a request needs.
pub struct LazyFilter<'a, Q: LazySequence> {
    inner: Q,
    predicate: Box<dyn Fn(&Q::Item) -> bool + 'a>,
    accepted: RefCell<Vec<usize>>,
    scanned: Cell<usize>,
    exhausted: Cell<bool>,
}

impl<'a, Q: LazySequence> LazyFilter<'a, Q> {
    /// Filter `inner` by `predicate`.
    pub fn new(inner: Q, predicate: impl Fn(&Q::Item) -> bool + 'a) -> Self {
        Self {
            inner,
            predicate: Box::new(predicate),
            accepted: RefCell::new(Vec::new()),
            scanned: Cell::new(0),
            exhausted: Cell::new(false),
        }
    }

    /// How many inner elements have been evaluated so far.
    pub fn scanned(&self) -> usize {
        self.scanned.get()
    }

    /// Scan until `wanted` elements are accepted or the input runs out.
    fn fill(&self, wanted: usize) {
        let mut accepted = self.accepted.borrow_mut();
        while accepted.len() < wanted && !self.exhausted.get() {
            let position = self.scanned.get();
            match self.inner.get(position) {
                Some(item) => {
                    if (self.predicate)(&item) {
                        accepted.push(position);
                    }
                    self.scanned.set(position + 1);
                }
                None => self.exhausted.set(true),
            }
        }
    }
}

impl<Q: LazySequence> LazySequence for LazyFilter<'_, Q> {
    type Item = Q::Item;

    fn get(&self, index: usize) -> Option<Q::Item> {
        self.fill(index.saturating_add(1));
        let position = self.accepted.borrow().get(index).copied()?;
        self.inner.get(position)
    }

    fn bounded_len(&self, limit: usize) -> usize {
        self.fill(limit);
        self.accepted.borrow().len().min(limit)
    }
}

/// Concatenation of sequences, preserving order, without materializing them.
pub struct LazyCat<'a, T> {
    segments: Vec<BoxedSequence<'a, T>>,
}

impl<'a, T> LazyCat<'a, T> {
    /// Concatenate `segments` in order.
    pub fn new(segments: Vec<BoxedSequence<'a, T>>) -> Self {
        Self { segments }
    }

    /// An empty sequence.
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append a segment.
    pub fn push(&mut self, segment: BoxedSequence<'a, T>) {
        self.segments.push(segment);
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl<T> LazySequence for LazyCat<'_, T> {
    type Item = T;

    fn get(&self, index: usize) -> Option<T> {
        let mut remaining = index;
        for segment in &self.segments {
            let n = segment.bounded_len(remaining.saturating_add(1));
            if n > remaining {
                return segment.get(remaining);
            }
            remaining -= n;
        }
        None
    }

    fn bounded_len(&self, limit: usize) -> usize {
        let mut total = 0usize;
        for segment in &self.segments {
            if total >= limit {
                break;
            }
            total += segment.bounded_len(limit - total);
        }
        total
    }
}
