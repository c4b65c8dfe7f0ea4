//! Search machinery: query terms and the evaluator that turns them into lazy result views.

pub mod evaluator;
pub mod lazy;
pub mod query;
pub mod result_set;
pub mod view;

pub use evaluator::{normalize, rank, Emission, Evaluation, QueryEngine};
pub use lazy::{BoxedSequence, LazyCat, LazyFilter, LazyIter, LazyMap, LazySequence};
pub use query::{Query, QueryTerm, SortOrder};
pub use result_set::ResultSet;
pub use view::{
    Hit, RecordView, SearchResults, ViewDescriptor, NORMALIZED_SCORE_KEY, RID_KEY, SCORE_KEY,
};
