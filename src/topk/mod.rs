//! Bounded top-K selection.
//!
//! - [`BoundedTopK`]: fixed-capacity heap keyed by an injected [`Ranking`]
//! - [`SortStrategy`]: the enumerated rankings used for staffing searches
//! - [`merge_sorted`]: order-independent merge of partial results

mod ranking;
mod selector;

pub use ranking::{RankBy, Ranking, SortStrategy};
pub use selector::{merge_sorted, BoundedTopK};
