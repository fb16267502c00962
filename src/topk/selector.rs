//! Fixed-capacity top-K selection.
//!
//! Candidates live in a binary heap whose root is the lowest-ranked
//! retained element, so checking whether a newcomer displaces anyone is
//! O(1) and the replacement is O(log K).

use std::cmp::Ordering;

use super::ranking::Ranking;

/// Keeps the `capacity` highest-ranked items offered to it.
///
/// # Examples
///
/// ```
/// use corp_optim::topk::{BoundedTopK, RankBy};
///
/// let mut top = BoundedTopK::new(3, RankBy(|a: &i32, b: &i32| a.cmp(b)));
/// for x in [5, 1, 9, 3, 7] {
///     top.push(x);
/// }
/// assert_eq!(top.into_sorted_vec(), vec![9, 7, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedTopK<T, R> {
    capacity: usize,
    heap: Vec<T>,
    ranking: R,
}

impl<T, R: Ranking<T>> BoundedTopK<T, R> {
    pub fn new(capacity: usize, ranking: R) -> Self {
        Self {
            capacity,
            heap: Vec::with_capacity(capacity),
            ranking,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    pub fn ranking(&self) -> &R {
        &self.ranking
    }

    /// Lowest-ranked retained item.
    pub fn peek_worst(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Removes and returns the lowest-ranked retained item.
    pub fn pop_worst(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let worst = self.heap.pop();
        self.sift_down(0);
        worst
    }

    /// Inserts `item`, keeping at most `capacity` items.
    ///
    /// Below capacity the item is always kept. At capacity it replaces the
    /// current worst only if it ranks strictly higher. Returns whichever
    /// item was left out, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.heap.len() < self.capacity {
            self.heap.push(item);
            self.sift_up(self.heap.len() - 1);
            return None;
        }
        match self.heap.first() {
            Some(worst) if self.ranking.compare(&item, worst) == Ordering::Greater => {
                let evicted = std::mem::replace(&mut self.heap[0], item);
                self.sift_down(0);
                Some(evicted)
            }
            _ => Some(item),
        }
    }

    /// Whether `item` would be retained by [`push`](Self::push).
    pub fn admits(&self, item: &T) -> bool {
        if self.heap.len() < self.capacity {
            return true;
        }
        match self.heap.first() {
            Some(worst) => self.ranking.compare(item, worst) == Ordering::Greater,
            None => false,
        }
    }

    /// Pushes `item` and reports whether it was retained.
    pub fn offer(&mut self, item: T) -> bool {
        if !self.admits(&item) {
            return false;
        }
        self.push(item);
        true
    }

    /// Consumes the selector, returning items best first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let ranking = self.ranking;
        let mut items = self.heap;
        items.sort_by(|a, b| ranking.compare(b, a));
        items
    }

    /// Items best first, leaving the selector intact.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut items = self.heap.clone();
        items.sort_by(|a, b| self.ranking.compare(b, a));
        items
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.ranking.compare(&self.heap[a], &self.heap[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.less(i, parent) {
                self.heap.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && self.less(left, smallest) {
                smallest = left;
            }
            if right < n && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T, R: Ranking<T>> Extend<T> for BoundedTopK<T, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

/// Merges several best-first lists into one of at most `capacity` items.
///
/// The result is a full re-sort, so it does not depend on the order the
/// lists arrive in.
pub fn merge_sorted<T, R: Ranking<T>>(
    lists: impl IntoIterator<Item = Vec<T>>,
    capacity: usize,
    ranking: &R,
) -> Vec<T> {
    let mut all: Vec<T> = lists.into_iter().flatten().collect();
    all.sort_by(|a, b| ranking.compare(b, a));
    all.truncate(capacity);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topk::RankBy;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn natural() -> RankBy<fn(&i64, &i64) -> Ordering> {
        let cmp: fn(&i64, &i64) -> Ordering = |a, b| a.cmp(b);
        RankBy(cmp)
    }

    #[test]
    fn test_keeps_highest() {
        let mut top = BoundedTopK::new(3, natural());
        top.extend([4, 8, 1, 9, 2, 7]);
        assert_eq!(top.len(), 3);
        assert_eq!(top.peek_worst(), Some(&7));
        assert_eq!(top.into_sorted_vec(), vec![9, 8, 7]);
    }

    #[test]
    fn test_push_reports_left_out_item() {
        let mut top = BoundedTopK::new(2, natural());
        assert_eq!(top.push(5), None);
        assert_eq!(top.push(6), None);
        assert_eq!(top.push(1), Some(1));
        assert_eq!(top.push(9), Some(5));
        // Ties do not displace.
        assert_eq!(top.push(6), Some(6));
    }

    #[test]
    fn test_offer() {
        let mut top = BoundedTopK::new(2, natural());
        assert!(top.offer(3));
        assert!(top.offer(4));
        assert!(!top.offer(2));
        assert!(top.offer(10));
        assert_eq!(top.to_sorted_vec(), vec![10, 4]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut top = BoundedTopK::new(0, natural());
        assert!(!top.offer(1));
        assert!(top.is_empty());
        assert!(top.peek_worst().is_none());
    }

    #[test]
    fn test_pop_worst_in_order() {
        let mut top = BoundedTopK::new(5, natural());
        top.extend([3, 1, 4, 1, 5]);
        let popped: Vec<i64> = std::iter::from_fn(|| top.pop_worst()).collect();
        assert_eq!(popped, vec![1, 1, 3, 4, 5]);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let r = natural();
        let a = vec![9, 5, 1];
        let b = vec![8, 7, 2];
        let ab = merge_sorted([a.clone(), b.clone()], 4, &r);
        let ba = merge_sorted([b, a], 4, &r);
        assert_eq!(ab, vec![9, 8, 7, 5]);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_random_stream_matches_full_sort() {
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<i64> = (0..5_000).map(|_| rng.random_range(-1_000..1_000)).collect();
        let mut top = BoundedTopK::new(20, natural());
        for &v in &values {
            top.push(v);
            assert!(top.len() <= 20);
        }
        let mut sorted = values;
        sorted.sort_by(|a, b| b.cmp(a));
        sorted.truncate(20);
        assert_eq!(top.into_sorted_vec(), sorted);
    }

    proptest! {
        #[test]
        fn prop_matches_full_sort(
            values in proptest::collection::vec(-500i64..500, 0..200),
            k in 0usize..25,
        ) {
            let mut top = BoundedTopK::new(k, natural());
            for &v in &values {
                top.push(v);
                prop_assert!(top.len() <= k);
            }
            let mut sorted = values;
            sorted.sort_by(|a, b| b.cmp(a));
            sorted.truncate(k);
            prop_assert_eq!(top.into_sorted_vec(), sorted);
        }
    }
}
