use std::collections::VecDeque;

use crate::db_types::Fundable;

/// An oldest-first cursor over the open records of one kind.
///
/// A pool is a consistent snapshot taken at the start of a settlement pass. Entries must be
/// supplied in ascending id order (the order `fetch_open_pool` queries return them in) and the
/// cursor only ever hands records out from the front, so consumption order always matches
/// creation order.
#[derive(Debug)]
pub struct OpenPool<F> {
    records: VecDeque<F>,
}

impl<F: Fundable> OpenPool<F> {
    /// Wraps an oldest-first sequence of open records.
    pub fn new(records: Vec<F>) -> Self {
        debug_assert!(
            records.windows(2).all(|w| w[0].record_id() < w[1].record_id()),
            "an open pool must be sorted by ascending id"
        );
        Self { records: VecDeque::from(records) }
    }

    /// Removes and returns the oldest record still in the pool.
    pub fn draw(&mut self) -> Option<F> {
        self.records.pop_front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
