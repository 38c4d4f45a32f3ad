pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_INTERVAL_HISTORY_CAPACITY: usize = 50;

/// Fixed-capacity ring buffer. Pushing onto a full history overwrites the oldest entry.
#[derive(Debug, Clone)]
pub struct RollingHistory<T> {
    entries: Vec<T>,
    // index of the oldest entry once the buffer is full
    head: usize,
    capacity: usize,
}

impl<T> RollingHistory<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: T) {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
        } else {
            self.entries[self.head] = entry;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.entries.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// The most recent `n` entries (or fewer if the history is shorter), oldest first.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.entries.len().saturating_sub(n);
        self.iter().skip(skip)
    }

    pub fn last(&self) -> Option<&T> {
        if self.entries.is_empty() {
            None
        } else if self.head == 0 {
            self.entries.last()
        } else {
            self.entries.get(self.head - 1)
        }
    }
}

impl<T> Default for RollingHistory<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn never_exceeds_capacity() {
        let mut history = RollingHistory::with_capacity(3);
        for i in 0..10 {
            history.push(i);
            assert!(history.len() <= 3);
        }
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
        assert_eq!(history.last(), Some(&9));
    }

    #[test]
    fn latest_keeps_insertion_order() {
        let mut history = RollingHistory::with_capacity(5);
        for i in 0..7 {
            history.push(i);
        }
        assert_eq!(history.latest(3).copied().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(history.latest(10).count(), 5);
    }

    #[test]
    fn zero_capacity_is_promoted() {
        let mut history = RollingHistory::with_capacity(0);
        history.push("a");
        history.push("b");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn partially_filled_history() {
        let mut history = RollingHistory::<u32>::default();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
        history.push(1);
        history.push(2);
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(history.last(), Some(&2));
    }
}
