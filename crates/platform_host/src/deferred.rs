//! Virtual-time deferred-task queue.
//!
//! Delayed behavior (the opponent "thinking" pause, staged announcements) is
//! expressed as tasks scheduled against a millisecond clock the host drives.
//! Hosts advance the clock from their real timer; tests advance it directly.

use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    due_ms: u64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; invert so the earliest deadline pops
        // first, with the schedule sequence breaking ties.
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered queue of tasks due at virtual-clock deadlines.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    now_ms: u64,
    next_seq: u64,
    entries: BinaryHeap<Entry<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            entries: BinaryHeap::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    /// Current virtual-clock reading in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of tasks not yet due.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedules a task to become due `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, task: T) {
        let entry = Entry {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.entries.push(entry);
    }

    /// Advances the clock and drains every task that became due, in deadline
    /// order with FIFO tie-breaking.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<T> {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let mut due = Vec::new();
        while let Some(entry) = self.entries.peek() {
            if entry.due_ms > self.now_ms {
                break;
            }
            // peek() above guarantees the pop.
            if let Some(entry) = self.entries.pop() {
                due.push(entry.task);
            }
        }
        due
    }
}
