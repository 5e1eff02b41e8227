//! One-shot timer queue.
//!
//! Timers fire in due-time order; ties fire in the order they were
//! scheduled. Cancelling only marks a timer dead, so the liveness check
//! happens when it is popped. A timer that was already queued when it got
//! cancelled therefore never fires.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<T> {
    due_ms: u64,
    id: TimerId,
    payload: T,
}

impl<T: Eq> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.id).cmp(&(other.due_ms, other.id))
    }
}

impl<T: Eq> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    live: HashSet<TimerId>,
    next_id: u64,
}

impl<T: Eq> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, due_ms: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        self.heap.push(Reverse(Entry {
            due_ms,
            id,
            payload,
        }));
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id)
    }

    /// Pop the next live timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, TimerId, T)> {
        loop {
            let due = match self.heap.peek() {
                Some(Reverse(entry)) => entry.due_ms,
                None => return None,
            };
            if due > now_ms {
                self.discard_dead_head();
                return None;
            }
            let Reverse(entry) = self.heap.pop()?;
            if self.live.remove(&entry.id) {
                return Some((entry.due_ms, entry.id, entry.payload));
            }
        }
    }

    /// Due time of the earliest live timer.
    pub fn next_due(&mut self) -> Option<u64> {
        self.discard_dead_head();
        self.heap.peek().map(|Reverse(entry)| entry.due_ms)
    }

    pub fn pending(&self) -> usize {
        self.live.len()
    }

    fn discard_dead_head(&mut self) {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if self.live.contains(&entry.id) {
                break;
            }
            self.heap.pop();
        }
    }
}
