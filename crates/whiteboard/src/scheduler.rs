//! Cancellable one-shot timers
//!
//! The engine never sleeps. It registers deadlines here and the host drains
//! due timers from its event loop, so a timer is just data: cancelling one
//! removes it before it can fire.

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies a scheduled timer; required to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
    deadline: Duration,
    seq: u64,
}

impl TimerHandle {
    /// Clock reading at which the timer becomes due
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Deadline-ordered queue of pending tasks.
///
/// Timers sharing a deadline fire in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    timers: BTreeMap<TimerHandle, T>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` to fire once the clock reaches `deadline`
    pub fn schedule(&mut self, deadline: Duration, task: T) -> TimerHandle {
        let handle = TimerHandle {
            deadline,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.timers.insert(handle, task);
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(TimerHandle::deadline)
    }

    /// Remove and return the earliest timer if it is due at `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, T)> {
        let (&handle, _) = self.timers.first_key_value()?;
        if handle.deadline > now {
            return None;
        }
        self.timers.remove_entry(&handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(300), "c");
        queue.schedule(ms(100), "a");
        queue.schedule(ms(200), "b");

        assert_eq!(queue.next_deadline(), Some(ms(100)));
        assert!(queue.pop_due(ms(50)).is_none());

        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(250)))
            .map(|(_, task)| task)
            .collect();
        assert_eq!(fired, vec!["a", "b"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_same_deadline_fires_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(100), 1);
        queue.schedule(ms(100), 2);
        assert_eq!(queue.pop_due(ms(100)).map(|(_, t)| t), Some(1));
        assert_eq!(queue.pop_due(ms(100)).map(|(_, t)| t), Some(2));
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(ms(100), ());
        assert!(queue.is_pending(handle));
        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert!(queue.pop_due(ms(1_000)).is_none());
        assert!(queue.is_empty());
    }
}
