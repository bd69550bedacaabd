//! Bounded undo/redo history of whole-document snapshots.
//!
//! ```text
//! edit, edit, edit (within the debounce window)
//!   past:   [s0]            <- snapshot taken before the first edit of the burst
//!   future: []
//! undo(1)
//!   past:   []
//!   future: [s3]            <- the document as it was before undoing
//! new edit
//!   future is cleared
//! ```
//!
//! Coalescing is leading-edge: the first mutation of a burst records the state
//! it replaced, later mutations within `debounce` of the previous one join the
//! same entry. Time is passed in explicitly so bursts coalesce the same way
//! every run.

use std::collections::VecDeque;
use std::mem;
use std::time::{Duration, Instant};

use tracing::debug;

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of past snapshots kept; the oldest is evicted first.
    pub limit: usize,
    /// Mutations closer together than this fold into one undo step.
    pub debounce: Duration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    Enabled,
    Paused,
}

#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    future: Vec<T>,
    config: HistoryConfig,
    tracking: Tracking,
    /// End of the currently open burst, if any.
    burst_until: Option<Instant>,
}

impl<T> History<T> {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            config,
            tracking: Tracking::Enabled,
            burst_until: None,
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Stop recording. Edits keep applying to the document.
    pub fn pause(&mut self) {
        self.tracking = Tracking::Paused;
        self.burst_until = None;
    }

    pub fn resume(&mut self) {
        self.tracking = Tracking::Enabled;
        self.burst_until = None;
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.burst_until = None;
    }

    /// Record that the document changed at `now`; `before` is the state the
    /// change replaced. Returns whether a new undo step was opened.
    pub fn record(&mut self, before: T, now: Instant) -> bool {
        if self.tracking == Tracking::Paused {
            return false;
        }

        let joins_burst = self.burst_until.is_some_and(|until| now < until);
        self.burst_until = Some(now + self.config.debounce);
        if joins_burst {
            return false;
        }

        self.future.clear();
        self.past.push_back(before);
        while self.past.len() > self.config.limit {
            self.past.pop_front();
        }
        debug!("History checkpoint, {} undo steps", self.past.len());
        true
    }

    /// Step back up to `steps` snapshots. Returns how many were applied.
    pub fn undo(&mut self, current: &mut T, steps: usize) -> usize {
        self.burst_until = None;
        let mut applied = 0;
        while applied < steps {
            let Some(previous) = self.past.pop_back() else {
                break;
            };
            self.future.push(mem::replace(current, previous));
            applied += 1;
        }
        applied
    }

    /// Mirror of [`History::undo`].
    pub fn redo(&mut self, current: &mut T, steps: usize) -> usize {
        self.burst_until = None;
        let mut applied = 0;
        while applied < steps {
            let Some(next) = self.future.pop() else {
                break;
            };
            self.past.push_back(mem::replace(current, next));
            if self.past.len() > self.config.limit {
                self.past.pop_front();
            }
            applied += 1;
        }
        applied
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn burst_collapses_into_one_step() {
        let start = Instant::now();
        let mut history = History::default();
        let mut doc = 3;

        assert!(history.record(0, at(start, 0)));
        assert!(!history.record(1, at(start, 400)));
        assert!(!history.record(2, at(start, 900)));
        assert_eq!(history.past_len(), 1);

        assert_eq!(history.undo(&mut doc, 1), 1);
        assert_eq!(doc, 0);
    }

    #[test]
    fn window_is_measured_from_last_edit() {
        let start = Instant::now();
        let mut history = History::default();

        history.record(0, at(start, 0));
        history.record(1, at(start, 900));
        history.record(2, at(start, 1800));
        assert_eq!(history.past_len(), 1);

        history.record(3, at(start, 2900));
        assert_eq!(history.past_len(), 2);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let start = Instant::now();
        let mut history = History::default();
        for step in 0..12u64 {
            history.record(step, at(start, step * 2000));
        }
        assert_eq!(history.past_len(), DEFAULT_LIMIT);

        let mut doc = 12;
        assert_eq!(history.undo(&mut doc, 12), DEFAULT_LIMIT);
        assert_eq!(doc, 2);
    }

    #[test]
    fn new_edit_clears_future() {
        let start = Instant::now();
        let mut history = History::default();
        let mut doc = 1;
        history.record(0, at(start, 0));
        history.undo(&mut doc, 1);
        assert!(history.can_redo());

        history.record(0, at(start, 10));
        assert!(!history.can_redo());
    }

    #[test]
    fn redo_restores_undone_state() {
        let start = Instant::now();
        let mut history = History::default();
        let mut doc = 2;
        history.record(0, at(start, 0));
        history.record(1, at(start, 5000));

        history.undo(&mut doc, 2);
        assert_eq!(doc, 0);
        assert_eq!(history.redo(&mut doc, 5), 2);
        assert_eq!(doc, 2);
    }

    #[test]
    fn paused_history_records_nothing() {
        let start = Instant::now();
        let mut history = History::default();
        history.pause();
        assert!(!history.record(0, at(start, 0)));
        history.resume();
        assert!(history.record(1, at(start, 1)));
        assert_eq!(history.past_len(), 1);
    }
}
