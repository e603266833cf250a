// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use pledge_core::Subscription;
use pledge_runtime::{Action, Scheduler};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct VirtualState {
    now: Duration,
    sequence: u64,
    queue: BTreeMap<(Duration, u64), Action>,
}

/// Scheduler driven by a virtual clock.
///
/// Nothing runs until the test advances the clock. Work scheduled "as soon as
/// possible" is due at the current virtual time and runs on the next advance,
/// including `advance_by(Duration::ZERO)`. Actions due at the same instant run
/// in scheduling order. Actions run without the internal lock held, so they may
/// schedule or cancel further work.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    state: Arc<Mutex<VirtualState>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from creation.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Actions waiting to run.
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn advance_by(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_to(target);
    }

    /// Runs every action due at or before `target`, then sets the clock to
    /// `target`. Moving backwards is a no-op for the clock.
    pub fn advance_to(&self, target: Duration) {
        while let Some(action) = self.next_due(Some(target)) {
            action();
        }
        let mut state = self.state.lock();
        if state.now < target {
            state.now = target;
        }
    }

    /// Runs until nothing is scheduled, moving the clock along.
    pub fn start(&self) {
        while let Some(action) = self.next_due(None) {
            action();
        }
    }

    fn next_due(&self, until: Option<Duration>) -> Option<Action> {
        let mut state = self.state.lock();
        let (&(due, sequence), _) = state.queue.iter().next()?;
        if until.is_some_and(|target| due > target) {
            return None;
        }
        if state.now < due {
            state.now = due;
        }
        state.queue.remove(&(due, sequence))
    }

    fn schedule_at(&self, due: Duration, action: Action) -> Subscription {
        let key = {
            let mut state = self.state.lock();
            state.sequence += 1;
            let key = (due, state.sequence);
            state.queue.insert(key, action);
            key
        };

        let weak = Arc::downgrade(&self.state);
        Subscription::from_fn(move || {
            if let Some(state) = weak.upgrade() {
                state.lock().queue.remove(&key);
            }
        })
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&self, action: Action) -> Subscription {
        let now = self.now();
        self.schedule_at(now, action)
    }

    fn schedule_after(&self, delay: Duration, action: Action) -> Subscription {
        let due = self.now() + delay;
        self.schedule_at(due, action)
    }
}
