// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use pledge_core::{FutureSource, ObserverRef, Pledge, Subscription};
use pledge_error::PledgeError;
use std::sync::Arc;

struct TestFutureState<T> {
    observers: Vec<(u64, ObserverRef<T>)>,
    next_id: u64,
    subscriptions: usize,
}

/// A source completed by hand.
///
/// Live observers are tracked so tests can check that disposal really
/// unsubscribed from upstream. Completing broadcasts to the observers alive at
/// that moment and leaves the source reusable.
pub struct TestFuture<T> {
    state: Arc<Mutex<TestFutureState<T>>>,
}

impl<T> Clone for TestFuture<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for TestFuture<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(TestFutureState {
                observers: Vec::new(),
                next_id: 0,
                subscriptions: 0,
            })),
        }
    }
}

impl<T: Clone + Send + 'static> TestFuture<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pledge(&self) -> Pledge<T> {
        Pledge::from_source(self.clone())
    }

    /// Observers currently subscribed.
    pub fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }

    /// Subscriptions made since creation, disposed or not.
    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscriptions
    }

    pub fn set_result(&self, value: T) {
        for observer in self.snapshot() {
            observer.on_done(value.clone());
        }
    }

    pub fn set_error(&self, error: PledgeError) {
        for observer in self.snapshot() {
            observer.on_error(error.clone());
        }
    }

    fn snapshot(&self) -> Vec<ObserverRef<T>> {
        self.state
            .lock()
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

impl<T: Send + 'static> FutureSource<T> for TestFuture<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> Subscription {
        let id = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.subscriptions += 1;
            state.observers.push((id, observer));
            id
        };

        let state = Arc::clone(&self.state);
        Subscription::from_fn(move || {
            state.lock().observers.retain(|(observer_id, _)| *observer_id != id);
        })
    }
}
