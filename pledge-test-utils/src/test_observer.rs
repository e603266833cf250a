// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use pledge_core::{FutureObserver, Notification};
use pledge_error::PledgeError;
use std::sync::Arc;

/// Observer recording every notification it receives.
///
/// Clones share the same record, so a clone can be handed to `subscribe` while
/// the test keeps the other for assertions.
pub struct TestObserver<T> {
    events: Arc<Mutex<Vec<Notification<T>>>>,
}

impl<T> Clone for TestObserver<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<T> Default for TestObserver<T> {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> TestObserver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification received, in order.
    pub fn events(&self) -> Vec<Notification<T>> {
        self.events.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn last(&self) -> Option<Notification<T>> {
        self.events.lock().last().cloned()
    }

    pub fn values(&self) -> Vec<T> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| event.value().cloned())
            .collect()
    }

    pub fn errors(&self) -> Vec<PledgeError> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| event.error().cloned())
            .collect()
    }
}

impl<T: Send> FutureObserver<T> for TestObserver<T> {
    fn on_done(&self, value: T) {
        self.events.lock().push(Notification::Done(value));
    }

    fn on_error(&self, error: PledgeError) {
        self.events.lock().push(Notification::Error(error));
    }
}
