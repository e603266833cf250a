// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::notification::Notification;
use crate::observer::{FutureObserver, ObserverRef};
use crate::pledge::{FutureSource, Pledge};
use crate::subscription::Subscription;
use parking_lot::Mutex;
use pledge_error::PledgeError;
use std::fmt;
use std::sync::Arc;

struct PromiseState<T> {
    notification: Option<Notification<T>>,
    pending: Vec<(u64, ObserverRef<T>)>,
    next_id: u64,
}

/// A single-assignment cell that broadcasts its outcome to every subscriber.
///
/// A `Promise` is both a source and an observer: subscribe it to a pledge and it
/// captures that pledge's outcome once. Subscribers arriving before completion
/// are queued; later ones get the stored notification replayed synchronously.
/// Only the first completion counts.
///
/// Clones share the same cell.
///
/// # Example
///
/// ```
/// use pledge_core::Promise;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let promise = Promise::new();
/// let seen = Arc::new(AtomicI32::new(0));
/// let seen_clone = seen.clone();
/// promise.pledge().subscribe_done(move |v| seen_clone.store(v, Ordering::SeqCst));
///
/// promise.set_result(5);
/// promise.set_result(6);
///
/// assert_eq!(seen.load(Ordering::SeqCst), 5);
/// ```
pub struct Promise<T> {
    state: Arc<Mutex<PromiseState<T>>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(PromiseState {
                notification: None,
                pending: Vec::new(),
                next_id: 0,
            })),
        }
    }
}

impl<T> Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// A pledge reading from this cell.
    pub fn pledge(&self) -> Pledge<T> {
        Pledge::from_source(self.clone())
    }

    /// Stores `notification` and broadcasts it. Returns `false` if the promise
    /// was already completed, in which case nothing happens.
    pub fn complete(&self, notification: Notification<T>) -> bool {
        let observers = {
            let mut state = self.state.lock();
            if state.notification.is_some() {
                trace!("promise already completed, ignoring second completion");
                return false;
            }
            state.notification = Some(notification.clone());
            std::mem::take(&mut state.pending)
        };

        for (_, observer) in observers {
            notification.clone().deliver(&observer);
        }
        true
    }

    pub fn set_result(&self, value: T) -> bool {
        self.complete(Notification::Done(value))
    }

    pub fn set_error(&self, error: PledgeError) -> bool {
        self.complete(Notification::Error(error))
    }

    pub fn is_completed(&self) -> bool {
        self.state.lock().notification.is_some()
    }

    /// The stored outcome, if any.
    pub fn notification(&self) -> Option<Notification<T>> {
        self.state.lock().notification.clone()
    }

    /// Subscribers waiting for completion.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().pending.len()
    }
}

impl<T> FutureSource<T> for Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscribe(&self, observer: ObserverRef<T>) -> Subscription {
        let replay = {
            let mut state = self.state.lock();
            if let Some(notification) = state.notification.clone() {
                notification
            } else {
                let id = state.next_id;
                state.next_id += 1;
                state.pending.push((id, observer));

                let weak = Arc::downgrade(&self.state);
                return Subscription::from_fn(move || {
                    if let Some(state) = weak.upgrade() {
                        state.lock().pending.retain(|(pending, _)| *pending != id);
                    }
                });
            }
        };

        replay.deliver(&observer);
        Subscription::empty()
    }
}

impl<T> FutureObserver<T> for Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn on_done(&self, value: T) {
        self.set_result(value);
    }

    fn on_error(&self, error: PledgeError) {
        self.set_error(error);
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Promise")
            .field("completed", &state.notification.is_some())
            .field("pending", &state.pending.len())
            .finish()
    }
}
