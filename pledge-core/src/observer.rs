// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_error::PledgeError;
use std::fmt;
use std::sync::Arc;

/// Receiver of the terminal notification of a pledge.
///
/// A well-behaved source calls at most one of the two methods, at most once,
/// and never after the subscription that registered the observer was disposed.
pub trait FutureObserver<T>: Send + Sync {
    /// The pledge completed with a value.
    fn on_done(&self, value: T);

    /// The pledge failed.
    fn on_error(&self, error: PledgeError);
}

/// Shared, type-erased observer handle passed to subscribe functions.
pub type ObserverRef<T> = Arc<dyn FutureObserver<T>>;

impl<T, O> FutureObserver<T> for Arc<O>
where
    O: FutureObserver<T> + ?Sized,
{
    fn on_done(&self, value: T) {
        (**self).on_done(value);
    }

    fn on_error(&self, error: PledgeError) {
        (**self).on_error(error);
    }
}

/// Observer assembled from two closures.
///
/// # Example
///
/// ```
/// use pledge_core::{FutureObserver, Observer};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let seen_clone = seen.clone();
/// let observer = Observer::new(
///     move |value: usize| seen_clone.store(value, Ordering::SeqCst),
///     |_| {},
/// );
///
/// observer.on_done(7);
/// assert_eq!(seen.load(Ordering::SeqCst), 7);
/// ```
pub struct Observer<D, E> {
    on_done: D,
    on_error: E,
}

impl<D, E> Observer<D, E> {
    pub fn new(on_done: D, on_error: E) -> Self {
        Self { on_done, on_error }
    }
}

impl<D> Observer<D, fn(PledgeError)> {
    /// Observer that only reacts to values. Errors are dropped.
    pub fn from_done(on_done: D) -> Self {
        Self {
            on_done,
            on_error: |_| {},
        }
    }
}

impl<T, D, E> FutureObserver<T> for Observer<D, E>
where
    D: Fn(T) + Send + Sync,
    E: Fn(PledgeError) + Send + Sync,
{
    fn on_done(&self, value: T) {
        (self.on_done)(value);
    }

    fn on_error(&self, error: PledgeError) {
        (self.on_error)(error);
    }
}

impl<D, E> fmt::Debug for Observer<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").finish_non_exhaustive()
    }
}
