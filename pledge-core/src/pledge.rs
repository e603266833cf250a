// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::callback::catch_callback;
use crate::observer::{FutureObserver, Observer, ObserverRef};
use crate::subscription::{CompositeSubscription, Subscription};
use pledge_error::{PledgeError, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The raw subscription contract of a push-based single-value future.
///
/// Implementations are not required to be well behaved. Lift them through
/// [`Pledge::from_source`] to get the delivery guarantees of [`Pledge::create`].
pub trait FutureSource<T>: Send + Sync {
    /// Registers `observer` and returns the handle that cancels the registration.
    fn subscribe(&self, observer: ObserverRef<T>) -> Subscription;
}

impl<T, S> FutureSource<T> for Arc<S>
where
    S: FutureSource<T> + ?Sized,
{
    fn subscribe(&self, observer: ObserverRef<T>) -> Subscription {
        (**self).subscribe(observer)
    }
}

/// A push-based future delivering exactly one value or one error per subscription.
///
/// Pledges are cold unless stated otherwise: every subscription runs the
/// underlying computation again. Cloning shares the subscribe function, never
/// any per-subscription state.
pub struct Pledge<T> {
    source: Arc<dyn FutureSource<T>>,
}

impl<T> Clone for Pledge<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<T> fmt::Debug for Pledge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pledge").finish_non_exhaustive()
    }
}

impl<T: 'static> Pledge<T> {
    /// Builds a pledge from a subscribe function.
    ///
    /// For every subscription the observer handed to `subscribe` is guarded:
    /// it forwards at most one notification, drops anything arriving after
    /// disposal, and disposes the subscription once it has delivered. An `Err`
    /// returned by `subscribe`, or a panic inside it, is delivered as `on_error`;
    /// subscribing itself never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use pledge_core::{FutureObserver, Pledge, Subscription};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let pledge = Pledge::create(|observer| {
    ///     observer.on_done(42);
    ///     Ok(Subscription::empty())
    /// });
    ///
    /// let seen = Arc::new(Mutex::new(None));
    /// let seen_clone = seen.clone();
    /// pledge.subscribe_with(move |v| *seen_clone.lock().unwrap() = Some(v), |_| {});
    ///
    /// assert_eq!(*seen.lock().unwrap(), Some(42));
    /// ```
    pub fn create<F>(subscribe: F) -> Self
    where
        F: Fn(ObserverRef<T>) -> Result<Subscription> + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(Created { subscribe }),
        }
    }

    /// Lifts a raw [`FutureSource`] through the guard of [`Pledge::create`].
    pub fn from_source<S>(source: S) -> Self
    where
        S: FutureSource<T> + 'static,
    {
        Self::create(move |observer| Ok(source.subscribe(observer)))
    }

    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: FutureObserver<T> + 'static,
    {
        self.source.subscribe(Arc::new(observer))
    }

    /// Subscribes with a pair of closures.
    pub fn subscribe_with<D, E>(&self, on_done: D, on_error: E) -> Subscription
    where
        D: Fn(T) + Send + Sync + 'static,
        E: Fn(PledgeError) + Send + Sync + 'static,
    {
        self.subscribe(Observer::new(on_done, on_error))
    }

    /// Subscribes to the value only; errors are ignored.
    pub fn subscribe_done<D>(&self, on_done: D) -> Subscription
    where
        D: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe(Observer::from_done(on_done))
    }
}

impl<T: 'static> FutureSource<T> for Pledge<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> Subscription {
        self.source.subscribe(observer)
    }
}

struct Created<F> {
    subscribe: F,
}

impl<T, F> FutureSource<T> for Created<F>
where
    T: 'static,
    F: Fn(ObserverRef<T>) -> Result<Subscription> + Send + Sync,
{
    fn subscribe(&self, observer: ObserverRef<T>) -> Subscription {
        let subscription = CompositeSubscription::new();
        let guarded = Arc::new(GuardedObserver {
            downstream: observer,
            subscription: subscription.clone(),
            delivered: AtomicBool::new(false),
        });

        let upstream = Arc::clone(&guarded) as ObserverRef<T>;
        match catch_callback(|| (self.subscribe)(upstream)) {
            Ok(inner) => subscription.add(inner),
            Err(error) => guarded.on_error(error),
        }

        subscription.into()
    }
}

struct GuardedObserver<T> {
    downstream: ObserverRef<T>,
    subscription: CompositeSubscription,
    delivered: AtomicBool,
}

/// Releases upstream once delivery returns, even if the downstream observer panics.
struct DisposeOnDrop<'a>(&'a CompositeSubscription);

impl Drop for DisposeOnDrop<'_> {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

impl<T> GuardedObserver<T> {
    fn claim(&self) -> bool {
        !self.subscription.is_disposed() && !self.delivered.swap(true, Ordering::AcqRel)
    }
}

impl<T> FutureObserver<T> for GuardedObserver<T> {
    fn on_done(&self, value: T) {
        if self.claim() {
            let _detach = DisposeOnDrop(&self.subscription);
            self.downstream.on_done(value);
        } else {
            trace!("dropping value delivered after completion or disposal");
        }
    }

    fn on_error(&self, error: PledgeError) {
        if self.claim() {
            let _detach = DisposeOnDrop(&self.subscription);
            self.downstream.on_error(error);
        } else {
            trace!("dropping error delivered after completion or disposal: {}", error);
        }
    }
}
