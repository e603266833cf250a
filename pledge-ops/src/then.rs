// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{
    catch_callback, FutureObserver, Notification, Observer, ObserverRef, Pledge, PledgeError,
    Result, SerialSubscription,
};
use std::sync::Arc;

/// Extension trait providing continuation operators for pledges.
///
/// Every continuation runs only when the source completes with a value. Source
/// errors skip the continuation and reach the result unchanged. A continuation
/// that returns `Err` or panics fails the resulting pledge.
pub trait ThenExt<T>: Sized {
    /// Transforms the value with a fallible function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pledge_core::Pledge;
    /// use pledge_ops::ThenExt;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(None));
    /// let seen_clone = seen.clone();
    ///
    /// Pledge::value("123".to_string())
    ///     .then(|s| Ok(s.len()))
    ///     .subscribe_done(move |len| *seen_clone.lock().unwrap() = Some(len));
    ///
    /// assert_eq!(*seen.lock().unwrap(), Some(3));
    /// ```
    fn then<U, F>(self, continuation: F) -> Pledge<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<U> + Send + Sync + 'static;

    /// Infallible form of [`ThenExt::then`].
    fn map<U, F>(self, transform: F) -> Pledge<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.then(move |value: T| Ok(transform(value)))
    }

    /// Continues with the pledge returned by `continuation`.
    ///
    /// Once the source delivers, its subscription is released and replaced by a
    /// subscription to the returned pledge, so disposing the result always
    /// releases whichever stage is active.
    fn and_then<U, F>(self, continuation: F) -> Pledge<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<Pledge<U>> + Send + Sync + 'static;

    /// Like [`ThenExt::then`], ignoring the source value.
    fn then_with<U, F>(self, continuation: F) -> Pledge<U>
    where
        U: Send + 'static,
        F: Fn() -> Result<U> + Send + Sync + 'static,
    {
        self.then(move |_| continuation())
    }

    /// Like [`ThenExt::and_then`], ignoring the source value.
    fn and_then_with<U, F>(self, continuation: F) -> Pledge<U>
    where
        U: Send + 'static,
        F: Fn() -> Result<Pledge<U>> + Send + Sync + 'static,
    {
        self.and_then(move |_| continuation())
    }

    /// Runs a side effect with the value and completes with `()`.
    fn then_do<F>(self, action: F) -> Pledge<()>
    where
        F: Fn(T) -> Result<()> + Send + Sync + 'static,
    {
        self.then(action)
    }

    /// Runs a side effect once the source succeeds and completes with `()`.
    fn then_run<F>(self, action: F) -> Pledge<()>
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.then(move |_| action())
    }
}

impl<T: Send + 'static> ThenExt<T> for Pledge<T> {
    fn then<U, F>(self, continuation: F) -> Pledge<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<U> + Send + Sync + 'static,
    {
        let continuation = Arc::new(continuation);
        Pledge::create(move |observer: ObserverRef<U>| {
            let continuation = Arc::clone(&continuation);
            let on_error = Arc::clone(&observer);
            Ok(self.subscribe(Observer::new(
                move |value: T| {
                    Notification::from(catch_callback(|| continuation(value))).deliver(&observer);
                },
                move |error: PledgeError| on_error.on_error(error),
            )))
        })
    }

    fn and_then<U, F>(self, continuation: F) -> Pledge<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<Pledge<U>> + Send + Sync + 'static,
    {
        let continuation = Arc::new(continuation);
        Pledge::create(move |observer: ObserverRef<U>| {
            let serial = SerialSubscription::new();
            let next_stage = serial.clone();
            let continuation = Arc::clone(&continuation);
            let on_error = Arc::clone(&observer);

            serial.assign_with(|| {
                self.subscribe(Observer::new(
                    move |value: T| match catch_callback(|| continuation(value)) {
                        Ok(next) => next_stage.assign_with(|| next.subscribe(Arc::clone(&observer))),
                        Err(error) => observer.on_error(error),
                    },
                    move |error: PledgeError| on_error.on_error(error),
                ))
            });

            Ok(serial.into())
        })
    }
}
