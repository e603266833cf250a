// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Leaf pledges: constants, failures and deferred computations.

use crate::callback::catch_callback;
use crate::pledge::Pledge;
use crate::subscription::Subscription;
use parking_lot::Mutex;
use pledge_error::{PledgeError, Result};
use std::sync::OnceLock;

impl<T> Pledge<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A pledge that completes synchronously with a clone of `value`.
    pub fn value(value: T) -> Self {
        Self::create(move |observer| {
            observer.on_done(value.clone());
            Ok(Subscription::empty())
        })
    }

    /// Runs `compute` once, on the first subscription, and replays its outcome
    /// (value or error) to every subscriber.
    ///
    /// ```
    /// use pledge_core::Pledge;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let runs = Arc::new(AtomicUsize::new(0));
    /// let runs_clone = runs.clone();
    /// let lazy = Pledge::from_lazy(move || Ok(runs_clone.fetch_add(1, Ordering::SeqCst)));
    ///
    /// lazy.subscribe_done(|_| {});
    /// lazy.subscribe_done(|_| {});
    ///
    /// assert_eq!(runs.load(Ordering::SeqCst), 1);
    /// ```
    pub fn from_lazy<F>(compute: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let cell: OnceLock<Result<T>> = OnceLock::new();
        let compute = Mutex::new(Some(compute));
        Self::create(move |observer| {
            let outcome = cell.get_or_init(|| match compute.lock().take() {
                Some(compute) => catch_callback(compute),
                None => Err(PledgeError::Abandoned),
            });
            match outcome {
                Ok(value) => observer.on_done(value.clone()),
                Err(error) => observer.on_error(error.clone()),
            }
            Ok(Subscription::empty())
        })
    }
}

impl<T: Send + 'static> Pledge<T> {
    /// A pledge that fails synchronously with `error`.
    pub fn fail(error: PledgeError) -> Self {
        Self::create(move |_| Err(error.clone()))
    }

    /// A pledge that never notifies.
    ///
    /// The observer is held until disposal, so bridges waiting on it stay pending.
    pub fn never() -> Self {
        Self::create(|observer| Ok(Subscription::from_fn(move || drop(observer))))
    }

    /// Runs `compute` again for every subscription.
    pub fn from_fn<F>(compute: F) -> Self
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Self::create(move |observer| {
            observer.on_done(compute()?);
            Ok(Subscription::empty())
        })
    }

    /// Completes with the `Ok` value or fails with the `Err` of `result`.
    pub fn from_result(result: Result<T>) -> Self
    where
        T: Clone + Sync,
    {
        match result {
            Ok(value) => Self::value(value),
            Err(error) => Self::fail(error),
        }
    }
}

impl Pledge<()> {
    /// Runs `action` for every subscription and completes with `()`.
    pub fn from_action<F>(action: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        Self::from_fn(action)
    }
}
