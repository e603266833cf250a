// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combinators lifted to pledge factories.
//!
//! A factory is any `Fn(A) -> Result<Pledge<T>>`, where `A` is the argument
//! tuple (`()` for none, `(x,)` for one, `(x, y)` for two, ...). The lifted
//! function never fails synchronously: a factory or wrapper that returns `Err`
//! or panics produces a failed pledge instead.

use crate::then::ThenExt;
use pledge_core::{catch_callback, Pledge, Result};
use std::sync::Arc;

/// Extension trait for pledge factories.
pub trait FactoryExt<A, T>: Sized {
    /// Lifts [`ThenExt::then`] to the factory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pledge_core::Pledge;
    /// use pledge_ops::FactoryExt;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let length = (|(s,): (String,)| Ok(Pledge::value(s))).then(|s: String| Ok(s.len()));
    ///
    /// let seen = Arc::new(AtomicUsize::new(0));
    /// let seen_clone = seen.clone();
    /// length(("four".to_string(),)).subscribe_done(move |n| seen_clone.store(n, Ordering::SeqCst));
    ///
    /// assert_eq!(seen.load(Ordering::SeqCst), 4);
    /// ```
    fn then<U, C>(self, continuation: C) -> impl Fn(A) -> Pledge<U> + Send + Sync + 'static
    where
        U: Send + 'static,
        C: Fn(T) -> Result<U> + Send + Sync + 'static;

    /// Applies `wrapper` to every pledge the factory produces.
    fn wrap<U, W>(self, wrapper: W) -> impl Fn(A) -> Pledge<U> + Send + Sync + 'static
    where
        U: Send + 'static,
        W: Fn(Pledge<T>) -> Result<Pledge<U>> + Send + Sync + 'static;
}

/// Runs a factory step, turning an error or panic into a failed pledge.
fn produce<T, F>(make: F) -> Pledge<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<Pledge<T>>,
{
    catch_callback(make).unwrap_or_else(Pledge::fail)
}

impl<A, T, F> FactoryExt<A, T> for F
where
    T: Send + 'static,
    F: Fn(A) -> Result<Pledge<T>> + Send + Sync + 'static,
{
    fn then<U, C>(self, continuation: C) -> impl Fn(A) -> Pledge<U> + Send + Sync + 'static
    where
        U: Send + 'static,
        C: Fn(T) -> Result<U> + Send + Sync + 'static,
    {
        let factory = self;
        let continuation = Arc::new(continuation);
        move |args: A| {
            let continuation = Arc::clone(&continuation);
            ThenExt::then(produce(|| factory(args)), move |value: T| continuation(value))
        }
    }

    fn wrap<U, W>(self, wrapper: W) -> impl Fn(A) -> Pledge<U> + Send + Sync + 'static
    where
        U: Send + 'static,
        W: Fn(Pledge<T>) -> Result<Pledge<U>> + Send + Sync + 'static,
    {
        let factory = self;
        move |args: A| produce(|| wrapper(factory(args)?))
    }
}
