// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pledges backed by tokio tasks.
//!
//! Every constructor needs a tokio runtime. Outside of one, the pledge fails
//! with the runtime lookup error instead of panicking.

use futures::FutureExt;
use pledge_core::{
    CancellationToken, Notification, ObserverRef, Pledge, PledgeError, Promise, Result,
    Subscription,
};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

/// Maps the three ways a task can end onto a notification.
fn joined<T>(outcome: std::result::Result<Result<T>, JoinError>) -> Notification<T> {
    match outcome {
        Ok(result) => Notification::from(result),
        Err(error) if error.is_cancelled() => {
            debug!("task was cancelled");
            Notification::Error(PledgeError::Canceled)
        }
        Err(error) => match error.try_into_panic() {
            Ok(payload) => {
                debug!("task panicked");
                Notification::Error(PledgeError::from_panic(payload))
            }
            Err(error) => Notification::Error(PledgeError::user_error(error)),
        },
    }
}

/// Runs `future` to completion and hands its outcome to `observer`.
async fn settle<T, Fut>(future: Fut, observer: ObserverRef<T>)
where
    Fut: Future<Output = Result<T>>,
{
    let outcome = AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(PledgeError::from_panic(payload)));
    Notification::from(outcome).deliver(&observer);
}

/// A hot pledge completing with the outcome of `handle`.
///
/// The task keeps running whether or not anyone subscribes; its outcome is
/// cached and replayed to late subscribers. An aborted task fails with
/// [`PledgeError::Canceled`], a panicked one with [`PledgeError::CallbackPanic`].
pub fn from_task<T>(handle: JoinHandle<Result<T>>) -> Pledge<T>
where
    T: Clone + Send + Sync + 'static,
{
    let runtime = match Handle::try_current() {
        Ok(runtime) => runtime,
        Err(error) => return Pledge::fail(PledgeError::user_error(error)),
    };

    let promise = Promise::new();
    let completion = promise.clone();
    runtime.spawn(async move {
        completion.complete(joined(handle.await));
    });
    promise.pledge()
}

/// Spawns `future` on the current runtime and wraps it with [`from_task`].
///
/// # Example
///
/// ```rust
/// use pledge_interop::{spawn, TaskExt};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let answer = spawn(async { Ok(42) });
/// assert_eq!(answer.to_task().await.ok(), Some(42));
/// # }
/// ```
pub fn spawn<T, Fut>(future: Fut) -> Pledge<T>
where
    T: Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    match Handle::try_current() {
        Ok(runtime) => from_task(runtime.spawn(future)),
        Err(error) => Pledge::fail(PledgeError::user_error(error)),
    }
}

/// A cold pledge spawning a task built by `factory` for every subscription.
///
/// Disposing the subscription aborts the task.
pub fn from_async_fn<T, F, Fut>(factory: F) -> Pledge<T>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Pledge::create(move |observer: ObserverRef<T>| {
        let runtime = Handle::try_current().map_err(PledgeError::user_error)?;
        let task = runtime.spawn(settle(factory(), observer));
        Ok(Subscription::from_fn(move || task.abort()))
    })
}

/// Like [`from_async_fn`], but the task is handed a [`CancellationToken`] that
/// is cancelled on disposal instead of being aborted.
pub fn from_cancellable_async_fn<T, F, Fut>(factory: F) -> Pledge<T>
where
    T: Send + 'static,
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Pledge::create(move |observer: ObserverRef<T>| {
        let runtime = Handle::try_current().map_err(PledgeError::user_error)?;
        let token = CancellationToken::new();
        runtime.spawn(settle(factory(token.clone()), observer));
        Ok(Subscription::from_fn(move || token.cancel()))
    })
}
