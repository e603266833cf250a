// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{
    catch_callback, FutureObserver, Notification, Observer, ObserverRef, Pledge, PledgeError,
    Result, SerialSubscription,
};
use std::error::Error;
use std::sync::Arc;

/// Extension trait providing error recovery operators for pledges.
///
/// Recovery applies to errors only; values pass through untouched, and so do
/// errors the recovery does not match. If the handler itself fails, or the
/// recovery pledge fails, that failure becomes the error of the result.
pub trait RecoverExt<T>: Sized {
    /// The primitive every other recovery is built on.
    ///
    /// Errors accepted by `filter` are handed to `handler`, whose pledge then
    /// replaces the failed source.
    fn recover_when<P, F>(self, filter: P, handler: F) -> Pledge<T>
    where
        P: Fn(&PledgeError) -> bool + Send + Sync + 'static,
        F: Fn(PledgeError) -> Result<Pledge<T>> + Send + Sync + 'static;

    /// Replaces the errors accepted by `filter` with the result of `handler`.
    fn recover_if<P, F>(self, filter: P, handler: F) -> Pledge<T>
    where
        P: Fn(&PledgeError) -> bool + Send + Sync + 'static,
        F: Fn(PledgeError) -> Result<T> + Send + Sync + 'static;

    /// Replaces any error with the result of `handler`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pledge_core::{Pledge, PledgeError};
    /// use pledge_ops::RecoverExt;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let seen = Arc::new(AtomicI32::new(0));
    /// let seen_clone = seen.clone();
    ///
    /// Pledge::<i32>::fail(PledgeError::Canceled)
    ///     .recover(|_| Ok(-1))
    ///     .subscribe_done(move |v| seen_clone.store(v, Ordering::SeqCst));
    ///
    /// assert_eq!(seen.load(Ordering::SeqCst), -1);
    /// ```
    fn recover<F>(self, handler: F) -> Pledge<T>
    where
        F: Fn(PledgeError) -> Result<T> + Send + Sync + 'static,
    {
        self.recover_if(|_| true, handler)
    }

    /// Continues with the pledge returned by `handler` on any error.
    fn recover_with<F>(self, handler: F) -> Pledge<T>
    where
        F: Fn(PledgeError) -> Result<Pledge<T>> + Send + Sync + 'static,
    {
        self.recover_when(|_| true, handler)
    }

    /// Continues with `fallback` on any error. `fallback` is subscribed afresh
    /// every time recovery happens.
    fn recover_to(self, fallback: Pledge<T>) -> Pledge<T>
    where
        T: 'static,
    {
        self.recover_when(|_| true, move |_| Ok(fallback.clone()))
    }

    /// Recovers from user errors of type `E` only.
    fn recover_typed<E, F>(self, handler: F) -> Pledge<T>
    where
        E: Error + 'static,
        F: Fn(&E) -> Result<T> + Send + Sync + 'static,
    {
        self.recover_if(PledgeError::is::<E>, move |error| {
            match error.downcast_ref::<E>() {
                Some(typed) => handler(typed),
                None => Err(error),
            }
        })
    }

    /// Continues with the pledge returned by `handler` on user errors of type `E`.
    fn recover_typed_with<E, F>(self, handler: F) -> Pledge<T>
    where
        E: Error + 'static,
        F: Fn(&E) -> Result<Pledge<T>> + Send + Sync + 'static,
    {
        self.recover_when(PledgeError::is::<E>, move |error| {
            match error.downcast_ref::<E>() {
                Some(typed) => handler(typed),
                None => Err(error),
            }
        })
    }

    /// Continues with `fallback` on user errors of type `E`.
    fn recover_typed_to<E>(self, fallback: Pledge<T>) -> Pledge<T>
    where
        E: Error + 'static,
        T: 'static,
    {
        self.recover_when(PledgeError::is::<E>, move |_| Ok(fallback.clone()))
    }
}

/// Runs the user filter; a panicking filter fails the pledge.
fn matches<P>(filter: &P, error: &PledgeError) -> Result<bool>
where
    P: Fn(&PledgeError) -> bool,
{
    catch_callback(|| Ok(filter(error)))
}

impl<T: Send + 'static> RecoverExt<T> for Pledge<T> {
    fn recover_when<P, F>(self, filter: P, handler: F) -> Pledge<T>
    where
        P: Fn(&PledgeError) -> bool + Send + Sync + 'static,
        F: Fn(PledgeError) -> Result<Pledge<T>> + Send + Sync + 'static,
    {
        let filter = Arc::new(filter);
        let handler = Arc::new(handler);
        Pledge::create(move |observer: ObserverRef<T>| {
            let serial = SerialSubscription::new();
            let next_stage = serial.clone();
            let filter = Arc::clone(&filter);
            let handler = Arc::clone(&handler);
            let on_done = Arc::clone(&observer);

            serial.assign_with(|| {
                self.subscribe(Observer::new(
                    move |value: T| on_done.on_done(value),
                    move |error: PledgeError| {
                        let recovery = match matches(&*filter, &error) {
                            Ok(true) => catch_callback(|| handler(error)),
                            Ok(false) => Err(error),
                            Err(panic) => Err(panic),
                        };
                        match recovery {
                            Ok(fallback) => {
                                next_stage.assign_with(|| fallback.subscribe(Arc::clone(&observer)));
                            }
                            Err(error) => observer.on_error(error),
                        }
                    },
                ))
            });

            Ok(serial.into())
        })
    }

    fn recover_if<P, F>(self, filter: P, handler: F) -> Pledge<T>
    where
        P: Fn(&PledgeError) -> bool + Send + Sync + 'static,
        F: Fn(PledgeError) -> Result<T> + Send + Sync + 'static,
    {
        let filter = Arc::new(filter);
        let handler = Arc::new(handler);
        Pledge::create(move |observer: ObserverRef<T>| {
            let filter = Arc::clone(&filter);
            let handler = Arc::clone(&handler);
            let on_done = Arc::clone(&observer);

            Ok(self.subscribe(Observer::new(
                move |value: T| on_done.on_done(value),
                move |error: PledgeError| {
                    let outcome = match matches(&*filter, &error) {
                        Ok(true) => catch_callback(|| handler(error)),
                        Ok(false) => Err(error),
                        Err(panic) => Err(panic),
                    };
                    Notification::from(outcome).deliver(&observer);
                },
            )))
        })
    }
}
