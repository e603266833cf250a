// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use pledge_core::{FutureObserver, Observer, ObserverRef, Pledge, PledgeError, SerialSubscription};
use pledge_runtime::Scheduler;
use std::collections::VecDeque;
use std::iter;
use std::sync::Arc;
use std::time::Duration;

/// Extension trait providing the `retry` family of operators.
///
/// A failed attempt is retried by subscribing to the source again after the
/// next delay of the sequence has elapsed on the scheduler. When the delays
/// run out, the result fails with the error of the *first* attempt.
pub trait RetryExt<T>: Sized {
    /// Retries once per element of `delays`, waiting that long before each retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pledge_core::{Pledge, PledgeError};
    /// use pledge_ops::RetryExt;
    /// use pledge_test_utils::{record, VirtualScheduler};
    /// use std::time::Duration;
    ///
    /// let scheduler = VirtualScheduler::new();
    /// let retried = Pledge::<i32>::fail(PledgeError::Canceled)
    ///     .retry([Duration::from_millis(1), Duration::from_millis(2)], scheduler.clone());
    ///
    /// let observer = record(&retried);
    /// scheduler.advance_by(Duration::from_millis(3));
    ///
    /// assert_eq!(observer.errors(), vec![PledgeError::Canceled]);
    /// ```
    fn retry<I, S>(self, delays: I, scheduler: S) -> Pledge<T>
    where
        I: IntoIterator<Item = Duration>,
        S: Scheduler;

    /// Retries up to `count` times, waiting `delay` before each retry.
    fn retry_n_with_delay<S>(self, delay: Duration, count: usize, scheduler: S) -> Pledge<T>
    where
        S: Scheduler,
    {
        self.retry(iter::repeat(delay).take(count), scheduler)
    }

    /// Retries once after `delay`.
    fn retry_with_delay<S>(self, delay: Duration, scheduler: S) -> Pledge<T>
    where
        S: Scheduler,
    {
        self.retry([delay], scheduler)
    }

    /// Retries up to `count` times without delay.
    fn retry_n<S>(self, count: usize, scheduler: S) -> Pledge<T>
    where
        S: Scheduler,
    {
        self.retry_n_with_delay(Duration::ZERO, count, scheduler)
    }

    /// Retries once without delay.
    fn retry_once<S>(self, scheduler: S) -> Pledge<T>
    where
        S: Scheduler,
    {
        self.retry_n(1, scheduler)
    }
}

impl<T: Send + 'static> RetryExt<T> for Pledge<T> {
    fn retry<I, S>(self, delays: I, scheduler: S) -> Pledge<T>
    where
        I: IntoIterator<Item = Duration>,
        S: Scheduler,
    {
        let delays: Arc<[Duration]> = delays.into_iter().collect();
        let scheduler = Arc::new(scheduler);
        Pledge::create(move |observer: ObserverRef<T>| {
            let attempts = Arc::new(Attempts {
                source: self.clone(),
                scheduler: Arc::clone(&scheduler),
                delays: Mutex::new(delays.iter().copied().collect()),
                stage: SerialSubscription::new(),
                observer,
            });
            attempts.run(None);
            Ok(attempts.stage.clone().into())
        })
    }
}

/// State of one retrying subscription.
struct Attempts<T, S> {
    source: Pledge<T>,
    scheduler: Arc<S>,
    delays: Mutex<VecDeque<Duration>>,
    stage: SerialSubscription,
    observer: ObserverRef<T>,
}

impl<T, S> Attempts<T, S>
where
    T: Send + 'static,
    S: Scheduler,
{
    fn run(self: &Arc<Self>, first_error: Option<PledgeError>) {
        let on_done = Arc::clone(&self.observer);
        let attempts = Arc::clone(self);
        self.stage.assign_with(|| {
            self.source.subscribe(Observer::new(
                move |value: T| on_done.on_done(value),
                move |error: PledgeError| {
                    attempts.failed(first_error.clone().unwrap_or(error));
                },
            ))
        });
    }

    fn failed(self: &Arc<Self>, first_error: PledgeError) {
        let delay = self.delays.lock().pop_front();
        match delay {
            None => {
                debug!("retries exhausted, failing with first error: {}", first_error);
                self.observer.on_error(first_error);
            }
            Some(delay) => {
                debug!("attempt failed, retrying in {:?}", delay);
                let attempts = Arc::clone(self);
                self.stage.assign_with(|| {
                    self.scheduler.schedule_after(
                        delay,
                        Box::new(move || attempts.run(Some(first_error))),
                    )
                });
            }
        }
    }
}
