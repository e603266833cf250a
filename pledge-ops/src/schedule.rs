// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{CompositeSubscription, FutureObserver, ObserverRef, Pledge, PledgeError};
use pledge_runtime::Scheduler;
use std::sync::Arc;

/// Extension trait moving subscription or delivery onto a scheduler.
pub trait ScheduleExt<T>: Sized {
    /// Subscribes to the source from an action run by `scheduler`.
    ///
    /// Disposing before the action runs means the source is never subscribed.
    fn subscribe_on<S>(self, scheduler: S) -> Pledge<T>
    where
        S: Scheduler;

    /// Delivers the notification from an action run by `scheduler`.
    ///
    /// The source is subscribed immediately. A delivery still waiting on the
    /// scheduler is cancelled by disposal.
    fn observe_on<S>(self, scheduler: S) -> Pledge<T>
    where
        S: Scheduler;
}

impl<T: Send + 'static> ScheduleExt<T> for Pledge<T> {
    fn subscribe_on<S>(self, scheduler: S) -> Pledge<T>
    where
        S: Scheduler,
    {
        let scheduler = Arc::new(scheduler);
        Pledge::create(move |observer: ObserverRef<T>| {
            let subscriptions = CompositeSubscription::new();
            let group = subscriptions.clone();
            let source = self.clone();
            subscriptions.add(scheduler.schedule(Box::new(move || {
                if !group.is_disposed() {
                    group.add(source.subscribe(observer));
                }
            })));
            Ok(subscriptions.into())
        })
    }

    fn observe_on<S>(self, scheduler: S) -> Pledge<T>
    where
        S: Scheduler,
    {
        let scheduler = Arc::new(scheduler);
        Pledge::create(move |observer: ObserverRef<T>| {
            let subscriptions = CompositeSubscription::new();
            subscriptions.add(self.subscribe(Delivery {
                pending: subscriptions.clone(),
                scheduler: Arc::clone(&scheduler),
                observer,
            }));
            Ok(subscriptions.into())
        })
    }
}

/// Forwards each notification through the scheduler.
struct Delivery<T, S> {
    pending: CompositeSubscription,
    scheduler: Arc<S>,
    observer: ObserverRef<T>,
}

impl<T, S> FutureObserver<T> for Delivery<T, S>
where
    T: Send + 'static,
    S: Scheduler,
{
    fn on_done(&self, value: T) {
        let observer = Arc::clone(&self.observer);
        self.pending
            .add(self.scheduler.schedule(Box::new(move || observer.on_done(value))));
    }

    fn on_error(&self, error: PledgeError) {
        let observer = Arc::clone(&self.observer);
        self.pending
            .add(self.scheduler.schedule(Box::new(move || observer.on_error(error))));
    }
}
