// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{FutureObserver, Notification, Observer, ObserverRef, Pledge, PledgeError};
use std::sync::Arc;

/// Extension trait reifying the outcome of a pledge.
pub trait MaterializeExt<T> {
    /// A pledge that always succeeds, with the source outcome as a [`Notification`].
    fn materialize(self) -> Pledge<Notification<T>>;
}

impl<T: Send + 'static> MaterializeExt<T> for Pledge<T> {
    fn materialize(self) -> Pledge<Notification<T>> {
        Pledge::create(move |observer: ObserverRef<Notification<T>>| {
            let on_error = Arc::clone(&observer);
            Ok(self.subscribe(Observer::new(
                move |value: T| observer.on_done(Notification::Done(value)),
                move |error: PledgeError| on_error.on_done(Notification::Error(error)),
            )))
        })
    }
}
