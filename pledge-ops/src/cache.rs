// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use pledge_core::{FutureSource, ObserverRef, Pledge, Promise};

/// Extension trait sharing one execution of a pledge between subscribers.
pub trait CacheExt<T> {
    /// Subscribes to the source once, on the first subscription, and replays
    /// its outcome to every subscriber.
    ///
    /// Disposing a subscription to the cached pledge only detaches that
    /// subscriber; the shared upstream subscription keeps running.
    fn cache(self) -> Pledge<T>;

    /// Like [`CacheExt::cache`], but subscribes to the source right away.
    fn prefetch(self) -> Pledge<T>;
}

impl<T> CacheExt<T> for Pledge<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn cache(self) -> Pledge<T> {
        let shared: Mutex<Option<Promise<T>>> = Mutex::new(None);
        Pledge::create(move |observer: ObserverRef<T>| {
            let (promise, first) = {
                let mut shared = shared.lock();
                match shared.as_ref() {
                    Some(promise) => (promise.clone(), false),
                    None => {
                        let promise = Promise::new();
                        *shared = Some(promise.clone());
                        (promise, true)
                    }
                }
            };

            let subscription = FutureSource::subscribe(&promise, observer);
            if first {
                trace!("cache connecting to its source");
                self.subscribe(promise);
            }
            Ok(subscription)
        })
    }

    fn prefetch(self) -> Pledge<T> {
        let promise = Promise::new();
        self.subscribe(promise.clone());
        promise.pledge()
    }
}
