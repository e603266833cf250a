// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cancellation token.
//!
//! The token is the bridge between disposal of a pledge subscription and
//! cooperative cancellation of async work: it can be awaited, polled, or asked
//! to run a callback when it fires.

use crate::subscription::Subscription;
use event_listener::{Event, EventListener};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

type Callback = Box<dyn FnOnce() + Send>;

/// Cloneable cancellation flag.
///
/// When `cancel()` is called on any clone, all waiters on `cancelled()` are
/// woken and every registered callback runs once.
///
/// # Example
///
/// ```
/// use pledge_core::CancellationToken;
///
/// # async fn example() {
/// let token = CancellationToken::new();
/// let token_clone = token.clone();
///
/// tokio::spawn(async move {
///     token_clone.cancelled().await;
/// });
///
/// token.cancel();
/// # }
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: AtomicBool,
    event: Event,
    callbacks: Mutex<Vec<(u64, Callback)>>,
    next_id: Mutex<u64>,
}

impl CancellationToken {
    /// Create a new, not yet cancelled token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
                callbacks: Mutex::new(Vec::new()),
                next_id: Mutex::new(0),
            }),
        }
    }

    /// Cancel the token, waking all listeners and running registered callbacks.
    ///
    /// Idempotent.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        self.inner.event.notify(usize::MAX);

        let callbacks = std::mem::take(&mut *self.inner.callbacks.lock());
        for (_, callback) in callbacks {
            callback();
        }
    }

    /// Check if the token has been cancelled (non-blocking).
    ///
    /// ```
    /// use pledge_core::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// assert!(!token.is_cancelled());
    ///
    /// token.cancel();
    /// assert!(token.is_cancelled());
    /// ```
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Runs `callback` when the token is cancelled, or right away if it already is.
    ///
    /// Disposing the returned subscription unregisters a callback that has not run yet.
    pub fn register<F>(&self, callback: F) -> Subscription
    where
        F: FnOnce() + Send + 'static,
    {
        let id = {
            let mut next_id = self.inner.next_id.lock();
            *next_id += 1;
            *next_id
        };

        {
            let mut callbacks = self.inner.callbacks.lock();
            if !self.is_cancelled() {
                callbacks.push((id, Box::new(callback)));
                drop(callbacks);

                let weak = Arc::downgrade(&self.inner);
                return Subscription::from_fn(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.callbacks.lock().retain(|(pending, _)| *pending != id);
                    }
                });
            }
        }

        callback();
        Subscription::empty()
    }

    /// Wait asynchronously until the token is cancelled.
    ///
    /// If the token is already cancelled, this returns immediately.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        loop {
            if self.token.is_cancelled() {
                return Poll::Ready(());
            }

            match self.listener.as_mut() {
                None => {
                    // Re-check after listening so a cancel racing with listen() is not lost
                    self.listener = Some(self.token.inner.event.listen());
                }
                Some(listener) => {
                    if Pin::new(listener).poll(cx).is_pending() {
                        return Poll::Pending;
                    }
                    self.listener = None;
                }
            }
        }
    }
}
