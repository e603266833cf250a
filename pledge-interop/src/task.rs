// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::oneshot;
use parking_lot::Mutex;
use pledge_core::{CancellationToken, FutureObserver, Pledge, PledgeError, Result, Subscription};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Future resolving to the outcome of a pledge.
///
/// The pledge is subscribed when the task is created, not when it is first
/// polled. Dropping the task disposes the subscription.
#[must_use = "dropping a PledgeTask disposes its subscription"]
pub struct PledgeTask<T> {
    receiver: oneshot::Receiver<Result<T>>,
    subscriptions: Vec<Subscription>,
}

impl<T> Future for PledgeTask<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(PledgeError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for PledgeTask<T> {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            subscription.dispose();
        }
    }
}

/// Sending half shared by everything that may resolve a task; first one wins.
struct Completion<T> {
    sender: Arc<Mutex<Option<oneshot::Sender<Result<T>>>>>,
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T> Completion<T> {
    fn channel() -> (Self, oneshot::Receiver<Result<T>>) {
        let (sender, receiver) = oneshot::channel();
        let completion = Self {
            sender: Arc::new(Mutex::new(Some(sender))),
        };
        (completion, receiver)
    }

    fn resolve(&self, outcome: Result<T>) {
        let sender = self.sender.lock().take();
        if let Some(sender) = sender {
            // The task may already be gone.
            let _ = sender.send(outcome);
        }
    }
}

impl<T: Send> FutureObserver<T> for Completion<T> {
    fn on_done(&self, value: T) {
        self.resolve(Ok(value));
    }

    fn on_error(&self, error: PledgeError) {
        self.resolve(Err(error));
    }
}

/// Conversions from a pledge to awaitable tasks.
pub trait TaskExt<T>: Sized {
    /// Subscribes now and returns a future resolving to the outcome.
    ///
    /// If the pledge drops its observer without delivering, the task resolves
    /// to [`PledgeError::Abandoned`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use pledge_core::Pledge;
    /// use pledge_interop::TaskExt;
    ///
    /// let task = Pledge::value(7).to_task();
    /// assert_eq!(futures::executor::block_on(task).ok(), Some(7));
    /// ```
    fn to_task(&self) -> PledgeTask<T>;

    /// Like [`TaskExt::to_task`], but cancelling `token` disposes the
    /// subscription and resolves the task to [`PledgeError::Canceled`].
    ///
    /// A token that is already cancelled yields a cancelled task without
    /// subscribing.
    fn to_cancellable_task(&self, token: &CancellationToken) -> PledgeTask<T>;

    /// A function producing a fresh task, with its own subscription, per call.
    fn to_task_factory(self) -> impl Fn() -> PledgeTask<T> + Send + Sync + 'static;

    /// Cancellable form of [`TaskExt::to_task_factory`].
    fn to_cancellable_task_factory(
        self,
    ) -> impl Fn(&CancellationToken) -> PledgeTask<T> + Send + Sync + 'static;
}

impl<T: Send + 'static> TaskExt<T> for Pledge<T> {
    fn to_task(&self) -> PledgeTask<T> {
        let (completion, receiver) = Completion::channel();
        let subscription = self.subscribe(completion);
        PledgeTask {
            receiver,
            subscriptions: vec![subscription],
        }
    }

    fn to_cancellable_task(&self, token: &CancellationToken) -> PledgeTask<T> {
        let (completion, receiver) = Completion::channel();
        if token.is_cancelled() {
            completion.resolve(Err(PledgeError::Canceled));
            return PledgeTask {
                receiver,
                subscriptions: Vec::new(),
            };
        }

        let subscription = self.subscribe(completion.clone());
        let on_cancel = subscription.clone();
        let registration = token.register(move || {
            debug!("task cancelled, disposing its subscription");
            on_cancel.dispose();
            completion.resolve(Err(PledgeError::Canceled));
        });

        PledgeTask {
            receiver,
            subscriptions: vec![subscription, registration],
        }
    }

    fn to_task_factory(self) -> impl Fn() -> PledgeTask<T> + Send + Sync + 'static {
        move || self.to_task()
    }

    fn to_cancellable_task_factory(
        self,
    ) -> impl Fn(&CancellationToken) -> PledgeTask<T> + Send + Sync + 'static {
        move |token: &CancellationToken| self.to_cancellable_task(token)
    }
}
