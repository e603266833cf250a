// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::mpsc;
use futures::stream::Stream;
use pledge_core::{catch_callback, Observer, Pledge, PledgeError, SerialSubscription, StreamItem};
use pledge_runtime::Scheduler;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Polls `pledge` repeatedly, emitting every value.
///
/// The first subscription is scheduled to run as soon as possible once the
/// stream is first polled. After each value, the next subscription is
/// scheduled after `delay_selector(&value)`. An error is emitted and ends the
/// stream. Dropping the stream cancels the step in flight and any pending timer.
///
/// # Example
///
/// ```rust
/// use futures::{FutureExt, StreamExt};
/// use pledge_core::{Pledge, StreamItem};
/// use pledge_interop::repeat;
/// use pledge_test_utils::VirtualScheduler;
/// use std::time::Duration;
///
/// let scheduler = VirtualScheduler::new();
/// let mut ticks = repeat(Pledge::value(1), scheduler.clone(), |_| Duration::from_secs(1));
///
/// assert!(ticks.next().now_or_never().is_none());
/// scheduler.advance_by(Duration::ZERO);
/// assert_eq!(ticks.next().now_or_never(), Some(Some(StreamItem::Value(1))));
/// ```
pub fn repeat<T, S, D>(pledge: Pledge<T>, scheduler: S, delay_selector: D) -> RepeatStream<T>
where
    T: Send + 'static,
    S: Scheduler,
    D: Fn(&T) -> Duration + Send + Sync + 'static,
{
    let (sender, receiver) = mpsc::unbounded();
    let repeater = Arc::new(Repeater {
        pledge,
        scheduler,
        delay_selector,
        stage: SerialSubscription::new(),
        sender,
    });

    RepeatStream {
        receiver,
        stage: repeater.stage.clone(),
        start: Some(Box::new(move || repeater.start())),
    }
}

/// [`repeat`] with the same delay after every value.
pub fn repeat_every<T, S>(pledge: Pledge<T>, scheduler: S, delay: Duration) -> RepeatStream<T>
where
    T: Send + 'static,
    S: Scheduler,
{
    repeat(pledge, scheduler, move |_| delay)
}

/// Stream returned by [`repeat`] and [`repeat_every`].
#[must_use = "streams do nothing unless polled"]
pub struct RepeatStream<T> {
    receiver: mpsc::UnboundedReceiver<StreamItem<T>>,
    stage: SerialSubscription,
    start: Option<Box<dyn FnOnce() + Send>>,
}

impl<T> Stream for RepeatStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(start) = self.start.take() {
            start();
        }
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl<T> Drop for RepeatStream<T> {
    fn drop(&mut self) {
        self.stage.dispose();
    }
}

struct Repeater<T, S, D> {
    pledge: Pledge<T>,
    scheduler: S,
    delay_selector: D,
    stage: SerialSubscription,
    sender: mpsc::UnboundedSender<StreamItem<T>>,
}

impl<T, S, D> Repeater<T, S, D>
where
    T: Send + 'static,
    S: Scheduler,
    D: Fn(&T) -> Duration + Send + Sync + 'static,
{
    fn start(self: &Arc<Self>) {
        let repeater = Arc::clone(self);
        self.stage
            .assign_with(|| self.scheduler.schedule(Box::new(move || repeater.step())));
    }

    /// Arms the timer for the next step; it replaces the step just finished.
    fn schedule(self: &Arc<Self>, delay: Duration) {
        let repeater = Arc::clone(self);
        self.stage.assign_with(|| {
            self.scheduler
                .schedule_after(delay, Box::new(move || repeater.step()))
        });
    }

    fn step(self: &Arc<Self>) {
        let on_done = Arc::clone(self);
        let on_error = Arc::clone(self);
        self.stage.assign_with(|| {
            self.pledge.subscribe(Observer::new(
                move |value: T| on_done.emit(value),
                move |error: PledgeError| on_error.fail(error),
            ))
        });
    }

    fn emit(self: &Arc<Self>, value: T) {
        match catch_callback(|| Ok((self.delay_selector)(&value))) {
            Ok(delay) => {
                if self.sender.unbounded_send(StreamItem::Value(value)).is_ok() {
                    self.schedule(delay);
                }
            }
            Err(error) => {
                let _ = self.sender.unbounded_send(StreamItem::Value(value));
                self.fail(error);
            }
        }
    }

    fn fail(&self, error: PledgeError) {
        let _ = self.sender.unbounded_send(StreamItem::Error(error));
        self.sender.close_channel();
        self.stage.dispose();
    }
}
