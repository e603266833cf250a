// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::task::{PledgeTask, TaskExt};
use futures::stream::{Stream, StreamExt};
use pin_project::pin_project;
use pledge_core::{Pledge, StreamItem};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Conversion from a pledge to a single-item stream.
pub trait ToStreamExt<T>: Sized {
    /// A stream yielding the outcome of one subscription, then ending.
    ///
    /// The subscription is made on the first poll, so every stream instance
    /// sees its own execution of a cold pledge. Dropping the stream disposes
    /// the subscription.
    ///
    /// # Example
    ///
    /// ```rust
    /// use futures::StreamExt;
    /// use pledge_core::{Pledge, StreamItem};
    /// use pledge_interop::ToStreamExt;
    ///
    /// let items: Vec<_> = futures::executor::block_on(Pledge::value(3).to_stream().collect());
    /// assert_eq!(items, vec![StreamItem::Value(3)]);
    /// ```
    fn to_stream(&self) -> PledgeStream<T>;
}

impl<T: Send + 'static> ToStreamExt<T> for Pledge<T> {
    fn to_stream(&self) -> PledgeStream<T> {
        PledgeStream {
            pledge: Some(self.clone()),
            task: None,
        }
    }
}

/// Stream returned by [`ToStreamExt::to_stream`].
#[must_use = "streams do nothing unless polled"]
pub struct PledgeStream<T> {
    pledge: Option<Pledge<T>>,
    task: Option<PledgeTask<T>>,
}

impl<T: Send + 'static> Stream for PledgeStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(pledge) = self.pledge.take() {
            trace!("stream subscribing on first poll");
            self.task = Some(pledge.to_task());
        }

        let Some(task) = self.task.as_mut() else {
            return Poll::Ready(None);
        };

        match Pin::new(task).poll(cx) {
            Poll::Ready(outcome) => {
                self.task = None;
                Poll::Ready(Some(StreamItem::from(outcome)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Merges a stream of pledges into a stream of their outcomes.
///
/// Every pledge is subscribed as soon as it arrives and its outcome is emitted
/// in completion order. The stream ends once the source and all pledges are
/// done, or right after the first error, which disposes the pledges still
/// in flight.
///
/// # Example
///
/// ```rust
/// use futures::StreamExt;
/// use pledge_core::{Pledge, StreamItem};
/// use pledge_interop::unbox;
///
/// let pledges = futures::stream::iter(vec![Pledge::value(1), Pledge::value(2)]);
/// let mut values: Vec<i32> =
///     futures::executor::block_on(unbox(pledges).map(StreamItem::unwrap).collect());
/// values.sort_unstable();
/// assert_eq!(values, vec![1, 2]);
/// ```
pub fn unbox<S, T>(pledges: S) -> UntilError<impl Stream<Item = StreamItem<T>>>
where
    S: Stream<Item = Pledge<T>>,
    T: Send + 'static,
{
    UntilError {
        inner: Some(pledges.map(|pledge| pledge.to_stream()).flatten_unordered(None)),
    }
}

/// Forwards items until the first error, then ends.
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct UntilError<S> {
    #[pin]
    inner: Option<S>,
}

impl<S, T> Stream for UntilError<S>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        let Some(inner) = this.inner.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };

        match inner.poll_next(cx) {
            Poll::Ready(Some(item)) => {
                if item.is_error() {
                    this.inner.set(None);
                }
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                this.inner.set(None);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
