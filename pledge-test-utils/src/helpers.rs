// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::test_observer::TestObserver;
use futures::channel::mpsc;
use futures::stream::StreamExt;
use futures::Stream;
use pledge_core::{Pledge, StreamItem};
use pledge_error::PledgeError;
use std::time::Duration;
use tokio::time::sleep;

/// Subscribes a fresh [`TestObserver`] to `pledge` and returns it.
pub fn record<T>(pledge: &Pledge<T>) -> TestObserver<T>
where
    T: Clone + Send + 'static,
{
    let observer = TestObserver::new();
    pledge.subscribe(observer.clone());
    observer
}

/// A channel whose receiving half is a stream of pledges.
pub fn pledge_channel<T>() -> (
    mpsc::UnboundedSender<Pledge<T>>,
    impl Stream<Item = Pledge<T>> + Send + Unpin,
)
where
    T: Send + 'static,
{
    mpsc::unbounded()
}

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected element emitted, expected no output.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Waits for the next item and returns its value, or the error it carried.
///
/// # Panics
///
/// Panics if nothing arrives within `timeout_ms` or the stream ends.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> Result<T, PledgeError>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    tokio::select! {
        item = stream.next() => match item {
            Some(item) => item.into(),
            None => panic!("Expected an item but the stream ended"),
        },
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Timeout: no item within {timeout_ms} ms");
        }
    }
}

/// # Panics
///
/// Panics if the stream yields an item or does not end within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            if item.is_some() {
                panic!("Expected stream to end but it returned a value");
            }
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Timeout: Stream did not end within {timeout_ms} ms");
        }
    }
}
