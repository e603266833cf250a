// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{FutureExt, Stream, StreamExt};
use pledge_core::{Pledge, PledgeError, StreamItem};
use pledge_interop::{repeat, repeat_every};
use pledge_test_utils::{TestFuture, VirtualScheduler};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Counts subscriptions, failing from the `fail_at`-th one on.
fn counter(fail_at: Option<u64>) -> Pledge<u64> {
    let runs = Arc::new(AtomicU64::new(0));
    Pledge::from_fn(move || {
        let run = runs.fetch_add(1, Ordering::SeqCst);
        match fail_at {
            Some(n) if run >= n => Err(PledgeError::Abandoned),
            _ => Ok(run),
        }
    })
}

fn poll_once<S: Stream + Unpin>(stream: &mut S) -> Option<Option<S::Item>> {
    stream.next().now_or_never()
}

#[test]
fn test_repeat_waits_for_first_poll() {
    // Arrange
    let scheduler = VirtualScheduler::new();
    let mut ticks = repeat_every(counter(None), scheduler.clone(), ms(10));
    assert_eq!(scheduler.pending(), 0);

    // Act
    let first = poll_once(&mut ticks);

    // Assert
    assert!(first.is_none());
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn test_repeat_every_emits_on_fixed_schedule() {
    // Arrange
    let scheduler = VirtualScheduler::new();
    let mut ticks = repeat_every(counter(None), scheduler.clone(), ms(10));
    let _ = poll_once(&mut ticks);

    // Act & Assert
    scheduler.advance_by(Duration::ZERO);
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(0))));
    assert_eq!(poll_once(&mut ticks), None);

    scheduler.advance_by(ms(9));
    assert_eq!(poll_once(&mut ticks), None);

    scheduler.advance_by(ms(1));
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(1))));

    scheduler.advance_by(ms(10));
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(2))));
}

#[test]
fn test_repeat_delay_depends_on_value() {
    // Arrange
    let scheduler = VirtualScheduler::new();
    let mut ticks = repeat(counter(None), scheduler.clone(), |run: &u64| ms((run + 1) * 5));
    let _ = poll_once(&mut ticks);

    // Act
    scheduler.advance_by(Duration::ZERO);
    scheduler.advance_by(ms(5));
    scheduler.advance_by(ms(10));

    // Assert
    assert_eq!(scheduler.now(), ms(15));
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(0))));
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(1))));
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(2))));
    assert_eq!(poll_once(&mut ticks), None);
}

#[test]
fn test_repeat_error_is_emitted_and_ends_stream() {
    // Arrange
    let scheduler = VirtualScheduler::new();
    let mut ticks = repeat_every(counter(Some(1)), scheduler.clone(), ms(10));
    let _ = poll_once(&mut ticks);

    // Act
    scheduler.start();

    // Assert
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(0))));
    assert_eq!(
        poll_once(&mut ticks),
        Some(Some(StreamItem::Error(PledgeError::Abandoned)))
    );
    assert_eq!(poll_once(&mut ticks), Some(None));
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_dropping_stream_cancels_pending_timer() {
    // Arrange
    let scheduler = VirtualScheduler::new();
    let mut ticks = repeat_every(counter(None), scheduler.clone(), ms(10));
    let _ = poll_once(&mut ticks);
    scheduler.advance_by(Duration::ZERO);
    assert_eq!(scheduler.pending(), 1);

    // Act
    drop(ticks);

    // Assert
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_dropping_stream_disposes_step_in_flight() {
    // Arrange
    let scheduler = VirtualScheduler::new();
    let source = TestFuture::<i32>::new();
    let mut ticks = repeat_every(source.pledge(), scheduler.clone(), ms(10));
    let _ = poll_once(&mut ticks);
    scheduler.advance_by(Duration::ZERO);
    assert_eq!(source.observer_count(), 1);

    // Act
    drop(ticks);

    // Assert
    assert_eq!(source.observer_count(), 0);
}

#[test]
fn test_repeat_resubscribes_after_each_value() {
    // Arrange
    let scheduler = VirtualScheduler::new();
    let source = TestFuture::<i32>::new();
    let mut ticks = repeat_every(source.pledge(), scheduler.clone(), ms(10));
    let _ = poll_once(&mut ticks);
    scheduler.advance_by(Duration::ZERO);

    // Act
    source.set_result(1);
    scheduler.advance_by(ms(10));
    source.set_result(2);

    // Assert
    assert_eq!(source.subscription_count(), 2);
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(1))));
    assert_eq!(poll_once(&mut ticks), Some(Some(StreamItem::Value(2))));
}
