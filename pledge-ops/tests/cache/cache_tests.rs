// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{Pledge, PledgeError};
use pledge_ops::CacheExt;
use pledge_test_utils::{invalid_operation, record, TestFuture, TestObserver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_cache_is_lazy() {
    // Arrange
    let source = TestFuture::<i32>::new();

    // Act
    let _cached = source.pledge().cache();

    // Assert
    assert_eq!(source.subscription_count(), 0);
}

#[test]
fn test_cache_shares_one_upstream_subscription() {
    // Arrange
    let source = TestFuture::<i32>::new();
    let cached = source.pledge().cache();

    // Act
    let first = record(&cached);
    let second = record(&cached);
    source.set_result(3);

    // Assert
    assert_eq!(source.subscription_count(), 1);
    assert_eq!(first.values(), vec![3]);
    assert_eq!(second.values(), vec![3]);
}

#[test]
fn test_cache_replays_to_late_subscriber() {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = runs.clone();
    let cached = Pledge::from_fn(move || Ok(runs_clone.fetch_add(1, Ordering::SeqCst))).cache();
    let _first = record(&cached);

    // Act
    let late = record(&cached);

    // Assert
    assert_eq!(late.values(), vec![0]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_replays_errors() {
    // Arrange
    let error = invalid_operation("cached");
    let cached = Pledge::<i32>::fail(error.clone()).cache();
    let _first = record(&cached);

    // Act
    let late = record(&cached);

    // Assert
    assert_eq!(late.errors(), vec![error]);
}

#[test]
fn test_disposing_one_subscriber_keeps_others() {
    // Arrange
    let source = TestFuture::<i32>::new();
    let cached = source.pledge().cache();
    let dropped = TestObserver::new();
    let subscription = cached.subscribe(dropped.clone());
    let kept = record(&cached);

    // Act
    subscription.dispose();
    source.set_result(5);

    // Assert
    assert!(dropped.is_empty());
    assert_eq!(kept.values(), vec![5]);
    assert_eq!(source.subscription_count(), 1);
}

#[test]
fn test_cache_outcome_is_fixed_after_completion() {
    // Arrange
    let source = TestFuture::<i32>::new();
    let cached = source.pledge().cache();
    let _first = record(&cached);
    source.set_error(PledgeError::Canceled);

    // Act
    let late = record(&cached);

    // Assert
    assert_eq!(late.errors(), vec![PledgeError::Canceled]);
    assert_eq!(source.subscription_count(), 1);
}

#[test]
fn test_concurrent_first_subscribers_share_one_upstream() -> anyhow::Result<()> {
    const SUBSCRIBERS: usize = 8;

    for _ in 0..100 {
        // Arrange
        let source = TestFuture::new();
        let cached = source.pledge().cache();
        let barrier = Arc::new(Barrier::new(SUBSCRIBERS));
        let handles: Vec<_> = (0..SUBSCRIBERS)
            .map(|_| {
                let cached = cached.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    record(&cached)
                })
            })
            .collect();

        let mut observers = Vec::with_capacity(SUBSCRIBERS);
        for handle in handles {
            observers.push(
                handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("subscriber thread panicked"))?,
            );
        }
        assert_eq!(source.subscription_count(), 1);

        // Act
        source.set_result(9);
        let late = record(&cached);

        // Assert
        for observer in &observers {
            assert_eq!(observer.values(), vec![9]);
        }
        assert_eq!(late.values(), vec![9]);
        assert_eq!(source.subscription_count(), 1);
    }

    Ok(())
}
