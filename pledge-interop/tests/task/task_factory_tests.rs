// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{CancellationToken, Pledge, PledgeError};
use pledge_interop::TaskExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counter() -> Pledge<usize> {
    let runs = Arc::new(AtomicUsize::new(0));
    Pledge::from_fn(move || Ok(runs.fetch_add(1, Ordering::SeqCst)))
}

#[tokio::test]
async fn test_task_factory_subscribes_per_call() -> anyhow::Result<()> {
    // Arrange
    let next = counter().to_task_factory();

    // Act
    let first = next().await?;
    let second = next().await?;

    // Assert
    assert_eq!((first, second), (0, 1));
    Ok(())
}

#[tokio::test]
async fn test_task_factory_creates_nothing_until_called() -> anyhow::Result<()> {
    // Arrange
    let pledge = counter();
    let probe = pledge.clone();

    // Act
    let next = pledge.to_task_factory();

    // Assert
    assert_eq!(probe.to_task().await?, 0);
    assert_eq!(next().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_cancellable_factory_uses_each_token() -> anyhow::Result<()> {
    // Arrange
    let next = Pledge::<i32>::never().to_cancellable_task_factory();
    let cancelled = CancellationToken::new();
    let live = CancellationToken::new();

    // Act
    let first = next(&cancelled);
    let _second = next(&live);
    cancelled.cancel();

    // Assert
    assert_eq!(first.await, Err(PledgeError::Canceled));
    assert!(!live.is_cancelled());
    Ok(())
}
