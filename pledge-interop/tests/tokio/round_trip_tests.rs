// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{CancellationToken, Pledge, PledgeError};
use pledge_interop::{spawn, TaskExt};
use pledge_test_utils::{invalid_operation, record, TestFuture};

#[tokio::test]
async fn test_round_trip_preserves_value() -> anyhow::Result<()> {
    // Arrange
    let original = Pledge::value("kept".to_string());

    // Act
    let restored = spawn(original.to_task());

    // Assert
    assert_eq!(restored.to_task().await?, "kept");
    Ok(())
}

#[tokio::test]
async fn test_round_trip_preserves_error_identity() -> anyhow::Result<()> {
    // Arrange
    let error = invalid_operation("same instance");
    let original = Pledge::<i32>::fail(error.clone());

    // Act
    let restored = spawn(original.to_task());

    // Assert
    assert_eq!(restored.to_task().await, Err(error));
    Ok(())
}

#[tokio::test]
async fn test_round_trip_preserves_cancellation() -> anyhow::Result<()> {
    // Arrange
    let source = TestFuture::<i32>::new();
    let token = CancellationToken::new();
    let restored = spawn(source.pledge().to_cancellable_task(&token));

    // Act
    token.cancel();

    // Assert
    assert_eq!(restored.to_task().await, Err(PledgeError::Canceled));
    assert_eq!(source.observer_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_round_trip_delivers_exactly_once() -> anyhow::Result<()> {
    // Arrange
    let restored = spawn(Pledge::value(1).to_task());
    restored.to_task().await?;

    // Act
    let observer = record(&restored);

    // Assert
    assert_eq!(observer.count(), 1);
    Ok(())
}
