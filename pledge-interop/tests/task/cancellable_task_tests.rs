// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{CancellationToken, PledgeError};
use pledge_interop::TaskExt;
use pledge_test_utils::TestFuture;

#[tokio::test]
async fn test_cancel_disposes_and_resolves_canceled() -> anyhow::Result<()> {
    // Arrange
    let source = TestFuture::<i32>::new();
    let token = CancellationToken::new();
    let task = source.pledge().to_cancellable_task(&token);
    assert_eq!(source.observer_count(), 1);

    // Act
    token.cancel();

    // Assert
    assert_eq!(source.observer_count(), 0);
    assert_eq!(task.await, Err(PledgeError::Canceled));
    Ok(())
}

#[tokio::test]
async fn test_cancelled_token_never_subscribes() -> anyhow::Result<()> {
    // Arrange
    let source = TestFuture::<i32>::new();
    let token = CancellationToken::new();
    token.cancel();

    // Act
    let task = source.pledge().to_cancellable_task(&token);

    // Assert
    assert_eq!(source.subscription_count(), 0);
    assert_eq!(task.await, Err(PledgeError::Canceled));
    Ok(())
}

#[tokio::test]
async fn test_completion_before_cancel_keeps_value() -> anyhow::Result<()> {
    // Arrange
    let source = TestFuture::<i32>::new();
    let token = CancellationToken::new();
    let task = source.pledge().to_cancellable_task(&token);

    // Act
    source.set_result(9);
    token.cancel();

    // Assert
    assert_eq!(task.await?, 9);
    Ok(())
}

#[tokio::test]
async fn test_source_error_passes_through() -> anyhow::Result<()> {
    // Arrange
    let source = TestFuture::<i32>::new();
    let token = CancellationToken::new();
    let task = source.pledge().to_cancellable_task(&token);

    // Act
    source.set_error(PledgeError::Abandoned);

    // Assert
    assert_eq!(task.await, Err(PledgeError::Abandoned));
    Ok(())
}
