// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{PledgeError, Result};
use pledge_interop::{from_task, spawn, TaskExt};
use pledge_test_utils::{invalid_operation, record};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;

#[tokio::test]
async fn test_from_task_delivers_value() -> anyhow::Result<()> {
    // Arrange
    let pledge = from_task(tokio::spawn(async { Result::<i32>::Ok(5) }));

    // Act
    let value = pledge.to_task().await?;

    // Assert
    assert_eq!(value, 5);
    Ok(())
}

#[tokio::test]
async fn test_from_task_delivers_task_error() -> anyhow::Result<()> {
    // Arrange
    let error = invalid_operation("task failed");
    let returned = error.clone();
    let pledge = spawn(async move { Result::<i32>::Err(returned) });

    // Act
    let outcome = pledge.to_task().await;

    // Assert
    assert_eq!(outcome, Err(error));
    Ok(())
}

#[tokio::test]
async fn test_from_task_maps_panic_to_callback_panic() -> anyhow::Result<()> {
    // Arrange
    let handle = tokio::spawn(async {
        if true {
            panic!("task panicked");
        }
        Result::<i32>::Ok(0)
    });

    // Act
    let outcome = from_task(handle).to_task().await;

    // Assert
    assert_eq!(outcome, Err(PledgeError::callback_panic("task panicked")));
    Ok(())
}

#[tokio::test]
async fn test_from_task_maps_abort_to_canceled() -> anyhow::Result<()> {
    // Arrange
    let handle = tokio::spawn(async {
        sleep(Duration::from_secs(3600)).await;
        Result::<i32>::Ok(0)
    });
    let abort = handle.abort_handle();
    let pledge = from_task(handle);

    // Act
    abort.abort();

    // Assert
    assert_eq!(pledge.to_task().await, Err(PledgeError::Canceled));
    Ok(())
}

#[tokio::test]
async fn test_from_task_runs_without_subscribers() -> anyhow::Result<()> {
    // Arrange
    let (done, finished) = oneshot::channel();

    // Act
    let _pledge = spawn(async move {
        let _ = done.send(());
        Result::<()>::Ok(())
    });

    // Assert
    finished.await?;
    Ok(())
}

#[tokio::test]
async fn test_late_subscriber_receives_cached_outcome_synchronously() -> anyhow::Result<()> {
    // Arrange
    let runs = Arc::new(AtomicBool::new(false));
    let runs_clone = runs.clone();
    let pledge = spawn(async move {
        let repeated = runs_clone.swap(true, Ordering::SeqCst);
        Result::<i32>::Ok(if repeated { 0 } else { 1 })
    });
    pledge.to_task().await?;

    // Act
    let late = record(&pledge);

    // Assert
    assert_eq!(late.values(), vec![1]);
    Ok(())
}
