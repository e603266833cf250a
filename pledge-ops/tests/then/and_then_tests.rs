// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{Notification, Pledge, PledgeError};
use pledge_ops::ThenExt;
use pledge_test_utils::{invalid_operation, record, TestFuture, TestObserver};

#[test]
fn test_and_then_continues_with_inner_pledge() {
    // Arrange
    let pledge = Pledge::value(2).and_then(|v| Ok(Pledge::value(v * 21)));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.values(), vec![42]);
}

#[test]
fn test_and_then_swaps_subscription_to_inner() {
    // Arrange
    let outer = TestFuture::<i32>::new();
    let inner = TestFuture::<String>::new();
    let inner_pledge = inner.pledge();
    let observer = TestObserver::new();
    let subscription = outer
        .pledge()
        .and_then(move |_| Ok(inner_pledge.clone()))
        .subscribe(observer.clone());

    // Act
    outer.set_result(1);

    // Assert
    assert_eq!(outer.observer_count(), 0);
    assert_eq!(inner.observer_count(), 1);

    subscription.dispose();
    assert_eq!(inner.observer_count(), 0);
    inner.set_result("late".to_string());
    assert!(observer.is_empty());
}

#[test]
fn test_and_then_inner_error_fails_result() {
    // Arrange
    let error = invalid_operation("inner");
    let inner_error = error.clone();
    let pledge = Pledge::value(1).and_then(move |_| Ok(Pledge::<i32>::fail(inner_error.clone())));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.events(), vec![Notification::Error(error)]);
}

#[test]
fn test_and_then_continuation_error_fails_result() {
    // Arrange
    let pledge = Pledge::value(1).and_then(|_| -> pledge_core::Result<Pledge<i32>> { Err(PledgeError::Canceled) });

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.errors(), vec![PledgeError::Canceled]);
}

#[test]
fn test_and_then_with_ignores_value() {
    // Arrange
    let pledge = Pledge::value(1).and_then_with(|| Ok(Pledge::value("next")));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.values(), vec!["next"]);
}
