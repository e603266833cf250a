// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{Pledge, PledgeError};
use pledge_ops::FlattenExt;
use pledge_test_utils::{record, TestFuture, TestObserver};

#[test]
fn test_flatten_delivers_inner_value() {
    // Arrange
    let nested = Pledge::value(Pledge::value("inner"));

    // Act
    let observer = record(&nested.flatten());

    // Assert
    assert_eq!(observer.values(), vec!["inner"]);
}

#[test]
fn test_flatten_forwards_outer_error() {
    // Arrange
    let nested = Pledge::<Pledge<i32>>::fail(PledgeError::Canceled);

    // Act
    let observer = record(&nested.flatten());

    // Assert
    assert_eq!(observer.errors(), vec![PledgeError::Canceled]);
}

#[test]
fn test_flatten_forwards_inner_error() {
    // Arrange
    let nested = Pledge::value(Pledge::<i32>::fail(PledgeError::Abandoned));

    // Act
    let observer = record(&nested.flatten());

    // Assert
    assert_eq!(observer.errors(), vec![PledgeError::Abandoned]);
}

#[test]
fn test_flatten_dispose_releases_inner() {
    // Arrange
    let inner = TestFuture::<i32>::new();
    let observer = TestObserver::new();
    let subscription = Pledge::value(inner.pledge()).flatten().subscribe(observer.clone());
    assert_eq!(inner.observer_count(), 1);

    // Act
    subscription.dispose();

    // Assert
    assert_eq!(inner.observer_count(), 0);
}
