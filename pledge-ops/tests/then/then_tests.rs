// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use pledge_core::{Notification, Pledge};
use pledge_ops::ThenExt;
use pledge_test_utils::{record, TestFuture};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_then_transforms_value() {
    // Arrange
    let pledge = Pledge::value("123".to_string()).then(|s| Ok(s.parse::<i32>().unwrap_or_default()));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.events(), vec![Notification::Done(123)]);
}

#[test]
fn test_then_is_cold() {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = runs.clone();
    let pledge = Pledge::value(1_usize).then(move |v| Ok(v + runs_clone.fetch_add(1, Ordering::SeqCst)));

    // Act
    let first = record(&pledge);
    let second = record(&pledge);

    // Assert
    assert_eq!(first.values(), vec![1]);
    assert_eq!(second.values(), vec![2]);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_then_waits_for_source() {
    // Arrange
    let source = TestFuture::new();
    let observer = record(&source.pledge().map(|v: i32| v * 10));
    assert!(observer.is_empty());

    // Act
    source.set_result(4);

    // Assert
    assert_eq!(observer.values(), vec![40]);
}

#[test]
fn test_map_chains() {
    // Arrange
    let pledge = Pledge::value(2).map(|v| v + 1).map(|v| v * 3).map(|v| format!("{v}"));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.values(), vec!["9".to_string()]);
}

#[test]
fn test_then_with_ignores_value() {
    // Arrange
    let pledge = Pledge::value(1).then_with(|| Ok("ignored"));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.values(), vec!["ignored"]);
}

#[test]
fn test_then_do_runs_side_effect() {
    // Arrange
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let pledge = Pledge::value(7).then_do(move |v| {
        seen_clone.lock().push(v);
        Ok(())
    });

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(*seen.lock(), vec![7]);
    assert_eq!(observer.values(), vec![()]);
}

#[test]
fn test_then_run_runs_action() {
    // Arrange
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = runs.clone();
    let pledge = Pledge::value(7).then_run(move || {
        runs_clone.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(observer.values(), vec![()]);
}
