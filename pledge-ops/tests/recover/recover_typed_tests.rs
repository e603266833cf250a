// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::{Pledge, PledgeError};
use pledge_ops::RecoverExt;
use pledge_test_utils::{argument_error, invalid_operation, record, ArgumentError, InvalidOperation};

#[test]
fn test_recover_typed_handles_matching_type() {
    // Arrange
    let pledge = Pledge::<String>::fail(invalid_operation("typed"))
        .recover_typed::<InvalidOperation, _>(|e| Ok(e.0.clone()));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.values(), vec!["typed".to_string()]);
}

#[test]
fn test_recover_typed_passes_other_types() {
    // Arrange
    let error = argument_error("other");
    let pledge = Pledge::<String>::fail(error.clone())
        .recover_typed::<InvalidOperation, _>(|e| Ok(e.0.clone()));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.errors(), vec![error]);
}

#[test]
fn test_recover_typed_ignores_library_errors() {
    // Arrange
    let pledge = Pledge::<i32>::fail(PledgeError::Canceled)
        .recover_typed::<InvalidOperation, _>(|_| Ok(0));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.errors(), vec![PledgeError::Canceled]);
}

#[test]
fn test_recover_typed_with_continues_with_pledge() {
    // Arrange
    let pledge = Pledge::<usize>::fail(argument_error("abc"))
        .recover_typed_with::<ArgumentError, _>(|e| Ok(Pledge::value(e.0.len())));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.values(), vec![3]);
}

#[test]
fn test_recover_typed_to_chain_picks_first_match() {
    // Arrange
    let pledge = Pledge::<&str>::fail(argument_error("which"))
        .recover_typed_to::<InvalidOperation>(Pledge::value("invalid operation"))
        .recover_typed_to::<ArgumentError>(Pledge::value("argument"));

    // Act
    let observer = record(&pledge);

    // Assert
    assert_eq!(observer.values(), vec!["argument"]);
}
