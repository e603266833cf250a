// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Two distinct error types, so typed recovery can be told apart.

use pledge_error::PledgeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid operation: {0}")]
pub struct InvalidOperation(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid argument: {0}")]
pub struct ArgumentError(pub String);

pub fn invalid_operation(message: &str) -> PledgeError {
    PledgeError::user_error(InvalidOperation(message.to_string()))
}

pub fn argument_error(message: &str) -> PledgeError {
    PledgeError::user_error(ArgumentError(message.to_string()))
}
