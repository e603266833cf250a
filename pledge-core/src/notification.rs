// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::observer::FutureObserver;
use crate::stream_item::StreamItem;
use pledge_error::{PledgeError, Result};

/// The terminal event of a pledge, reified as a value.
///
/// Equality is structural: two `Done` notifications are equal when their values
/// are, two `Error` notifications when their errors are (user errors compare by
/// identity, see [`PledgeError`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<T> {
    /// Successful completion
    Done(T),
    /// Failed completion
    Error(PledgeError),
}

impl<T> Notification<T> {
    /// Returns `true` if this is a `Done`.
    pub const fn is_done(&self) -> bool {
        matches!(self, Notification::Done(_))
    }

    /// Returns `true` if this is an `Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Notification::Done(value) => Some(value),
            Notification::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PledgeError> {
        match self {
            Notification::Done(_) => None,
            Notification::Error(error) => Some(error),
        }
    }

    /// Maps the value of a `Done`, leaving errors untouched.
    pub fn map<U, F>(self, f: F) -> Notification<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Notification::Done(value) => Notification::Done(f(value)),
            Notification::Error(error) => Notification::Error(error),
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Notification::Done(value) => Ok(value),
            Notification::Error(error) => Err(error),
        }
    }

    /// Replays this notification into an observer.
    pub fn deliver<O>(self, observer: &O)
    where
        O: FutureObserver<T> + ?Sized,
    {
        match self {
            Notification::Done(value) => observer.on_done(value),
            Notification::Error(error) => observer.on_error(error),
        }
    }
}

impl<T> From<Result<T>> for Notification<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Notification::Done(value),
            Err(error) => Notification::Error(error),
        }
    }
}

impl<T> From<Notification<T>> for StreamItem<T> {
    fn from(notification: Notification<T>) -> Self {
        match notification {
            Notification::Done(value) => StreamItem::Value(value),
            Notification::Error(error) => StreamItem::Error(error),
        }
    }
}
