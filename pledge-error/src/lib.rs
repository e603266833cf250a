// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the Pledge push-based future library
//!
//! Every failure a pledge can report travels as a [`PledgeError`]. Errors are
//! cheap to clone because a single terminal notification may be replayed to many
//! subscribers (cached pledges, promises, failed generators), and cloning keeps the
//! identity of the original user error so subscribers can tell whether they saw
//! "the same" failure.
//!
//! # Examples
//!
//! ```
//! use pledge_error::{IntoPledgeError, PledgeError, Result};
//! use std::io;
//!
//! fn read_config() -> Result<String> {
//!     Err(io::Error::other("missing file").into_pledge())
//! }
//!
//! let err = read_config().unwrap_err();
//! assert!(err.is::<io::Error>());
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

/// Root error type for all Pledge operations
///
/// The variants classify *why* a pledge failed. User code mostly produces
/// [`PledgeError::UserError`]; the other variants are raised by the library itself.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PledgeError {
    /// Custom error from user code
    ///
    /// Wraps errors returned by user callbacks, upstream computations and tasks.
    /// The error is reference counted so that every subscriber receiving it observes
    /// the very same instance.
    #[error("User error: {0}")]
    UserError(#[source] Arc<dyn StdError + Send + Sync + 'static>),

    /// The underlying task-like primitive was cancelled while a pledge built on it
    /// was still subscribed.
    #[error("Operation was canceled")]
    Canceled,

    /// User-provided callback function panicked
    ///
    /// When a user-supplied closure panics while a pledge is being subscribed to or
    /// while a continuation runs, the panic is caught and converted to this variant.
    #[error("User callback panicked: {context}")]
    CallbackPanic {
        /// The panic message, when one could be recovered
        context: String,
    },

    /// The producer went away without ever delivering a result.
    #[error("Producer dropped without delivering a result")]
    Abandoned,
}

impl PledgeError {
    /// Wrap a user error
    pub fn user_error(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Create a callback panic error with the given context
    pub fn callback_panic(context: impl Into<String>) -> Self {
        Self::CallbackPanic {
            context: context.into(),
        }
    }

    /// Convert a panic payload captured by `catch_unwind` into a `CallbackPanic`.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let context = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self::CallbackPanic { context }
    }

    /// Returns `true` if this error wraps a user error of type `E`.
    #[must_use]
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }

    /// Borrow the wrapped user error as `E`, if it is one.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::UserError(inner) => inner.as_ref().downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns `true` for the cancellation classification.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Returns `true` if a user callback panicked.
    #[must_use]
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::CallbackPanic { .. })
    }
}

/// User errors compare by identity, library errors structurally.
impl PartialEq for PledgeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserError(a), Self::UserError(b)) => Arc::ptr_eq(a, b),
            (Self::Canceled, Self::Canceled) | (Self::Abandoned, Self::Abandoned) => true,
            (Self::CallbackPanic { context: a }, Self::CallbackPanic { context: b }) => a == b,
            _ => false,
        }
    }
}

/// Specialized Result type for Pledge operations
///
/// This is a type alias for `std::result::Result<T, PledgeError>`. Every fallible
/// user callback accepted by the combinators returns it.
///
/// # Examples
///
/// ```
/// use pledge_error::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, PledgeError>;

/// Extension trait for converting errors into `PledgeError`
///
/// This trait is automatically implemented for all types that implement
/// `std::error::Error + Send + Sync + 'static`.
pub trait IntoPledgeError {
    /// Convert this error into a `PledgeError::UserError`
    fn into_pledge(self) -> PledgeError;
}

impl<E: StdError + Send + Sync + 'static> IntoPledgeError for E {
    fn into_pledge(self) -> PledgeError {
        PledgeError::user_error(self)
    }
}
