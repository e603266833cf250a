// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_error::{PledgeError, Result};
use std::panic::{self, AssertUnwindSafe};

/// Runs a user callback, turning a panic into [`PledgeError::CallbackPanic`].
///
/// Errors returned by the callback pass through unchanged.
///
/// # Example
///
/// ```
/// use pledge_core::catch_callback;
///
/// let result: pledge_error::Result<i32> = catch_callback(|| panic!("boom"));
/// assert!(result.unwrap_err().is_panic());
/// ```
pub fn catch_callback<R, F>(callback: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(result) => result,
        Err(payload) => {
            let error = PledgeError::from_panic(payload);
            warn!("user callback panicked: {}", error);
            Err(error)
        }
    }
}
