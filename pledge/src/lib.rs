// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Pledge
//!
//! Push-based, single-value asynchronous values.
//!
//! ## Overview
//!
//! A [`Pledge<T>`] describes a computation that ends with exactly one value or
//! one error. It is cold: nothing runs until it is subscribed, and every
//! subscription runs the computation again. A subscription hands back a
//! [`Subscription`] whose disposal guarantees that nothing more is delivered.
//!
//! On top of that sit the combinators of `pledge-ops` (continuations,
//! recovery, retry, scheduling, caching) and the bridges of `pledge-interop`
//! to tasks and streams.
//!
//! ## Quick Start
//!
//! ```rust
//! use pledge::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let parsed = Pledge::value("123".to_string())
//!     .then(|text| text.parse::<i32>().map_err(PledgeError::user_error))
//!     .recover(|_| Ok(0));
//!
//! let seen = Arc::new(Mutex::new(None));
//! let seen_clone = seen.clone();
//! parsed.subscribe_done(move |n| *seen_clone.lock().unwrap() = Some(n));
//!
//! assert_eq!(*seen.lock().unwrap(), Some(123));
//! ```

pub use pledge_core::{
    catch_callback, CancellationToken, CompositeSubscription, Disposable, FutureObserver,
    FutureSource, IntoPledgeError, Notification, Observer, ObserverRef, Pledge, PledgeError,
    Promise, Result, SerialSubscription, StreamItem, Subscription,
};
pub use pledge_interop::{
    repeat, repeat_every, unbox, PledgeStream, PledgeTask, RepeatStream, TaskExt, ToStreamExt,
};
#[cfg(feature = "runtime-tokio")]
pub use pledge_interop::{from_async_fn, from_cancellable_async_fn, from_task, spawn};
pub use pledge_ops::{
    CacheExt, FactoryExt, FlattenExt, MaterializeExt, RecoverExt, RetryExt, ScheduleExt, ThenExt,
};
#[cfg(feature = "runtime-tokio")]
pub use pledge_runtime::TokioScheduler;
pub use pledge_runtime::{Action, Scheduler};

/// Prelude module for convenient imports
pub mod prelude {
    pub use pledge_core::{Notification, Pledge, PledgeError, StreamItem, Subscription};
    pub use pledge_interop::{TaskExt, ToStreamExt};
    pub use pledge_ops::{
        CacheExt, FactoryExt, FlattenExt, MaterializeExt, RecoverExt, RetryExt, ScheduleExt,
        ThenExt,
    };
    pub use pledge_runtime::Scheduler;
}
