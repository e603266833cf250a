// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Where and when deferred pledge work runs.
//!
//! Combinators that delay or move work (retry back-off, `subscribe_on`,
//! `observe_on`, repeating streams) never own timers. They receive a
//! [`Scheduler`] and hand it boxed actions.

pub mod impls;
pub mod scheduler;

pub use self::scheduler::{Action, Scheduler};

#[cfg(feature = "runtime-tokio")]
pub use self::impls::tokio::TokioScheduler;
