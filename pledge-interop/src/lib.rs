// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridges between pledges and the rest of the async ecosystem.
//!
//! - [`TaskExt`] turns a pledge into an awaitable [`PledgeTask`].
//! - [`from_task`], [`spawn`], [`from_async_fn`] and [`from_cancellable_async_fn`]
//!   go the other way, on top of tokio (feature `runtime-tokio`).
//! - [`ToStreamExt`], [`unbox`] and [`repeat`] connect pledges with
//!   [`futures::Stream`]s of [`StreamItem`](pledge_core::StreamItem)s.
//!
//! Every bridge keeps the pledge guarantees across the boundary: one outcome
//! at most, and dropping the task or stream disposes the subscription behind it.

#[macro_use]
mod logging;

pub mod repeat;
#[cfg(feature = "runtime-tokio")]
pub mod spawn;
pub mod stream;
pub mod task;

pub use self::repeat::{repeat, repeat_every, RepeatStream};
#[cfg(feature = "runtime-tokio")]
pub use self::spawn::{from_async_fn, from_cancellable_async_fn, from_task, spawn};
pub use self::stream::{unbox, PledgeStream, ToStreamExt, UntilError};
pub use self::task::{PledgeTask, TaskExt};
