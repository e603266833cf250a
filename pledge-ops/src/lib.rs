// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Combinators for pledges.
//!
//! Each family lives behind its own extension trait, implemented for
//! [`Pledge`](pledge_core::Pledge):
//!
//! | Trait | Operators |
//! |---|---|
//! | [`ThenExt`] | `then`, `map`, `and_then`, `then_with`, `and_then_with`, `then_do`, `then_run` |
//! | [`RecoverExt`] | `recover_when`, `recover`, `recover_with`, `recover_to`, `recover_if`, `recover_typed*` |
//! | [`RetryExt`] | `retry`, `retry_n_with_delay`, `retry_with_delay`, `retry_n`, `retry_once` |
//! | [`ScheduleExt`] | `subscribe_on`, `observe_on` |
//! | [`FlattenExt`] | `flatten` |
//! | [`CacheExt`] | `cache`, `prefetch` |
//! | [`MaterializeExt`] | `materialize` |
//! | [`FactoryExt`] | `then`, `wrap` on pledge factories |
//!
//! Every operator returns a new cold pledge (except `cache` and `prefetch`),
//! forwards disposal to whichever upstream stage is active, and turns a failing
//! or panicking user callback into an error notification.

#[macro_use]
mod logging;

pub mod cache;
pub mod factory;
pub mod flatten;
pub mod materialize;
pub mod recover;
pub mod retry;
pub mod schedule;
pub mod then;

pub use self::cache::CacheExt;
pub use self::factory::FactoryExt;
pub use self::flatten::FlattenExt;
pub use self::materialize::MaterializeExt;
pub use self::recover::RecoverExt;
pub use self::retry::RetryExt;
pub use self::schedule::ScheduleExt;
pub use self::then::ThenExt;
