// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the Pledge library.
//!
//! This crate is meant for development and testing only.
//!
//! # Key Types
//!
//! ## `TestFuture<T>`
//!
//! A hand-driven source: subscribers are recorded, the test decides when and how
//! the pledge completes.
//!
//! ```rust
//! use pledge_test_utils::{TestFuture, TestObserver};
//!
//! let source = TestFuture::new();
//! let observer = TestObserver::new();
//! source.pledge().subscribe(observer.clone());
//! assert_eq!(source.observer_count(), 1);
//!
//! source.set_result(42);
//!
//! assert_eq!(observer.values(), vec![42]);
//! assert_eq!(source.observer_count(), 0);
//! ```
//!
//! ## `VirtualScheduler`
//!
//! A scheduler driven by a virtual clock, so delays and retries run
//! deterministically and instantly:
//!
//! ```rust
//! use pledge_runtime::Scheduler;
//! use pledge_test_utils::VirtualScheduler;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = VirtualScheduler::new();
//! let ran = Arc::new(AtomicBool::new(false));
//! let ran_clone = ran.clone();
//! scheduler.schedule_after(
//!     Duration::from_millis(10),
//!     Box::new(move || ran_clone.store(true, Ordering::SeqCst)),
//! );
//!
//! scheduler.advance_by(Duration::from_millis(9));
//! assert!(!ran.load(Ordering::SeqCst));
//! scheduler.advance_by(Duration::from_millis(1));
//! assert!(ran.load(Ordering::SeqCst));
//! ```
//!
//! # Module Organization
//!
//! - `test_future` - `TestFuture<T>` controllable source
//! - `test_observer` - `TestObserver<T>` recording observer
//! - `virtual_scheduler` - `VirtualScheduler` virtual-time scheduler
//! - `test_errors` - typed error fixtures
//! - `helpers` - assertion and channel helpers

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod test_errors;
pub mod test_future;
pub mod test_observer;
pub mod virtual_scheduler;

pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, pledge_channel, record, unwrap_stream,
};
pub use test_errors::{argument_error, invalid_operation, ArgumentError, InvalidOperation};
pub use test_future::TestFuture;
pub use test_observer::TestObserver;
pub use virtual_scheduler::VirtualScheduler;
