// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types of the Pledge library: the subscription contract, observers,
//! disposable handles, generators and the promise cell.

#[macro_use]
mod logging;

pub mod callback;
pub mod cancellation_token;
mod generators;
pub mod notification;
pub mod observer;
pub mod pledge;
pub mod promise;
pub mod stream_item;
pub mod subscription;

pub use self::callback::catch_callback;
pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::notification::Notification;
pub use self::observer::{FutureObserver, Observer, ObserverRef};
pub use self::pledge::{FutureSource, Pledge};
pub use self::promise::Promise;
pub use self::stream_item::StreamItem;
pub use self::subscription::{
    CompositeSubscription, Disposable, SerialSubscription, Subscription,
};
pub use pledge_error::{IntoPledgeError, PledgeError, Result};
