// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pledge_core::Subscription;
use std::sync::Arc;
use std::time::Duration;

/// A unit of work handed to a scheduler.
pub type Action = Box<dyn FnOnce() + Send + 'static>;

/// Runs actions as soon as possible or after a delay.
///
/// Disposing the returned subscription before the action starts prevents it
/// from running.
pub trait Scheduler: Send + Sync + 'static {
    fn schedule(&self, action: Action) -> Subscription;

    fn schedule_after(&self, delay: Duration, action: Action) -> Subscription;
}

impl<S> Scheduler for Arc<S>
where
    S: Scheduler + ?Sized,
{
    fn schedule(&self, action: Action) -> Subscription {
        (**self).schedule(action)
    }

    fn schedule_after(&self, delay: Duration, action: Action) -> Subscription {
        (**self).schedule_after(delay, action)
    }
}
