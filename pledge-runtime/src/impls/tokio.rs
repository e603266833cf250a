// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::scheduler::{Action, Scheduler};
use pledge_core::Subscription;
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};

/// Scheduler running every action as a task on a tokio runtime.
///
/// Delayed actions sleep on the runtime's timer first. Disposing the
/// subscription aborts the task.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime the caller is running on.
    pub fn try_current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, action: Action) -> Subscription {
        let task = self.handle.spawn(async move { action() });
        Subscription::from_fn(move || task.abort())
    }

    fn schedule_after(&self, delay: Duration, action: Action) -> Subscription {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Subscription::from_fn(move || task.abort())
    }
}
