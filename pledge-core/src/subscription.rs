// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Disposable handles returned by `subscribe`.
//!
//! Three shapes cover every combinator in the workspace:
//!
//! - [`Subscription`]: the cloneable handle handed back to callers.
//! - [`CompositeSubscription`]: a group disposed as a unit.
//! - [`SerialSubscription`]: a slot whose occupant is replaced as a chain moves
//!   from one stage to the next (outer pledge, inner pledge, retry timer, ...).
//!
//! Disposal is idempotent and may happen from inside an observer callback. No
//! lock is held while a member is disposed.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something that can be released.
pub trait Disposable: Send + Sync {
    /// Release the resource. Calling it more than once has no further effect.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

/// Cloneable handle to a disposable resource.
///
/// Dropping a `Subscription` does not dispose it; only [`Subscription::dispose`]
/// does. Clones share the same underlying resource.
#[derive(Clone, Default)]
pub struct Subscription {
    inner: Option<Arc<dyn Disposable>>,
}

impl Subscription {
    /// A subscription that owns nothing.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn new(disposable: impl Disposable + 'static) -> Self {
        Self {
            inner: Some(Arc::new(disposable)),
        }
    }

    /// Runs `action` the first time the subscription is disposed.
    pub fn from_fn<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(ActionDisposable {
            action: Mutex::new(Some(Box::new(action))),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn dispose(&self) {
        if let Some(inner) = &self.inner {
            inner.dispose();
        }
    }

    /// `false` for [`Subscription::empty`], which has nothing to release.
    pub fn is_disposed(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is_disposed())
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        Subscription::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        Subscription::is_disposed(self)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("empty", &self.inner.is_none())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

type Action = Box<dyn FnOnce() + Send>;

struct ActionDisposable {
    action: Mutex<Option<Action>>,
    disposed: AtomicBool,
}

impl Disposable for ActionDisposable {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let action = self.action.lock().take();
        if let Some(action) = action {
            action();
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

#[derive(Default)]
struct CompositeState {
    disposed: bool,
    members: Vec<Subscription>,
}

/// A group of subscriptions disposed together.
///
/// Adding to a group that is already disposed disposes the newcomer on the spot.
#[derive(Clone, Default)]
pub struct CompositeSubscription {
    state: Arc<Mutex<CompositeState>>,
}

impl CompositeSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, subscription: Subscription) {
        {
            let mut state = self.state.lock();
            if !state.disposed {
                state.members.push(subscription);
                return;
            }
        }
        subscription.dispose();
    }

    pub fn dispose(&self) {
        let members = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
            std::mem::take(&mut state.members)
        };
        for member in members {
            member.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Number of members currently held.
    pub fn len(&self) -> usize {
        self.state.lock().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Disposable for CompositeSubscription {
    fn dispose(&self) {
        CompositeSubscription::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        CompositeSubscription::is_disposed(self)
    }
}

impl From<CompositeSubscription> for Subscription {
    fn from(composite: CompositeSubscription) -> Self {
        Subscription::new(composite)
    }
}

impl fmt::Debug for CompositeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CompositeSubscription")
            .field("disposed", &state.disposed)
            .field("members", &state.members.len())
            .finish()
    }
}

#[derive(Default)]
struct SerialState {
    disposed: bool,
    stage: u64,
    current: Option<Subscription>,
}

/// A slot holding the subscription of the active stage of a chain.
///
/// Installing a new occupant disposes the previous one. Once the slot itself is
/// disposed every later occupant is disposed on arrival.
#[derive(Clone, Default)]
pub struct SerialSubscription {
    state: Arc<Mutex<SerialState>>,
}

impl SerialSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `subscription`, disposing whatever occupied the slot before.
    pub fn replace(&self, subscription: Subscription) {
        let previous = {
            let mut state = self.state.lock();
            if state.disposed {
                Some(subscription)
            } else {
                state.stage += 1;
                state.current.replace(subscription)
            }
        };
        if let Some(previous) = previous {
            previous.dispose();
        }
    }

    /// Starts a new stage and installs the subscription returned by `subscribe`.
    ///
    /// `subscribe` runs without the lock held and may complete synchronously,
    /// starting further stages from inside the call. The result is installed only
    /// if no later stage began in the meantime; a stale result is disposed. When
    /// the slot is already disposed `subscribe` is not called at all.
    pub fn assign_with<F>(&self, subscribe: F)
    where
        F: FnOnce() -> Subscription,
    {
        let stage = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.stage += 1;
            state.stage
        };

        let subscription = subscribe();

        let released = {
            let mut state = self.state.lock();
            if state.disposed || state.stage != stage {
                Some(subscription)
            } else {
                state.current.replace(subscription)
            }
        };
        if let Some(released) = released {
            released.dispose();
        }
    }

    pub fn dispose(&self) {
        let current = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.current.take()
        };
        if let Some(current) = current {
            current.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }
}

impl Disposable for SerialSubscription {
    fn dispose(&self) {
        SerialSubscription::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        SerialSubscription::is_disposed(self)
    }
}

impl From<SerialSubscription> for Subscription {
    fn from(serial: SerialSubscription) -> Self {
        Subscription::new(serial)
    }
}

impl fmt::Debug for SerialSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SerialSubscription")
            .field("disposed", &state.disposed)
            .field("stage", &state.stage)
            .finish()
    }
}
