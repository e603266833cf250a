// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::then::ThenExt;
use pledge_core::Pledge;

/// Extension trait collapsing a pledge of a pledge.
pub trait FlattenExt<T> {
    /// Completes with the outcome of the inner pledge once the outer one
    /// delivers it. An outer error fails the result directly.
    fn flatten(self) -> Pledge<T>;
}

impl<T: Send + 'static> FlattenExt<T> for Pledge<Pledge<T>> {
    fn flatten(self) -> Pledge<T> {
        self.and_then(Ok)
    }
}
