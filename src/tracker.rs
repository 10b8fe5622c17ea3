// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use tokio::sync::Notify;

/// The number of fetch groups dispatched at startup: the availables page and
/// the saved-deck restore.
pub const FETCH_GROUPS: usize = 2;

/// Tracks outstanding catalog requests so the loading screen knows when it
/// can go away.
///
/// Loading is complete once every fetch group has been dispatched and no
/// fetch is in flight. For that condition to be stable, a fetch must be
/// registered (via [`LoadTracker::begin_fetch`]) before its group is marked
/// as started, or while the caller still holds another [`FetchGuard`].
#[derive(Debug, Default)]
pub struct LoadTracker {
    groups_started: AtomicUsize,
    active_fetches: AtomicUsize,
    notify: Notify,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a fetch group has been dispatched.
    pub fn group_started(&self) {
        let n = self.groups_started.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Fetch group started ({n}/{FETCH_GROUPS}).");
        self.notify.notify_waiters();
    }

    /// Register an in-flight fetch. The fetch counts as active until the
    /// returned guard is dropped, whether it succeeded or not.
    pub fn begin_fetch(self: &Arc<Self>) -> FetchGuard {
        self.active_fetches.fetch_add(1, Ordering::SeqCst);
        FetchGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn groups_started(&self) -> usize {
        self.groups_started.load(Ordering::SeqCst)
    }

    pub fn active_fetches(&self) -> usize {
        self.active_fetches.load(Ordering::SeqCst)
    }

    pub fn is_loaded(&self) -> bool {
        self.groups_started() >= FETCH_GROUPS && self.active_fetches() == 0
    }

    /// Resolves once [`LoadTracker::is_loaded`] holds.
    pub async fn wait_until_loaded(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a wakeup between the
            // check and the await is not lost.
            notified.as_mut().enable();
            if self.is_loaded() {
                return;
            }
            notified.await;
        }
    }

    fn end_fetch(&self) {
        self.active_fetches.fetch_sub(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

/// Marks one fetch as in flight for as long as it lives.
#[derive(Debug)]
pub struct FetchGuard {
    tracker: Arc<LoadTracker>,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.tracker.end_fetch();
    }
}
