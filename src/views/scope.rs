//! View-scoped state
//!
//! State owned by a mounted view. Updates are published to subscribers and
//! stop being applied once the view is disposed, so a request that
//! completes after teardown cannot touch the state it was started for.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

pub(crate) struct ViewState<S> {
    tx: watch::Sender<S>,
    alive: AtomicBool,
}

impl<S: Clone> ViewState<S> {
    pub(crate) fn new(initial: S) -> Arc<Self> {
        let (tx, _rx) = watch::channel(initial);
        Arc::new(Self {
            tx,
            alive: AtomicBool::new(true),
        })
    }

    /// Apply `f` and notify subscribers; returns false once disposed
    pub(crate) fn update(&self, f: impl FnOnce(&mut S)) -> bool {
        // The liveness check runs under the channel lock, which also
        // serializes it with `dispose`
        self.tx.send_if_modified(|state| {
            if !self.alive.load(Ordering::Acquire) {
                return false;
            }
            f(state);
            true
        })
    }

    pub(crate) fn get(&self) -> S {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub(crate) fn dispose(&self) {
        self.tx.send_if_modified(|_| {
            self.alive.store(false, Ordering::Release);
            false
        });
    }
}
