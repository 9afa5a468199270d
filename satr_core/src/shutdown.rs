//! Process-wide shutdown signalling.
//!
//! The mux loop polls a single flag once per block; the CLI's signal handler
//! (registered via `ctrlc`) only ever stores into it. No allocation, no
//! locking, no access to modulator state from the handler side.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheap, cloneable handle around the shutdown flag.
///
/// Clones share the same underlying flag: calling [`ShutdownFlag::request`]
/// on any clone is visible to every other clone and to [`ShutdownFlag::requested`].
#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Request shutdown. Safe to call from a signal handler.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been requested.
    pub fn requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
