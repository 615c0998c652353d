//! Process-wide "page is closing" notification.

use std::sync::OnceLock;

use tokio::sync::broadcast;

const UNLOAD_CHANNEL_CAPACITY: usize = 4;

/// Broadcast fired once the host is about to go away.
///
/// Sessions register on it only after the vendor SDK is ready, and finalize
/// tracking best effort when it fires.
#[derive(Debug, Clone)]
pub struct UnloadSignal {
    tx: broadcast::Sender<()>,
}

impl UnloadSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(UNLOAD_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Signal shared by every session that was not given its own.
    pub fn global() -> &'static UnloadSignal {
        static GLOBAL: OnceLock<UnloadSignal> = OnceLock::new();
        GLOBAL.get_or_init(UnloadSignal::new)
    }

    /// Notifies every listener; returns how many were registered.
    pub fn fire(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for UnloadSignal {
    fn default() -> Self {
        Self::new()
    }
}
