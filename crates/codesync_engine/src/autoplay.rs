use std::sync::Arc;

use tokio::sync::watch;

/// Last-write-wins "autoplay enabled" flag shared between frames.
///
/// Cloning yields another writer; [`AutoplayFlag::subscribe`] yields a reader
/// that always sees the latest value.
#[derive(Debug, Clone)]
pub struct AutoplayFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl AutoplayFlag {
    pub fn new(enabled: bool) -> Self {
        let (tx, _rx) = watch::channel(enabled);
        Self { tx: Arc::new(tx) }
    }

    pub fn set(&self, enabled: bool) {
        self.tx.send_replace(enabled);
    }

    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for AutoplayFlag {
    fn default() -> Self {
        Self::new(false)
    }
}
