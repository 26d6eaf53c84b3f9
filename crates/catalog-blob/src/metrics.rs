use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct BlobStats {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    stored: AtomicU64,
    bytes: AtomicU64,
    failed: AtomicU64,
}

impl BlobStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_store(&self, size: u64) {
        self.inner.stored.fetch_add(1, Ordering::Relaxed);
        self.inner.bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.inner.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> BlobStatsSnapshot {
        BlobStatsSnapshot {
            stored: self.inner.stored.load(Ordering::Relaxed),
            bytes: self.inner.bytes.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for BlobStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("BlobStats")
            .field("stored", &snapshot.stored)
            .field("bytes", &snapshot.bytes)
            .field("failed", &snapshot.failed)
            .finish()
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlobStatsSnapshot {
    pub stored: u64,
    pub bytes: u64,
    pub failed: u64,
}
