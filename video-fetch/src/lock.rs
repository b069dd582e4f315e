use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serialises video fetch and upload across the whole process.
///
/// Clones share the same underlying mutex.
#[derive(Debug, Clone, Default)]
pub struct VideoUploadLock {
    inner: Arc<Mutex<()>>,
}

/// Held for the duration of one fetch plus upload.
#[derive(Debug)]
pub struct VideoUploadGuard {
    _guard: OwnedMutexGuard<()>,
}

impl VideoUploadLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> VideoUploadGuard {
        VideoUploadGuard {
            _guard: Arc::clone(&self.inner).lock_owned().await,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}
