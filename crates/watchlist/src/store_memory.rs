//! In-memory store for testing.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{Error, Result, list::WatchList, store::WatchListStore};

/// In-memory store without persistence, used by tests.
#[derive(Default)]
pub struct InMemoryStore {
    list: Mutex<WatchList>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(list: WatchList) -> Self {
        Self {
            list: Mutex::new(list),
            ..Self::default()
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self) -> WatchList {
        self.list.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl WatchListStore for InMemoryStore {
    async fn load(&self) -> Result<WatchList> {
        Ok(self.stored())
    }

    async fn save(&self, list: &WatchList) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::message("store unavailable"));
        }
        *self.list.lock().unwrap_or_else(|e| e.into_inner()) = list.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
