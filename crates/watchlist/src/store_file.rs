//! JSON file-backed watch list store with atomic writes.

use std::path::{Path, PathBuf};

use {
    async_trait::async_trait,
    livewatch_common::ChannelId,
    tokio::fs,
    tracing::{debug, info},
};

use crate::{
    Result,
    error::Context,
    list::WatchList,
    store::WatchListStore,
};

/// File-backed store: the whole list as one JSON array of names.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Atomic write: write to temp, rename over target, keep `.bak`.
    async fn atomic_write(&self, list: &WatchList) -> Result<()> {
        self.ensure_parent().await?;
        let names = list.snapshot();
        let json = serde_json::to_string_pretty(&names)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json.as_bytes()).await?;

        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let bak = self.path.with_extension("json.bak");
            let _ = fs::copy(&self.path, &bak).await;
        }

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl WatchListStore for FileStore {
    async fn load(&self) -> Result<WatchList> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            info!(path = %self.path.display(), "watch list file missing, creating it");
            self.atomic_write(&WatchList::new()).await?;
            return Ok(WatchList::new());
        }
        let data = fs::read_to_string(&self.path).await?;
        let names: Vec<ChannelId> = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        let list: WatchList = names.into_iter().collect();
        debug!(path = %self.path.display(), count = list.len(), "loaded watch list");
        Ok(list)
    }

    async fn save(&self, list: &WatchList) -> Result<()> {
        self.atomic_write(list).await?;
        debug!(path = %self.path.display(), count = list.len(), "saved watch list");
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    fn id(raw: &str) -> ChannelId {
        ChannelId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_created_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("streamers.json");
        let store = FileStore::new(&path);

        let list = store.load().await.unwrap();
        assert!(list.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("streamers.json"));

        let list: WatchList = [id("bob"), id("alice")].into_iter().collect();
        store.save(&list).await.unwrap();

        assert_eq!(store.load().await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_reads_legacy_mixed_case_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("streamers.json");
        std::fs::write(&path, r#"["Alice","alice","Bob"]"#).unwrap();

        let list = FileStore::new(&path).load().await.unwrap();
        assert_eq!(list.snapshot(), vec![id("alice"), id("bob")]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("streamers.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStore::new(&path).load().await.unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn test_backup_created() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("streamers.json"));

        store.save(&[id("a")].into_iter().collect()).await.unwrap();
        store.save(&[id("a"), id("b")].into_iter().collect()).await.unwrap();

        let bak = std::fs::read_to_string(tmp.path().join("streamers.json.bak")).unwrap();
        let names: Vec<String> = serde_json::from_str(&bak).unwrap();
        assert_eq!(names, vec!["a"]);
    }

    #[tokio::test]
    async fn test_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("data").join("streamers.json"));
        store.save(&[id("a")].into_iter().collect()).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
