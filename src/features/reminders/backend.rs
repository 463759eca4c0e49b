//! Reminder document backends
//!
//! A backend stores the whole `ReminderSet` as one document. The foreground
//! assistant and the standby service share state exclusively through such a
//! backend, so every mutation goes through `update`: the document is reloaded,
//! changed and written back while no other writer can interleave. Plain
//! `replace` is atomic too: readers see either the old or the new document.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Transactional `update`, file lock for the JSON backend
//! - 1.0.0: Whole-document load and replace

use anyhow::{Context, Result};
use async_trait::async_trait;
use fs2::FileExt;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::model::ReminderSet;

/// Change applied inside `ReminderBackend::update`; returns whether the
/// document was modified and must be written back
pub type Mutation<'a> = Box<dyn FnOnce(&mut ReminderSet) -> bool + Send + 'a>;

/// Whole-document storage for reminders
#[async_trait]
pub trait ReminderBackend: Send + Sync {
    /// Read the full document. An absent document is an empty set.
    async fn load(&self) -> Result<ReminderSet>;

    /// Atomically replace the full document
    async fn replace(&self, set: &ReminderSet) -> Result<()>;

    /// Reload, mutate and write back the document as one exclusive step.
    ///
    /// An unreadable document is treated as empty. Nothing is written when
    /// the mutation reports no change. Returns the document after the mutation.
    async fn update(&self, mutation: Mutation<'_>) -> Result<ReminderSet>;
}

/// Pretty-printed JSON file replaced through a temporary sibling and rename.
/// Updates are serialised by an exclusive lock on a `.lock` sibling file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reminders".to_string())
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_file_name(format!(
            ".{}.{}.tmp",
            self.file_name(),
            uuid::Uuid::new_v4().simple()
        ))
    }

    fn lock_path(&self) -> PathBuf {
        self.path
            .with_file_name(format!(".{}.lock", self.file_name()))
    }

    async fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        Ok(())
    }

    /// Block (off the runtime) until the exclusive lock is held.
    /// The lock is released when the returned file is dropped.
    async fn lock(&self) -> Result<std::fs::File> {
        self.ensure_parent().await?;
        let lock_path = self.lock_path();

        tokio::task::spawn_blocking(move || -> Result<std::fs::File> {
            let file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(&lock_path)
                .with_context(|| format!("Failed to open {}", lock_path.display()))?;
            file.lock_exclusive()
                .with_context(|| format!("Failed to lock {}", lock_path.display()))?;
            Ok(file)
        })
        .await
        .context("Lock task failed")?
    }
}

#[async_trait]
impl ReminderBackend for JsonFileBackend {
    async fn load(&self) -> Result<ReminderSet> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Reminder file {} does not exist yet", self.path.display());
                return Ok(ReminderSet::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    async fn replace(&self, set: &ReminderSet) -> Result<()> {
        self.ensure_parent().await?;

        let mut content = serde_json::to_string_pretty(set)?;
        content.push('\n');
        let tmp_path = self.tmp_path();

        let write_result = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            match tokio::fs::rename(&tmp_path, &self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tokio::fs::remove_file(&self.path).await?;
                    tokio::fs::rename(&tmp_path, &self.path).await?;
                }
                Err(e) => return Err(e),
            }
            Ok::<(), std::io::Error>(())
        }
        .await;

        if let Err(e) = write_result {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to write {}", self.path.display()));
        }
        Ok(())
    }

    async fn update(&self, mutation: Mutation<'_>) -> Result<ReminderSet> {
        let _lock = self.lock().await?;

        let mut set = match self.load().await {
            Ok(set) => set,
            Err(e) => {
                warn!("Replacing unreadable reminder file: {e:#}");
                ReminderSet::default()
            }
        };

        if mutation(&mut set) {
            self.replace(&set).await?;
        }
        Ok(set)
    }
}

/// In-process document, for tasks sharing a store without a file
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: Mutex<ReminderSet>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(set: ReminderSet) -> Self {
        Self {
            document: Mutex::new(set),
        }
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> ReminderSet {
        self.document.lock().await.clone()
    }
}

#[async_trait]
impl ReminderBackend for MemoryBackend {
    async fn load(&self) -> Result<ReminderSet> {
        Ok(self.document.lock().await.clone())
    }

    async fn replace(&self, set: &ReminderSet) -> Result<()> {
        *self.document.lock().await = set.clone();
        Ok(())
    }

    async fn update(&self, mutation: Mutation<'_>) -> Result<ReminderSet> {
        let mut document = self.document.lock().await;
        let mut set = document.clone();
        if mutation(&mut set) {
            *document = set.clone();
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::model::Reminder;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample_set() -> ReminderSet {
        ReminderSet {
            reminders: vec![Reminder {
                id: 17,
                due: 1_700_000_000,
                text: "купить молоко".to_string(),
                done: false,
            }],
        }
    }

    fn push(text: &str) -> Mutation<'_> {
        Box::new(move |set: &mut ReminderSet| {
            let id = set.len() as i64;
            set.reminders.push(Reminder {
                id,
                due: 0,
                text: text.to_string(),
                done: false,
            });
            true
        })
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("reminders.json"));
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_then_load() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested/reminders.json"));

        backend.replace(&sample_set()).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), sample_set());

        // Readable text, non-ASCII kept as-is, no temp files left behind
        let raw = std::fs::read_to_string(backend.path()).unwrap();
        assert!(raw.contains("\"reminders\""));
        assert!(raw.contains("купить молоко"));
        let leftovers = std::fs::read_dir(dir.path().join("nested")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(&path, "{\"reminders\": [").unwrap();

        let backend = JsonFileBackend::new(path);
        assert!(backend.load().await.is_err());
    }

    #[tokio::test]
    async fn test_replace_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let backend = JsonFileBackend::new(blocker.join("reminders.json"));
        assert!(backend.replace(&sample_set()).await.is_err());
        assert!(backend.update(push("lost")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_without_change_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reminders.json");
        let backend = JsonFileBackend::new(&path);

        let set = backend.update(Box::new(|_: &mut ReminderSet| false)).await.unwrap();
        assert!(set.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_update_recovers_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(&path, "garbage").unwrap();

        let backend = JsonFileBackend::new(&path);
        let set = backend.update(push("fresh")).await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(backend.load().await.unwrap(), set);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_file_updates_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reminders.json");

        let mut tasks = Vec::new();
        for i in 0..16 {
            // Separate backends stand in for separate processes
            let backend = JsonFileBackend::new(&path);
            tasks.push(tokio::spawn(async move {
                let text = format!("task {i}");
                backend.update(push(&text)).await.map(|_| ())
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let set = JsonFileBackend::new(&path).load().await.unwrap();
        assert_eq!(set.len(), 16);
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let backend = Arc::new(MemoryBackend::new());
        assert!(backend.load().await.unwrap().is_empty());

        backend.replace(&sample_set()).await.unwrap();
        assert_eq!(backend.snapshot().await, sample_set());

        let set = backend.update(push("second")).await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(backend.snapshot().await, set);

        backend
            .update(Box::new(|set: &mut ReminderSet| {
                set.reminders.clear();
                false
            }))
            .await
            .unwrap();
        assert_eq!(backend.snapshot().await.len(), 2);
    }
}
