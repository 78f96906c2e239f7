//! Local file-backed demo store
//!
//! The whole collection lives under one fixed key: a single JSON document
//! on disk. Loading never writes; every mutation rewrites the document.

use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use async_trait::async_trait;

use super::adapter::DemoStore;
use crate::demo::{Comment, CommentPriority, CommentStatus, Demo, DemoUpdate, NewDemo};
use crate::export::{export_json, parse_import, ImportReport};
use crate::Result;

/// File name of the persisted collection
pub const STORAGE_FILE: &str = "demo-tracker-demos.json";

/// Demo store backed by a local JSON file
///
/// Ids and creation times are assigned locally. The store fails open: a
/// missing or unparsable document is logged and treated as an empty
/// collection, and a failed write leaves the in-memory collection as the
/// working copy until the next mutation retries the write.
pub struct LocalDemoStore {
    path: PathBuf,
    demos: RwLock<Vec<Demo>>,
}

impl LocalDemoStore {
    /// Open the store at the given document path
    pub async fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let demos = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(demos) => demos,
                Err(e) => {
                    warn!("discarding unparsable demo document {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("failed to read demo document {}: {}", path.display(), e);
                Vec::new()
            }
        };

        Self {
            path,
            demos: RwLock::new(demos),
        }
    }

    /// Open the store under a data directory, using the fixed file name
    pub async fn open_in(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORAGE_FILE)).await
    }

    /// Rewrite the whole document; failures are logged diagnostics only
    async fn persist(&self) {
        let demos = self.demos.read().await;
        let content = match serde_json::to_string_pretty(&*demos) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to serialize demo document: {}", e);
                return;
            }
        };
        drop(demos);

        if let Some(parent) = self.path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("failed to create data directory {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = tokio::fs::write(&self.path, content).await {
            warn!("failed to write demo document {}: {}", self.path.display(), e);
        }
    }

    /// Mutate one comment in place; absent ids are a silent no-op
    async fn with_comment(&self, demo_id: Uuid, comment_id: Uuid, f: impl FnOnce(&mut Comment)) {
        let changed = {
            let mut demos = self.demos.write().await;
            demos
                .iter_mut()
                .find(|d| d.id == demo_id)
                .and_then(|d| d.comments.iter_mut().find(|c| c.id == comment_id))
                .map(f)
                .is_some()
        };
        if changed {
            self.persist().await;
        }
    }
}

#[async_trait]
impl DemoStore for LocalDemoStore {
    async fn demos(&self) -> Vec<Demo> {
        self.demos.read().await.clone()
    }

    async fn loading(&self) -> bool {
        false
    }

    async fn error(&self) -> Option<String> {
        None
    }

    async fn get_demo(&self, id: Uuid) -> Option<Demo> {
        self.demos.read().await.iter().find(|d| d.id == id).cloned()
    }

    async fn add_demo(&self, input: NewDemo) -> Option<Demo> {
        let demo = Demo::new(input);
        self.demos.write().await.push(demo.clone());
        self.persist().await;
        Some(demo)
    }

    async fn update_demo(&self, id: Uuid, updates: DemoUpdate) {
        let changed = {
            let mut demos = self.demos.write().await;
            demos
                .iter_mut()
                .find(|d| d.id == id)
                .map(|d| updates.apply(d))
                .is_some()
        };
        if changed {
            self.persist().await;
        }
    }

    async fn delete_demo(&self, id: Uuid) {
        let removed = {
            let mut demos = self.demos.write().await;
            let before = demos.len();
            demos.retain(|d| d.id != id);
            demos.len() != before
        };
        if removed {
            self.persist().await;
        }
    }

    async fn add_comment(&self, demo_id: Uuid, text: &str) {
        let added = {
            let mut demos = self.demos.write().await;
            demos
                .iter_mut()
                .find(|d| d.id == demo_id)
                .map(|d| d.comments.push(Comment::new(text)))
                .is_some()
        };
        if added {
            self.persist().await;
        }
    }

    async fn delete_comment(&self, demo_id: Uuid, comment_id: Uuid) {
        let removed = {
            let mut demos = self.demos.write().await;
            match demos.iter_mut().find(|d| d.id == demo_id) {
                Some(demo) => {
                    let before = demo.comments.len();
                    demo.comments.retain(|c| c.id != comment_id);
                    demo.comments.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.persist().await;
        }
    }

    async fn toggle_comment_complete(&self, demo_id: Uuid, comment_id: Uuid) {
        self.with_comment(demo_id, comment_id, |c| c.completed = !c.completed)
            .await;
    }

    async fn set_comment_priority(
        &self,
        demo_id: Uuid,
        comment_id: Uuid,
        priority: CommentPriority,
    ) {
        self.with_comment(demo_id, comment_id, |c| c.priority = priority)
            .await;
    }

    async fn set_comment_status(&self, demo_id: Uuid, comment_id: Uuid, status: CommentStatus) {
        self.with_comment(demo_id, comment_id, |c| c.status = status)
            .await;
    }

    async fn export(&self) -> Result<String> {
        let demos = self.demos.read().await;
        export_json(&demos)
    }

    async fn import(&self, document: &str) -> Result<ImportReport> {
        let entries = parse_import(document)?;
        let imported = entries.len();
        {
            let mut demos = self.demos.write().await;
            for entry in entries {
                // Imports always create new records; only ids are
                // reassigned, everything else round-trips
                let mut demo = entry;
                demo.id = Uuid::new_v4();
                for comment in &mut demo.comments {
                    comment.id = Uuid::new_v4();
                }
                demos.push(demo);
            }
        }
        self.persist().await;
        Ok(ImportReport {
            imported,
            skipped: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_input(name: &str) -> NewDemo {
        NewDemo {
            name: name.to_string(),
            client: "Acme".to_string(),
            demo_url: "https://x".to_string(),
            thumbnail_url: String::new(),
            category: "Config".to_string(),
            priority: 2,
            status: "active".to_string(),
        }
    }

    async fn create_test_store() -> (LocalDemoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDemoStore::open_in(temp_dir.path()).await;
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_starts_empty_without_document() {
        let (store, _temp) = create_test_store().await;
        assert!(store.demos().await.is_empty());
        assert!(!store.loading().await);
        assert!(store.error().await.is_none());
    }

    #[tokio::test]
    async fn test_unparsable_document_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(STORAGE_FILE);
        tokio::fs::write(&path, "{ not json ]").await.unwrap();

        let store = LocalDemoStore::new(&path).await;
        assert!(store.demos().await.is_empty());

        // Loading must not rewrite the document
        let on_disk = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(on_disk, "{ not json ]");
    }

    #[tokio::test]
    async fn test_add_demo_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let id = {
            let store = LocalDemoStore::open_in(temp_dir.path()).await;
            store.add_demo(sample_input("Foo")).await.unwrap().id
        };

        let store = LocalDemoStore::open_in(temp_dir.path()).await;
        let demo = store.get_demo(id).await.unwrap();
        assert_eq!(demo.name, "Foo");
        assert!(demo.comments.is_empty());
    }

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let (store, _temp) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();

        store.add_comment(demo.id, "check colors").await;
        let comment = store.get_demo(demo.id).await.unwrap().comments[0].clone();
        assert_eq!(comment.text, "check colors");
        assert_eq!(comment.priority, CommentPriority::Mid);
        assert_eq!(comment.status, CommentStatus::Pending);
        assert!(!comment.completed);

        store.toggle_comment_complete(demo.id, comment.id).await;
        assert!(store.get_demo(demo.id).await.unwrap().comments[0].completed);

        store
            .set_comment_priority(demo.id, comment.id, CommentPriority::High)
            .await;
        store
            .set_comment_status(demo.id, comment.id, CommentStatus::Review)
            .await;
        let comment = store.get_demo(demo.id).await.unwrap().comments[0].clone();
        assert_eq!(comment.priority, CommentPriority::High);
        assert_eq!(comment.status, CommentStatus::Review);

        store.delete_comment(demo.id, comment.id).await;
        assert!(store.get_demo(demo.id).await.unwrap().comments.is_empty());
    }

    #[tokio::test]
    async fn test_delete_demo_removes_its_comments() {
        let (store, _temp) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        store.add_comment(demo.id, "note").await;

        store.delete_demo(demo.id).await;
        assert!(store.demos().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_ids_are_silent_no_ops() {
        let (store, _temp) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        let ghost = Uuid::new_v4();

        store.add_comment(ghost, "nobody home").await;
        store.toggle_comment_complete(ghost, ghost).await;
        store.delete_comment(demo.id, ghost).await;
        store.update_demo(ghost, DemoUpdate::default().with_name("x")).await;
        store.delete_demo(ghost).await;

        let demos = store.demos().await;
        assert_eq!(demos.len(), 1);
        assert_eq!(demos[0].name, "Foo");
        assert!(demos[0].comments.is_empty());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (store, _temp) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();

        store
            .update_demo(demo.id, DemoUpdate::default().with_status("archived"))
            .await;

        let updated = store.get_demo(demo.id).await.unwrap();
        assert_eq!(updated.status, "archived");
        assert_eq!(updated.client, "Acme");
        assert_eq!(updated.created_at, demo.created_at);
    }

    #[tokio::test]
    async fn test_import_creates_new_records() {
        let (store, _temp) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        store.add_comment(demo.id, "note").await;
        let document = store.export().await.unwrap();

        let report = store.import(&document).await.unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 0);

        let demos = store.demos().await;
        assert_eq!(demos.len(), 2);
        assert_ne!(demos[0].id, demos[1].id);
        assert_eq!(demos[1].name, "Foo");
        assert_eq!(demos[1].comments[0].text, "note");
    }

    #[tokio::test]
    async fn test_import_malformed_document_writes_nothing() {
        let (store, _temp) = create_test_store().await;
        store.add_demo(sample_input("Foo")).await.unwrap();

        let result = store.import("[{ truncated").await;
        assert!(result.is_err());
        assert_eq!(store.demos().await.len(), 1);
    }
}
