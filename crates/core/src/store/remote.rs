//! Remote-backed demo store
//!
//! Mirrors the relational backend in memory. Every mutation issues exactly
//! one backend request; only on confirmed success is the mirror updated,
//! so a failed request leaves the previous collection intact. Failures
//! are recorded in the error flag instead of being returned, and nothing
//! is retried.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};
use uuid::Uuid;

use async_trait::async_trait;

use super::adapter::DemoStore;
use super::backend::{
    join_rows, CommentChanges, DemoBackend, DemoChanges, NewCommentRow, NewDemoRow,
};
use crate::demo::{Comment, CommentPriority, CommentStatus, Demo, DemoUpdate, NewDemo};
use crate::error::Error;
use crate::export::{export_json, parse_import, ImportReport};
use crate::Result;

/// Demo store mirroring a remote relational backend
pub struct RemoteDemoStore {
    backend: Arc<dyn DemoBackend>,
    demos: RwLock<Vec<Demo>>,
    loading: RwLock<bool>,
    error: RwLock<Option<String>>,
}

impl RemoteDemoStore {
    /// Connect to the backend and load the full collection
    pub async fn new(backend: Arc<dyn DemoBackend>) -> Self {
        let store = Self {
            backend,
            demos: RwLock::new(Vec::new()),
            loading: RwLock::new(true),
            error: RwLock::new(None),
        };
        store.refresh().await;
        store
    }

    /// Re-fetch everything from the backend
    ///
    /// Two requests: demos newest-first, comments oldest-first, joined by
    /// foreign key in memory. On failure the previous mirror is kept.
    pub async fn refresh(&self) {
        *self.loading.write().await = true;
        *self.error.write().await = None;
        match self.fetch_all().await {
            Ok(demos) => *self.demos.write().await = demos,
            Err(e) => self.record_error("failed to fetch demos", &e).await,
        }
        *self.loading.write().await = false;
    }

    async fn fetch_all(&self) -> Result<Vec<Demo>> {
        let demo_rows = self.backend.fetch_demos().await?;
        let comment_rows = self.backend.fetch_comments().await?;
        Ok(join_rows(demo_rows, comment_rows))
    }

    async fn record_error(&self, context: &str, err: &Error) {
        error!("{}: {}", context, err);
        *self.error.write().await = Some(format!("{}: {}", context, err));
    }

    /// Look up a comment id under a demo in the mirror
    async fn find_comment(&self, demo_id: Uuid, comment_id: Uuid) -> Option<Comment> {
        let demos = self.demos.read().await;
        demos
            .iter()
            .find(|d| d.id == demo_id)?
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .cloned()
    }

    async fn contains_demo(&self, id: Uuid) -> bool {
        self.demos.read().await.iter().any(|d| d.id == id)
    }

    /// Apply a confirmed comment change to the mirror
    async fn patch_comment(&self, demo_id: Uuid, comment_id: Uuid, f: impl FnOnce(&mut Comment)) {
        let mut demos = self.demos.write().await;
        if let Some(comment) = demos
            .iter_mut()
            .find(|d| d.id == demo_id)
            .and_then(|d| d.comments.iter_mut().find(|c| c.id == comment_id))
        {
            f(comment);
        }
    }
}

#[async_trait]
impl DemoStore for RemoteDemoStore {
    async fn demos(&self) -> Vec<Demo> {
        self.demos.read().await.clone()
    }

    async fn loading(&self) -> bool {
        *self.loading.read().await
    }

    async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    async fn get_demo(&self, id: Uuid) -> Option<Demo> {
        self.demos.read().await.iter().find(|d| d.id == id).cloned()
    }

    async fn add_demo(&self, input: NewDemo) -> Option<Demo> {
        match self.backend.insert_demo(NewDemoRow::from(input)).await {
            Ok(row) => {
                let demo = row.into_demo(Vec::new());
                // Mirror keeps the backend's newest-first order
                self.demos.write().await.insert(0, demo.clone());
                Some(demo)
            }
            Err(e) => {
                self.record_error("failed to add demo", &e).await;
                None
            }
        }
    }

    async fn update_demo(&self, id: Uuid, updates: DemoUpdate) {
        if !self.contains_demo(id).await {
            return;
        }
        match self.backend.update_demo(id, DemoChanges::from(&updates)).await {
            Ok(()) => {
                let mut demos = self.demos.write().await;
                if let Some(demo) = demos.iter_mut().find(|d| d.id == id) {
                    updates.apply(demo);
                }
            }
            Err(e) => self.record_error("failed to update demo", &e).await,
        }
    }

    async fn delete_demo(&self, id: Uuid) {
        if !self.contains_demo(id).await {
            return;
        }
        match self.backend.delete_demo(id).await {
            Ok(()) => self.demos.write().await.retain(|d| d.id != id),
            Err(e) => self.record_error("failed to delete demo", &e).await,
        }
    }

    async fn add_comment(&self, demo_id: Uuid, text: &str) {
        if !self.contains_demo(demo_id).await {
            return;
        }
        match self
            .backend
            .insert_comment(NewCommentRow::new(demo_id, text))
            .await
        {
            Ok(row) => {
                let mut demos = self.demos.write().await;
                if let Some(demo) = demos.iter_mut().find(|d| d.id == demo_id) {
                    demo.comments.push(row.into());
                }
            }
            Err(e) => self.record_error("failed to add comment", &e).await,
        }
    }

    async fn delete_comment(&self, demo_id: Uuid, comment_id: Uuid) {
        if self.find_comment(demo_id, comment_id).await.is_none() {
            return;
        }
        match self.backend.delete_comment(comment_id).await {
            Ok(()) => {
                let mut demos = self.demos.write().await;
                if let Some(demo) = demos.iter_mut().find(|d| d.id == demo_id) {
                    demo.comments.retain(|c| c.id != comment_id);
                }
            }
            Err(e) => self.record_error("failed to delete comment", &e).await,
        }
    }

    async fn toggle_comment_complete(&self, demo_id: Uuid, comment_id: Uuid) {
        let Some(comment) = self.find_comment(demo_id, comment_id).await else {
            return;
        };
        let completed = !comment.completed;
        let changes = CommentChanges {
            completed: Some(completed),
            ..Default::default()
        };
        match self.backend.update_comment(comment_id, changes).await {
            Ok(()) => {
                self.patch_comment(demo_id, comment_id, |c| c.completed = completed)
                    .await
            }
            Err(e) => self.record_error("failed to toggle comment", &e).await,
        }
    }

    async fn set_comment_priority(
        &self,
        demo_id: Uuid,
        comment_id: Uuid,
        priority: CommentPriority,
    ) {
        if self.find_comment(demo_id, comment_id).await.is_none() {
            return;
        }
        let changes = CommentChanges {
            priority: Some(priority),
            ..Default::default()
        };
        match self.backend.update_comment(comment_id, changes).await {
            Ok(()) => {
                self.patch_comment(demo_id, comment_id, |c| c.priority = priority)
                    .await
            }
            Err(e) => self.record_error("failed to update comment priority", &e).await,
        }
    }

    async fn set_comment_status(&self, demo_id: Uuid, comment_id: Uuid, status: CommentStatus) {
        if self.find_comment(demo_id, comment_id).await.is_none() {
            return;
        }
        let changes = CommentChanges {
            status: Some(status),
            ..Default::default()
        };
        match self.backend.update_comment(comment_id, changes).await {
            Ok(()) => {
                self.patch_comment(demo_id, comment_id, |c| c.status = status)
                    .await
            }
            Err(e) => self.record_error("failed to update comment status", &e).await,
        }
    }

    async fn export(&self) -> Result<String> {
        let demos = self.demos.read().await;
        export_json(&demos)
    }

    async fn import(&self, document: &str) -> Result<ImportReport> {
        let entries = parse_import(document)?;
        let mut report = ImportReport::default();

        for entry in entries {
            let row = NewDemoRow::from(NewDemo::from(&entry));
            let created = match self.backend.insert_demo(row).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("skipping demo {:?} during import: {}", entry.name, e);
                    report.skipped += 1;
                    continue;
                }
            };

            if !entry.comments.is_empty() {
                let rows = entry
                    .comments
                    .iter()
                    .map(|c| NewCommentRow::from_comment(created.id, c))
                    .collect();
                if let Err(e) = self.backend.insert_comments(rows).await {
                    warn!("failed to import comments for {:?}: {}", entry.name, e);
                }
            }
            report.imported += 1;
        }

        // The mirror must reflect what actually landed in the backend
        self.refresh().await;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

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

    async fn create_test_store() -> (RemoteDemoStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = RemoteDemoStore::new(backend.clone()).await;
        (store, backend)
    }

    #[tokio::test]
    async fn test_initial_load_joins_comments() {
        let backend = Arc::new(MemoryBackend::new());
        let row = backend
            .insert_demo(NewDemoRow::from(sample_input("Foo")))
            .await
            .unwrap();
        backend
            .insert_comment(NewCommentRow::new(row.id, "note"))
            .await
            .unwrap();

        let store = RemoteDemoStore::new(backend).await;
        assert!(!store.loading().await);
        assert!(store.error().await.is_none());

        let demos = store.demos().await;
        assert_eq!(demos.len(), 1);
        assert_eq!(demos[0].comments.len(), 1);
        assert_eq!(demos[0].comments[0].text, "note");
    }

    #[tokio::test]
    async fn test_add_demo_prepends() {
        let (store, _backend) = create_test_store().await;
        store.add_demo(sample_input("first")).await.unwrap();
        store.add_demo(sample_input("second")).await.unwrap();

        let demos = store.demos().await;
        assert_eq!(demos[0].name, "second");
        assert_eq!(demos[1].name, "first");
    }

    #[tokio::test]
    async fn test_failed_add_records_error_and_keeps_mirror() {
        let (store, backend) = create_test_store().await;
        store.add_demo(sample_input("Foo")).await.unwrap();

        backend.set_offline(true);
        let result = store.add_demo(sample_input("Bar")).await;
        assert!(result.is_none());
        assert!(store.error().await.unwrap().contains("failed to add demo"));
        assert_eq!(store.demos().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_prior_state() {
        let (store, backend) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();

        backend.set_offline(true);
        store.delete_demo(demo.id).await;
        assert!(store.error().await.is_some());
        assert_eq!(store.demos().await.len(), 1);

        backend.set_offline(false);
        store.delete_demo(demo.id).await;
        assert!(store.demos().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_demo_cascades_in_backend() {
        let (store, backend) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        store.add_comment(demo.id, "note").await;

        store.delete_demo(demo.id).await;
        assert!(store.demos().await.is_empty());
        assert!(backend.fetch_comments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_workflow() {
        let (store, _backend) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();

        store.add_comment(demo.id, "check colors").await;
        let comment = store.get_demo(demo.id).await.unwrap().comments[0].clone();
        assert_eq!(comment.priority, CommentPriority::Mid);
        assert_eq!(comment.status, CommentStatus::Pending);

        store.toggle_comment_complete(demo.id, comment.id).await;
        store
            .set_comment_priority(demo.id, comment.id, CommentPriority::High)
            .await;
        store
            .set_comment_status(demo.id, comment.id, CommentStatus::Approved)
            .await;

        let comment = store.get_demo(demo.id).await.unwrap().comments[0].clone();
        assert!(comment.completed);
        assert_eq!(comment.priority, CommentPriority::High);
        assert_eq!(comment.status, CommentStatus::Approved);
    }

    #[tokio::test]
    async fn test_missing_ids_are_silent_no_ops() {
        let (store, backend) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        let ghost = Uuid::new_v4();

        // No request should reach the backend for unknown targets, so
        // these stay no-ops even while it is unreachable
        backend.set_offline(true);
        store.add_comment(ghost, "nobody home").await;
        store.update_demo(ghost, DemoUpdate::default().with_name("x")).await;
        store.delete_demo(ghost).await;
        store.toggle_comment_complete(demo.id, ghost).await;
        store.delete_comment(ghost, ghost).await;

        assert!(store.error().await.is_none());
        assert_eq!(store.demos().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mirror_survives_refresh() {
        let (store, _backend) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        store.add_comment(demo.id, "note").await;
        store
            .update_demo(demo.id, DemoUpdate::default().with_status("completed"))
            .await;

        store.refresh().await;
        let demos = store.demos().await;
        assert_eq!(demos.len(), 1);
        assert_eq!(demos[0].status, "completed");
        assert_eq!(demos[0].comments.len(), 1);
    }

    #[tokio::test]
    async fn test_import_round_trip() {
        let (store, _backend) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        store.add_comment(demo.id, "note").await;
        store.toggle_comment_complete(demo.id, store.get_demo(demo.id).await.unwrap().comments[0].id).await;
        let document = store.export().await.unwrap();

        let report = store.import(&document).await.unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 0);

        let demos = store.demos().await;
        assert_eq!(demos.len(), 2);
        let copy = demos.iter().find(|d| d.id != demo.id).unwrap();
        assert_eq!(copy.name, "Foo");
        assert_eq!(copy.comments.len(), 1);
        assert!(copy.comments[0].completed);
    }

    #[tokio::test]
    async fn test_import_malformed_document_aborts_before_writes() {
        let (store, backend) = create_test_store().await;
        let result = store.import("not a document").await;
        assert!(matches!(result, Err(Error::Import(_))));
        assert!(backend.fetch_demos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_skips_failing_entries() {
        let (store, backend) = create_test_store().await;
        let demo = store.add_demo(sample_input("Foo")).await.unwrap();
        let document = store.export().await.unwrap();
        store.delete_demo(demo.id).await;

        backend.set_offline(true);
        let report = store.import(&document).await.unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 1);
    }
}
