//! In-memory backend
//!
//! Implements [`DemoBackend`] against plain vectors. Used as the
//! substitution target in tests; the offline switch simulates a backend
//! that rejects every request.

use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;

use super::backend::{
    CommentChanges, CommentRow, DemoBackend, DemoChanges, DemoRow, NewCommentRow, NewDemoRow,
};
use crate::error::Error;
use crate::Result;

/// Backend holding its two tables in memory
#[derive(Default)]
pub struct MemoryBackend {
    demos: RwLock<Vec<DemoRow>>,
    comments: RwLock<Vec<CommentRow>>,
    offline: AtomicBool,
    seq: AtomicI64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline, every request fails with a backend error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Backend("backend offline".to_string()));
        }
        Ok(())
    }

    // Monotonic timestamps so rows created in the same instant still
    // have a stable creation order
    fn next_created_at(&self) -> chrono::DateTime<Utc> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        Utc::now() + Duration::nanoseconds(seq)
    }
}

#[async_trait]
impl DemoBackend for MemoryBackend {
    async fn fetch_demos(&self) -> Result<Vec<DemoRow>> {
        self.check_online()?;
        let mut rows = self.demos.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn fetch_comments(&self) -> Result<Vec<CommentRow>> {
        self.check_online()?;
        let mut rows = self.comments.read().await.clone();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn insert_demo(&self, row: NewDemoRow) -> Result<DemoRow> {
        self.check_online()?;
        let created = DemoRow {
            id: Uuid::new_v4(),
            name: row.name,
            client: row.client,
            demo_url: row.demo_url,
            thumbnail_url: row.thumbnail_url,
            category: row.category,
            priority: row.priority,
            status: row.status,
            created_at: self.next_created_at(),
        };
        self.demos.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_demo(&self, id: Uuid, changes: DemoChanges) -> Result<()> {
        self.check_online()?;
        let mut demos = self.demos.write().await;
        if let Some(row) = demos.iter_mut().find(|d| d.id == id) {
            if let Some(name) = changes.name {
                row.name = name;
            }
            if let Some(client) = changes.client {
                row.client = client;
            }
            if let Some(demo_url) = changes.demo_url {
                row.demo_url = demo_url;
            }
            if let Some(thumbnail_url) = changes.thumbnail_url {
                row.thumbnail_url = thumbnail_url;
            }
            if let Some(category) = changes.category {
                row.category = category;
            }
            if let Some(priority) = changes.priority {
                row.priority = priority;
            }
            if let Some(status) = changes.status {
                row.status = status;
            }
        }
        Ok(())
    }

    async fn delete_demo(&self, id: Uuid) -> Result<()> {
        self.check_online()?;
        self.comments.write().await.retain(|c| c.demo_id != id);
        self.demos.write().await.retain(|d| d.id != id);
        Ok(())
    }

    async fn insert_comment(&self, row: NewCommentRow) -> Result<CommentRow> {
        self.check_online()?;
        let created = CommentRow {
            id: Uuid::new_v4(),
            demo_id: row.demo_id,
            text: row.text,
            completed: row.completed,
            priority: row.priority,
            status: row.status,
            created_at: self.next_created_at(),
        };
        self.comments.write().await.push(created.clone());
        Ok(created)
    }

    async fn insert_comments(&self, rows: Vec<NewCommentRow>) -> Result<()> {
        for row in rows {
            self.insert_comment(row).await?;
        }
        Ok(())
    }

    async fn update_comment(&self, id: Uuid, changes: CommentChanges) -> Result<()> {
        self.check_online()?;
        let mut comments = self.comments.write().await;
        if let Some(row) = comments.iter_mut().find(|c| c.id == id) {
            if let Some(completed) = changes.completed {
                row.completed = completed;
            }
            if let Some(priority) = changes.priority {
                row.priority = priority;
            }
            if let Some(status) = changes.status {
                row.status = status;
            }
        }
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        self.check_online()?;
        self.comments.write().await.retain(|c| c.id != id);
        Ok(())
    }
}
