//! Relational backend rows and query-client trait
//!
//! The backend is two flat tables, `demos` and `comments`, accessed with
//! select/insert/update/delete-by-id operations only. Joining comments to
//! their demos happens client-side, in memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::demo::{Comment, CommentPriority, CommentStatus, Demo, DemoUpdate, NewDemo};
use crate::Result;

/// A row of the `demos` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoRow {
    pub id: Uuid,
    pub name: String,
    pub client: String,
    pub demo_url: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub priority: u8,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DemoRow {
    /// Build the app-facing demo shape with its joined comments
    pub fn into_demo(self, comments: Vec<Comment>) -> Demo {
        Demo {
            id: self.id,
            name: self.name,
            client: self.client,
            demo_url: self.demo_url,
            thumbnail_url: self.thumbnail_url.unwrap_or_default(),
            category: self.category,
            priority: self.priority,
            status: self.status,
            comments,
            created_at: self.created_at,
        }
    }
}

/// A row of the `comments` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub demo_id: Uuid,
    pub text: String,
    pub completed: bool,
    pub priority: CommentPriority,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            created_at: row.created_at,
            completed: row.completed,
            priority: row.priority,
            status: row.status,
        }
    }
}

/// Insert payload for the `demos` table; id and creation time are
/// assigned by the backend
#[derive(Debug, Clone, Serialize)]
pub struct NewDemoRow {
    pub name: String,
    pub client: String,
    pub demo_url: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub priority: u8,
    pub status: String,
}

impl From<NewDemo> for NewDemoRow {
    fn from(input: NewDemo) -> Self {
        Self {
            name: input.name,
            client: input.client,
            demo_url: input.demo_url,
            // empty string means no thumbnail, stored as NULL
            thumbnail_url: Some(input.thumbnail_url).filter(|t| !t.is_empty()),
            category: input.category,
            priority: input.priority,
            status: input.status,
        }
    }
}

/// Insert payload for the `comments` table
#[derive(Debug, Clone, Serialize)]
pub struct NewCommentRow {
    pub demo_id: Uuid,
    pub text: String,
    pub completed: bool,
    pub priority: CommentPriority,
    pub status: CommentStatus,
}

impl NewCommentRow {
    /// Payload for a freshly created comment with default workflow fields
    pub fn new(demo_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            demo_id,
            text: text.into(),
            completed: false,
            priority: CommentPriority::default(),
            status: CommentStatus::default(),
        }
    }

    /// Payload re-creating an existing comment under a new parent demo
    pub fn from_comment(demo_id: Uuid, comment: &Comment) -> Self {
        Self {
            demo_id,
            text: comment.text.clone(),
            completed: comment.completed,
            priority: comment.priority,
            status: comment.status,
        }
    }
}

/// Partial update of a `demos` row; only set columns are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct DemoChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    /// `Some(None)` clears the column to NULL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<&DemoUpdate> for DemoChanges {
    fn from(updates: &DemoUpdate) -> Self {
        Self {
            name: updates.name.clone(),
            client: updates.client.clone(),
            demo_url: updates.demo_url.clone(),
            thumbnail_url: updates
                .thumbnail_url
                .clone()
                .map(|t| Some(t).filter(|t| !t.is_empty())),
            category: updates.category.clone(),
            priority: updates.priority,
            status: updates.status.clone(),
        }
    }
}

/// Partial update of a `comments` row
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<CommentPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CommentStatus>,
}

/// Query-client interface to the relational backend
///
/// Fetches return demos newest-first and comments oldest-first, so the
/// joined collection lists demos by recency while each demo keeps its
/// comments in creation order.
#[async_trait]
pub trait DemoBackend: Send + Sync {
    /// All demo rows, ordered by creation time descending
    async fn fetch_demos(&self) -> Result<Vec<DemoRow>>;

    /// All comment rows, ordered by creation time ascending
    async fn fetch_comments(&self) -> Result<Vec<CommentRow>>;

    /// Insert a demo and return the created row
    async fn insert_demo(&self, row: NewDemoRow) -> Result<DemoRow>;

    /// Update a demo row by id
    async fn update_demo(&self, id: Uuid, changes: DemoChanges) -> Result<()>;

    /// Delete a demo row and its comment rows
    async fn delete_demo(&self, id: Uuid) -> Result<()>;

    /// Insert a comment and return the created row
    async fn insert_comment(&self, row: NewCommentRow) -> Result<CommentRow>;

    /// Insert a batch of comments
    async fn insert_comments(&self, rows: Vec<NewCommentRow>) -> Result<()>;

    /// Update a comment row by id
    async fn update_comment(&self, id: Uuid, changes: CommentChanges) -> Result<()>;

    /// Delete a comment row by id
    async fn delete_comment(&self, id: Uuid) -> Result<()>;
}

/// Join comment rows to their demo rows by foreign key
///
/// Row order is preserved on both sides.
pub(crate) fn join_rows(demo_rows: Vec<DemoRow>, comment_rows: Vec<CommentRow>) -> Vec<Demo> {
    let mut by_demo: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for row in comment_rows {
        by_demo.entry(row.demo_id).or_default().push(row.into());
    }
    demo_rows
        .into_iter()
        .map(|row| {
            let comments = by_demo.remove(&row.id).unwrap_or_default();
            row.into_demo(comments)
        })
        .collect()
}
