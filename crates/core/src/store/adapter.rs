//! Demo store trait
//!
//! Defines the operation surface shared by the local and remote stores.
//! Presentation code depends only on this trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::demo::{CommentPriority, CommentStatus, Demo, DemoUpdate, NewDemo};
use crate::export::ImportReport;
use crate::Result;

/// Store interface for the demo collection
///
/// Mutations that target a demo or comment id that no longer exists are
/// silent no-ops, never errors; callers routinely race against deletions
/// made from another view. Remote-side failures are recorded in
/// [`error`](DemoStore::error) and leave the collection untouched.
#[async_trait]
pub trait DemoStore: Send + Sync {
    /// Snapshot of the current collection
    async fn demos(&self) -> Vec<Demo>;

    /// True while the initial load (or a refresh) is in flight
    async fn loading(&self) -> bool;

    /// Last backend failure, if any
    async fn error(&self) -> Option<String>;

    /// Get a single demo by id
    async fn get_demo(&self, id: Uuid) -> Option<Demo>;

    /// Create a demo; returns `None` if the backing store rejected it
    async fn add_demo(&self, input: NewDemo) -> Option<Demo>;

    /// Apply a partial update to a demo
    async fn update_demo(&self, id: Uuid, updates: DemoUpdate);

    /// Delete a demo and all of its comments
    async fn delete_demo(&self, id: Uuid);

    /// Append a comment to a demo
    async fn add_comment(&self, demo_id: Uuid, text: &str);

    /// Delete a comment from a demo
    async fn delete_comment(&self, demo_id: Uuid, comment_id: Uuid);

    /// Flip a comment's completed flag
    async fn toggle_comment_complete(&self, demo_id: Uuid, comment_id: Uuid);

    /// Set a comment's priority
    async fn set_comment_priority(
        &self,
        demo_id: Uuid,
        comment_id: Uuid,
        priority: CommentPriority,
    );

    /// Set a comment's workflow status
    async fn set_comment_status(&self, demo_id: Uuid, comment_id: Uuid, status: CommentStatus);

    /// Serialize the whole collection to an export document
    async fn export(&self) -> Result<String>;

    /// Re-create the demos in an export document through this store
    ///
    /// Best effort: a malformed document aborts before any write; a
    /// single demo failing to insert is skipped and the rest continue.
    async fn import(&self, document: &str) -> Result<ImportReport>;
}
