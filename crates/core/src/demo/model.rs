//! Demo and comment model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentPriority {
    Low,
    Mid,
    High,
}

impl Default for CommentPriority {
    fn default() -> Self {
        Self::Mid
    }
}

impl CommentPriority {
    /// Ordering rank for the task view: High sorts before Mid before Low
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Mid => 1,
            Self::Low => 2,
        }
    }
}

/// Comment workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Review,
    Approved,
}

impl Default for CommentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A unit-of-work note attached to a demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub priority: CommentPriority,
    pub status: CommentStatus,
}

impl Comment {
    /// Create a new comment with default priority and status
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: Utc::now(),
            completed: false,
            priority: CommentPriority::default(),
            status: CommentStatus::default(),
        }
    }
}

/// A tracked demo with descriptive metadata and an attached comment list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demo {
    pub id: Uuid,
    pub name: String,
    pub client: String,
    pub demo_url: String,
    /// Empty string means no thumbnail
    #[serde(default)]
    pub thumbnail_url: String,
    pub category: String,
    /// 1-5, 1 is the most urgent
    pub priority: u8,
    pub status: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Demo {
    /// Create a demo from its user-supplied fields, assigning id and
    /// creation time and starting with no comments
    pub fn new(input: NewDemo) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            client: input.client,
            demo_url: input.demo_url,
            thumbnail_url: input.thumbnail_url,
            category: input.category,
            priority: input.priority,
            status: input.status,
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Fields needed to create a demo; id, creation time, and the comment
/// list are assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDemo {
    pub name: String,
    pub client: String,
    pub demo_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub category: String,
    pub priority: u8,
    pub status: String,
}

impl From<&Demo> for NewDemo {
    fn from(demo: &Demo) -> Self {
        Self {
            name: demo.name.clone(),
            client: demo.client.clone(),
            demo_url: demo.demo_url.clone(),
            thumbnail_url: demo.thumbnail_url.clone(),
            category: demo.category.clone(),
            priority: demo.priority,
            status: demo.status.clone(),
        }
    }
}

/// Partial demo update; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoUpdate {
    pub name: Option<String>,
    pub client: Option<String>,
    pub demo_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub priority: Option<u8>,
    pub status: Option<String>,
}

impl DemoUpdate {
    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the client
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Set the demo URL
    pub fn with_demo_url(mut self, demo_url: impl Into<String>) -> Self {
        self.demo_url = Some(demo_url.into());
        self
    }

    /// Set the thumbnail URL (empty string clears it)
    pub fn with_thumbnail_url(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the set fields to a demo, leaving the rest alone
    pub fn apply(&self, demo: &mut Demo) {
        if let Some(name) = &self.name {
            demo.name = name.clone();
        }
        if let Some(client) = &self.client {
            demo.client = client.clone();
        }
        if let Some(demo_url) = &self.demo_url {
            demo.demo_url = demo_url.clone();
        }
        if let Some(thumbnail_url) = &self.thumbnail_url {
            demo.thumbnail_url = thumbnail_url.clone();
        }
        if let Some(category) = &self.category {
            demo.category = category.clone();
        }
        if let Some(priority) = self.priority {
            demo.priority = priority;
        }
        if let Some(status) = &self.status {
            demo.status = status.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> NewDemo {
        NewDemo {
            name: "Foo".to_string(),
            client: "Acme".to_string(),
            demo_url: "https://x".to_string(),
            thumbnail_url: String::new(),
            category: "Config".to_string(),
            priority: 2,
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_create_demo() {
        let demo = Demo::new(sample_input());
        assert_eq!(demo.name, "Foo");
        assert_eq!(demo.priority, 2);
        assert!(demo.comments.is_empty());
    }

    #[test]
    fn test_create_comment_defaults() {
        let comment = Comment::new("check colors");
        assert_eq!(comment.text, "check colors");
        assert!(!comment.completed);
        assert_eq!(comment.priority, CommentPriority::Mid);
        assert_eq!(comment.status, CommentStatus::Pending);
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(CommentPriority::High.rank() < CommentPriority::Mid.rank());
        assert!(CommentPriority::Mid.rank() < CommentPriority::Low.rank());
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut demo = Demo::new(sample_input());
        let update = DemoUpdate::default()
            .with_status("archived")
            .with_priority(5);
        update.apply(&mut demo);

        assert_eq!(demo.status, "archived");
        assert_eq!(demo.priority, 5);
        assert_eq!(demo.name, "Foo");
        assert_eq!(demo.category, "Config");
    }

    #[test]
    fn test_serde_shape_is_camel_case() {
        let demo = Demo::new(sample_input());
        let value = serde_json::to_value(&demo).unwrap();
        assert!(value.get("demoUrl").is_some());
        assert!(value.get("thumbnailUrl").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_comment_status_wire_names() {
        let status = serde_json::to_value(CommentStatus::InProgress).unwrap();
        assert_eq!(status, "In Progress");
        let back: CommentStatus = serde_json::from_value(status).unwrap();
        assert_eq!(back, CommentStatus::InProgress);
    }
}
