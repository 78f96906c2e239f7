//! Task projection: every comment across every demo, as one flat list

use uuid::Uuid;

use crate::demo::{Comment, CommentPriority, CommentStatus, Demo};

/// A comment carrying a back-reference to its parent demo
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTask {
    pub demo_id: Uuid,
    pub demo_name: String,
    pub comment: Comment,
}

/// Completion facet of the task filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl CompletionFilter {
    fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

/// Task filter; facets compose by conjunction, `None` means "all"
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub completion: CompletionFilter,
    pub priority: Option<CommentPriority>,
    pub status: Option<CommentStatus>,
}

/// Flatten and filter all comments, ordered by priority rank
/// (High, Mid, Low) with newer tasks first within a rank
pub fn task_projection(demos: &[Demo], filter: &TaskFilter) -> Vec<FlatTask> {
    let mut tasks: Vec<FlatTask> = demos
        .iter()
        .flat_map(|demo| {
            demo.comments.iter().map(|comment| FlatTask {
                demo_id: demo.id,
                demo_name: demo.name.clone(),
                comment: comment.clone(),
            })
        })
        .filter(|t| filter.completion.matches(t.comment.completed))
        .filter(|t| filter.priority.map_or(true, |p| t.comment.priority == p))
        .filter(|t| filter.status.map_or(true, |s| t.comment.status == s))
        .collect();

    tasks.sort_by(|a, b| {
        a.comment
            .priority
            .rank()
            .cmp(&b.comment.priority.rank())
            .then_with(|| b.comment.created_at.cmp(&a.comment.created_at))
    });
    tasks
}

/// Header counters for the task view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Count tasks across the whole collection, ignoring filters
pub fn task_stats(demos: &[Demo]) -> TaskStats {
    let total = demos.iter().map(|d| d.comments.len()).sum();
    let completed = demos
        .iter()
        .flat_map(|d| d.comments.iter())
        .filter(|c| c.completed)
        .count();
    TaskStats {
        total,
        active: total - completed,
        completed,
    }
}
