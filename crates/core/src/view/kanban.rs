//! Kanban projection: demos grouped into columns by status or category

use crate::demo::{Demo, DemoUpdate};

/// Column keys and display titles of the fixed status board
pub const STATUS_COLUMNS: [(&str, &str); 4] = [
    ("active", "Active"),
    ("pending", "Pending"),
    ("completed", "Completed"),
    ("archived", "Archived"),
];

/// How demos are bucketed into columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    /// Four fixed columns, matched case-insensitively against the status
    #[default]
    Status,
    /// One column per distinct non-empty category, first-seen order
    Category,
}

/// A named bucket of demos, sorted by priority ascending
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn {
    pub key: String,
    pub title: String,
    pub demos: Vec<Demo>,
}

/// Group the collection into kanban columns
///
/// A demo whose status or category matches no column is omitted, not an
/// error; the board only shows what it has a bucket for.
pub fn kanban_projection(demos: &[Demo], group_by: GroupBy) -> Vec<KanbanColumn> {
    let mut columns: Vec<KanbanColumn> = match group_by {
        GroupBy::Status => STATUS_COLUMNS
            .iter()
            .map(|(key, title)| KanbanColumn {
                key: key.to_string(),
                title: title.to_string(),
                demos: Vec::new(),
            })
            .collect(),
        GroupBy::Category => {
            let mut columns: Vec<KanbanColumn> = Vec::new();
            for demo in demos {
                if demo.category.is_empty() {
                    continue;
                }
                if !columns.iter().any(|c| c.key == demo.category) {
                    columns.push(KanbanColumn {
                        key: demo.category.clone(),
                        title: demo.category.clone(),
                        demos: Vec::new(),
                    });
                }
            }
            columns
        }
    };

    for demo in demos {
        let key = match group_by {
            GroupBy::Status => demo.status.to_lowercase(),
            GroupBy::Category => demo.category.clone(),
        };
        if let Some(column) = columns.iter_mut().find(|c| c.key == key) {
            column.demos.push(demo.clone());
        }
    }

    for column in &mut columns {
        column.demos.sort_by_key(|d| d.priority);
    }
    columns
}

/// The update equivalent to dropping a demo onto a column
pub fn move_update(group_by: GroupBy, column_key: &str) -> DemoUpdate {
    match group_by {
        GroupBy::Status => DemoUpdate::default().with_status(column_key),
        GroupBy::Category => DemoUpdate::default().with_category(column_key),
    }
}

/// Completed/total comment counts for a card's progress bar
///
/// `None` when the demo has no comments, so there is nothing to divide by
/// and nothing to render.
pub fn task_progress(demo: &Demo) -> Option<(usize, usize)> {
    let total = demo.comments.len();
    if total == 0 {
        return None;
    }
    let completed = demo.comments.iter().filter(|c| c.completed).count();
    Some((completed, total))
}
