//! Persistence adapters
//!
//! Two interchangeable demo stores behind one trait: a local file-backed
//! store and a mirror of a remote relational backend reached over a thin
//! query client.

mod adapter;
mod backend;
mod local;
mod memory;
mod remote;
mod rest;

pub use adapter::DemoStore;
pub use backend::{
    CommentChanges, CommentRow, DemoBackend, DemoChanges, DemoRow, NewCommentRow, NewDemoRow,
};
pub use local::{LocalDemoStore, STORAGE_FILE};
pub use memory::MemoryBackend;
pub use remote::RemoteDemoStore;
pub use rest::{RestBackend, RestConfig};
