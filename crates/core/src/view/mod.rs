//! Derived view projections
//!
//! Pure functions over the demo collection; nothing here mutates or
//! caches, every call recomputes from the snapshot it is given.

mod kanban;
mod list;
mod tasks;

pub use kanban::*;
pub use list::*;
pub use tasks::*;
