//! Core library for Demo Tracker
//!
//! This crate contains the core business logic, including:
//! - Demo and comment entity model
//! - Persistence adapters (local file store, remote relational backend)
//! - Derived view projections (list, tasks, kanban)
//! - Import/export

pub mod demo;
pub mod error;
pub mod export;
pub mod store;
pub mod view;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
