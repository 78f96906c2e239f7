//! Demo module
//!
//! This module contains the demo and comment entity types.

mod model;

pub use model::*;
