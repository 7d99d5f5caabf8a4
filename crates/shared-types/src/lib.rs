//! # Shared Types Crate
//!
//! Identifiers and value types shared by every crate of the board directory.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: key comparison rules live here and nowhere else.
//! - **Case-Insensitive Keys**: [`Email`] and [`BoardTitle`] keep the caller's
//!   spelling for display but compare, order, and hash by their lowercase form.
//! - **Ids Are Opaque**: [`BoardId`] and [`TaskId`] are newtypes so a task id can
//!   never be passed where a board id is expected.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
