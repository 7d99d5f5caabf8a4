//! Domain module for the board directory
//!
//! Contains the indices, the membership rules, and the persistence records.

pub mod allocator;
pub mod board;
pub mod changes;
pub mod directory;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod membership;
pub mod sessions;
pub mod snapshot;

pub use allocator::BoardIdAllocator;
pub use board::{Board, Column, NewTask, Task, TaskUpdate};
pub use changes::*;
pub use directory::{EntityDirectory, UserRemoval};
pub use entities::{BoardViews, User};
pub use errors::*;
pub use membership::MembershipCoordinator;
pub use sessions::SessionRegistry;
pub use snapshot::*;
