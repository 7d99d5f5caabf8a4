//! # Board Directory
//!
//! In-memory indexed entity store for the Kanban backend: users keyed by
//! email, boards keyed by id, and the per-user "my boards" / "joined
//! boards" views kept coherent under every insert, remove, and transfer.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Both indices sorted and balanced | `kb-01-ordered-index` - `OrderedIndex` |
//! | INVARIANT-2 | Every id in a view exists in the board index | `domain/directory.rs` - `remove_board()` purges views |
//! | INVARIANT-3 | A board is in exactly its owner's "my boards" | `domain/directory.rs` - `add_board()`, `domain/membership.rs` - `transfer_ownership()` |
//! | INVARIANT-4 | "Joined boards" mirrors each board's member list, no duplicates | `domain/membership.rs` - `join_board()` / `leave_board()` |
//! | INVARIANT-5 | Titles unique per owner, ignoring case | `domain/membership.rs` - `add_owned_board()` |
//! | INVARIANT-6 | Board ids never handed out twice | `domain/allocator.rs` - cursor only moves forward |
//! | INVARIANT-7 | Task ids unique per board; assignees have access | `domain/board.rs` |
//! | INVARIANT-8 | No column holds more tasks than its limit | `domain/board.rs` - `set_limit()`, `check_room()` |
//!
//! All seven are checked by `domain/invariants.rs`, which the service runs
//! after rebuilding from the persistence mirror.
//!
//! ## Atomicity
//!
//! Mutations validate everything first and only then apply, so a rejected
//! call changes nothing. Cascades (removing a user or a board) collect the
//! affected references before removing any of them.
//!
//! ```text
//! validate ──ok──→ apply to indices and views ──→ ChangeSet ──→ repository
//!     │                                                            │
//!     └── error: nothing changed                 error: memory kept, Persistence returned
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! domain/directory.rs   - EntityDirectory: user and board indices, allocator
//! domain/membership.rs  - MembershipCoordinator: composite mutations, snapshots
//! domain/board.rs       - Board, Column, Task
//! domain/sessions.rs    - SessionRegistry
//! domain/changes.rs     - mirror records and ChangeSet
//! domain/invariants.rs  - cross-index checks
//! ports/inbound.rs      - DirectoryApi
//! ports/outbound.rs     - DirectoryRepository
//! adapters/             - InMemoryRepository, JsonFileRepository
//! application/service.rs - DirectoryService (RwLock + repository + metrics)
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryRepository, JsonFileRepository};
pub use application::DirectoryService;
pub use config::DirectoryConfig;
pub use domain::*;
pub use ports::{DirectoryApi, DirectoryRepository};
