//! # Board Directory Test Suite
//!
//! Cross-crate scenarios that exercise the workspace as a whole.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs          # Shared builders (services, users, tasks)
//! └── integration/
//!     ├── keys.rs          # shared-types keys inside the AVL index
//!     ├── scenarios.rs     # end-to-end directory behaviour
//!     ├── cascades.rs      # user / board removal cascades
//!     ├── persistence.rs   # JSON mirror round trips and reload recovery
//!     └── concurrency.rs   # concurrent writers and readers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p kb-tests
//! cargo test -p kb-tests integration::persistence::
//! ```

pub mod fixtures;
pub mod integration;
