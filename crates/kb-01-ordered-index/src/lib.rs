//! # Ordered Index (AVL)
//!
//! Self-balancing binary search tree used as the only lookup structure of the
//! board directory: one instance keyed by email for users, one keyed by
//! board id for boards.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | No duplicate keys | `domain/tree.rs` - `insert_at()` rejects `Equal` |
//! | INVARIANT-2 | In-order traversal ascending | `domain/tree.rs` - descent by `Ord::cmp` |
//! | INVARIANT-3 | `|height(left) - height(right)| <= 1` at every node | `domain/node.rs` - `rebalance()` |
//! | INVARIANT-4 | Cached heights match the subtree | `domain/node.rs` - `update_height()` after every relink |
//!
//! ## Rebalancing
//!
//! Every structural change is followed by a bottom-up walk over the touched
//! path. Each ancestor recomputes its height and, when its balance factor
//! leaves `{-1, 0, 1}`, is fixed with one of four rotations:
//!
//! ```text
//!  balance > 1,  left child  >= 0   →  rotate_right            (left-left)
//!  balance > 1,  left child  <  0   →  rotate_left(child), rotate_right   (left-right)
//!  balance < -1, right child <= 0   →  rotate_left             (right-right)
//!  balance < -1, right child >  0   →  rotate_right(child), rotate_left   (right-left)
//! ```
//!
//! ## Iteration
//!
//! [`OrderedIndex::iter`] is lazy, ascending, and restartable. Mutating the
//! index while an iterator is alive is not allowed; the shared borrow held by
//! [`Iter`] makes such code fail to compile.
//!
//! ## Module Structure
//!
//! ```text
//! domain/node.rs        - Node, rotations, rebalance
//! domain/tree.rs        - OrderedIndex insert / get / remove
//! domain/iter.rs        - in-order Iter
//! domain/invariants.rs  - structural checks used by tests and load-time validation
//! domain/errors.rs      - IndexError
//! ```

pub mod domain;

pub use domain::errors::IndexError;
pub use domain::iter::Iter;
pub use domain::tree::OrderedIndex;
