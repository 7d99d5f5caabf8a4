//! # Keys Inside the Index
//!
//! `Email` and `BoardId` from shared-types used directly as
//! `OrderedIndex` keys, the way the directory uses them.

#[cfg(test)]
mod tests {
    use crate::fixtures::email;
    use kb_01_ordered_index::domain::invariants;
    use kb_01_ordered_index::{IndexError, OrderedIndex};
    use rand::seq::SliceRandom;
    use rand::{rngs::StdRng, SeedableRng};
    use shared_types::{BoardId, Email};

    #[test]
    fn test_email_keys_ignore_case() {
        let mut index: OrderedIndex<Email, &str> = OrderedIndex::new();
        index.insert(email("Carol@Example.com"), "carol").unwrap();

        assert_eq!(index.get(&email("carol@example.COM")), Ok(&"carol"));
        assert_eq!(
            index.insert(email("CAROL@example.com"), "dup").map(|v| *v),
            Err(IndexError::DuplicateKey)
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_email_iteration_is_case_folded() {
        let mut index = OrderedIndex::new();
        for (i, user) in ["bob@x", "Alice@x", "carol@x", "ALBERT@x"].iter().enumerate() {
            index.insert(email(user), i).unwrap();
        }

        let order: Vec<_> = index.keys().map(|e| e.as_str().to_string()).collect();
        assert_eq!(order, vec!["ALBERT@x", "Alice@x", "bob@x", "carol@x"]);
    }

    #[test]
    fn test_board_ids_shuffled_insert_and_drain() {
        let mut ids: Vec<u64> = (0..2_000).collect();
        ids.shuffle(&mut StdRng::seed_from_u64(7));

        let mut index = OrderedIndex::new();
        for &id in &ids {
            index.insert(BoardId(id), id * 2).unwrap();
        }
        assert!(invariants::verify(&index));
        // 2000 keys: an AVL tree stays within 1.44 * log2(n) ≈ 16 levels.
        assert!(index.height() <= 16);

        ids.shuffle(&mut StdRng::seed_from_u64(8));
        for (removed, &id) in ids.iter().enumerate() {
            assert_eq!(index.remove(&BoardId(id)), Ok(id * 2));
            assert_eq!(index.get(&BoardId(id)), Err(IndexError::KeyNotFound));
            if removed % 250 == 0 {
                assert!(invariants::verify(&index));
            }
        }
        assert!(index.is_empty());
    }
}
