//! # Concurrency Tests
//!
//! Many threads sharing one service. Mutations serialize on the write lock,
//! so no id is lost or handed out twice and the views stay coherent.

#[cfg(test)]
mod tests {
    use crate::fixtures::{email, memory_service, with_users};
    use kb_02_board_directory::{DirectoryApi, ErrorKind};
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_types::{BoardId, BoardTitle};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::thread;

    const THREADS: usize = 8;
    const BOARDS_PER_THREAD: usize = 50;

    #[test]
    fn test_concurrent_creation_allocates_unique_ids() {
        let api = Arc::new(memory_service());
        let users: Vec<String> = (0..THREADS).map(|i| format!("user{i}@x")).collect();
        let names: Vec<&str> = users.iter().map(String::as_str).collect();
        with_users(api.as_ref(), &names);

        let ids = Mutex::new(Vec::new());
        thread::scope(|s| {
            for user in &users {
                let api = Arc::clone(&api);
                let ids = &ids;
                s.spawn(move || {
                    let owner = email(user);
                    for n in 0..BOARDS_PER_THREAD {
                        let board = api
                            .add_owned_board(&owner, BoardTitle::new(format!("b{n}")))
                            .unwrap();
                        ids.lock().push(board.id());
                    }
                });
            }
        });

        let ids = ids.into_inner();
        let unique: BTreeSet<BoardId> = ids.iter().copied().collect();
        assert_eq!(ids.len(), THREADS * BOARDS_PER_THREAD);
        assert_eq!(unique.len(), ids.len());
        // No gaps either: every allocation succeeded.
        assert_eq!(unique.iter().next_back(), Some(&BoardId((ids.len() - 1) as u64)));
        api.verify().unwrap();
    }

    #[test]
    fn test_same_title_race_has_one_winner() {
        let api = Arc::new(memory_service());
        with_users(api.as_ref(), &["a@x"]);

        let outcomes = Mutex::new(Vec::new());
        thread::scope(|s| {
            for _ in 0..THREADS {
                let api = Arc::clone(&api);
                let outcomes = &outcomes;
                s.spawn(move || {
                    let result = api.add_owned_board(&email("a@x"), BoardTitle::new("Only"));
                    outcomes.lock().push(result.map(|b| b.id()).map_err(|e| e.kind()));
                });
            }
        });

        let outcomes = outcomes.into_inner();
        let winners = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(outcomes
            .iter()
            .filter_map(|r| r.err())
            .all(|kind| kind == ErrorKind::AlreadyExists));
        assert_eq!(api.user_boards(&email("a@x")).unwrap().owned.len(), 1);
    }

    #[test]
    fn test_readers_alongside_writers() {
        let api = Arc::new(memory_service());
        let users: Vec<String> = (0..4).map(|i| format!("m{i}@x")).collect();
        let names: Vec<&str> = users.iter().map(String::as_str).collect();
        with_users(api.as_ref(), &names);
        let owner = email("m0@x");
        let hub = api.add_owned_board(&owner, BoardTitle::new("Hub")).unwrap().id();

        thread::scope(|s| {
            for (i, user) in users.iter().enumerate().skip(1) {
                let api = Arc::clone(&api);
                s.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(i as u64);
                    let me = email(user);
                    for round in 0..200 {
                        if rng.gen_bool(0.5) {
                            let _ = api.join_board(&me, hub);
                        } else {
                            let _ = api.leave_board(&me, hub);
                        }
                        if round % 10 == 0 {
                            let title = BoardTitle::new(format!("own{round}"));
                            if api.add_owned_board(&me, title.clone()).is_ok() {
                                api.remove_owned_board(&me, &title).unwrap();
                            }
                        }
                    }
                });
            }

            for _ in 0..2 {
                let api = Arc::clone(&api);
                let owner = owner.clone();
                s.spawn(move || {
                    for _ in 0..300 {
                        // One read lock per snapshot.
                        let view = api.board_view(hub).unwrap();
                        assert_eq!(view.owner, owner);
                        assert!(view.members.len() <= 3);
                        for member in &view.members {
                            assert!(api.contains_user(member));
                        }
                    }
                });
            }
        });

        let members = api.get_board(hub).unwrap().members().to_vec();
        for member in &members {
            let joined = api.user_boards(member).unwrap().joined;
            assert!(joined.iter().any(|s| s.id == hub));
        }
        api.verify().unwrap();
    }
}
