//! # Persistence Tests
//!
//! Reopening a directory from its mirror, with the JSON file adapter and
//! with hand-built rows.

#[cfg(test)]
mod tests {
    use crate::fixtures::{email, task, with_users};
    use kb_02_board_directory::{
        BoardRecord, CounterRecord, DirectoryApi, DirectoryConfig, DirectoryRepository, DirectoryService,
        EntityRecord, ErrorKind, InMemoryRepository, JsonFileRepository, RepositoryError, UserRecord,
    };
    use shared_types::{BoardId, BoardTitle, ColumnKind, ColumnLimit, Credentials};
    use std::sync::Arc;

    fn open_json(path: &std::path::Path) -> DirectoryService<JsonFileRepository> {
        let repo = Arc::new(JsonFileRepository::open(path).unwrap());
        match DirectoryService::open(repo, DirectoryConfig::default()) {
            Ok(service) => service,
            Err(e) => panic!("reopen failed: {e}"),
        }
    }

    fn user_row(address: &str) -> EntityRecord {
        EntityRecord::User(UserRecord {
            email: email(address),
            credentials: Credentials::from("pw"),
        })
    }

    fn board_row(id: u64, title: &str, owner: &str, joined: &[&str]) -> EntityRecord {
        EntityRecord::Board(BoardRecord {
            id: BoardId(id),
            title: BoardTitle::new(title),
            owner: email(owner),
            joined: joined.iter().map(|m| email(m)).collect(),
            backlog: Vec::new(),
            in_progress: Vec::new(),
            done: Vec::new(),
            backlog_limit: ColumnLimit::Unlimited,
            in_progress_limit: ColumnLimit::Unlimited,
            done_limit: ColumnLimit::Unlimited,
            next_task_id: 0,
        })
    }

    fn open_rows(rows: Vec<EntityRecord>) -> Result<DirectoryService<InMemoryRepository>, ErrorKind> {
        let repo = Arc::new(InMemoryRepository::with_records(rows));
        DirectoryService::open(repo, DirectoryConfig::default()).map_err(|e| e.kind())
    }

    #[test]
    fn test_json_mirror_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        let (a, b) = (email("a@x"), email("b@x"));

        let (board_id, task_id) = {
            let api = open_json(&path);
            with_users(&api, &["a@x", "b@x"]);
            let id = api.add_owned_board(&a, BoardTitle::new("Roadmap")).unwrap().id();
            api.add_owned_board(&a, BoardTitle::new("Scratch")).unwrap();
            api.remove_owned_board(&a, &BoardTitle::new("Scratch")).unwrap();
            api.join_board(&b, id).unwrap();
            api.limit_column(&a, id, ColumnKind::Backlog, ColumnLimit::AtMost(4)).unwrap();
            let t = api.add_task(&b, id, task("draft")).unwrap();
            api.assign_task(&b, id, ColumnKind::Backlog, t.id(), &b).unwrap();
            api.set_logged_in(&a).unwrap();
            (id, t.id())
        };

        let api = open_json(&path);
        assert_eq!(api.list_users().len(), 2);
        assert!(!api.is_logged_in(&a));

        let view = api.board_view(board_id).unwrap();
        assert_eq!(view.owner, a);
        assert_eq!(view.members, vec![b.clone()]);
        let backlog = view.column(ColumnKind::Backlog).unwrap();
        assert_eq!(backlog.limit, ColumnLimit::AtMost(4));
        assert_eq!(backlog.tasks[0].id(), task_id);
        assert_eq!(backlog.tasks[0].assignee(), Some(&b));

        assert_eq!(api.user_boards(&b).unwrap().joined[0].id, board_id);
        assert_eq!(api.user_boards(&a).unwrap().owned.len(), 1);

        // Ids of removed boards stay burned across the restart.
        let next = api.add_owned_board(&a, BoardTitle::new("Next")).unwrap().id();
        assert_eq!(next, BoardId(2));
        let next_task = api.add_task(&a, board_id, task("later")).unwrap();
        assert!(next_task.id() > task_id);
        api.verify().unwrap();
    }

    #[test]
    fn test_stale_counter_never_reuses_ids() {
        let api = open_rows(vec![
            user_row("a@x"),
            board_row(5, "Five", "a@x", &[]),
            EntityRecord::Counter(CounterRecord { next_board_id: Some(2) }),
        ])
        .unwrap();

        let id = api.add_owned_board(&email("a@x"), BoardTitle::new("Six")).unwrap().id();
        assert_eq!(id, BoardId(6));
    }

    #[test]
    fn test_counter_ahead_of_boards_is_kept() {
        let api = open_rows(vec![
            user_row("a@x"),
            board_row(1, "One", "a@x", &[]),
            EntityRecord::Counter(CounterRecord { next_board_id: Some(40) }),
        ])
        .unwrap();

        let id = api.add_owned_board(&email("a@x"), BoardTitle::new("Two")).unwrap().id();
        assert_eq!(id, BoardId(40));
    }

    #[test]
    fn test_missing_counter_resumes_after_highest_board() {
        let api = open_rows(vec![
            user_row("a@x"),
            user_row("b@x"),
            board_row(3, "Three", "a@x", &["b@x"]),
            board_row(9, "Nine", "b@x", &[]),
        ])
        .unwrap();

        let id = api.add_owned_board(&email("b@x"), BoardTitle::new("Ten")).unwrap().id();
        assert_eq!(id, BoardId(10));
        assert_eq!(api.user_boards(&email("b@x")).unwrap().joined[0].id, BoardId(3));
    }

    #[test]
    fn test_orphaned_rows_refuse_the_load() {
        let no_owner = open_rows(vec![user_row("a@x"), board_row(0, "Lost", "ghost@x", &[])]);
        assert_eq!(no_owner.err(), Some(ErrorKind::InvariantViolation));

        let no_member = open_rows(vec![user_row("a@x"), board_row(0, "Lost", "a@x", &["ghost@x"])]);
        assert_eq!(no_member.err(), Some(ErrorKind::InvariantViolation));

        let title_clash = open_rows(vec![
            user_row("a@x"),
            board_row(0, "Same", "a@x", &[]),
            board_row(1, "SAME", "a@x", &[]),
        ]);
        assert_eq!(title_clash.err(), Some(ErrorKind::InvariantViolation));
    }

    #[test]
    fn test_rows_breaking_board_rules_refuse_the_load() {
        let repo = Arc::new(InMemoryRepository::new());
        let api = DirectoryService::new(Arc::clone(&repo), DirectoryConfig::default());
        with_users(&api, &["a@x"]);
        let id = api.add_owned_board(&email("a@x"), BoardTitle::new("Full")).unwrap().id();
        for name in ["one", "two", "three"] {
            api.add_task(&email("a@x"), id, task(name)).unwrap();
        }
        let rows = repo.load().unwrap();

        let edited = |edit: fn(&mut BoardRecord)| {
            let mut rows = rows.clone();
            for row in &mut rows {
                if let EntityRecord::Board(board) = row {
                    edit(board);
                }
            }
            open_rows(rows).err()
        };

        let over_limit = edited(|board| board.backlog_limit = ColumnLimit::AtMost(1));
        assert_eq!(over_limit, Some(ErrorKind::InvariantViolation));

        let blank_title = edited(|board| board.title = BoardTitle::new(" "));
        assert_eq!(blank_title, Some(ErrorKind::InvariantViolation));

        let long_title = edited(|board| board.title = BoardTitle::new("x".repeat(51)));
        assert_eq!(long_title, Some(ErrorKind::InvariantViolation));

        assert!(open_rows(rows).is_ok());
    }

    #[test]
    fn test_corrupt_json_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        std::fs::write(&path, "[{\"kind\":\"user\"").unwrap();

        let err = JsonFileRepository::open(&path).err().unwrap();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }

    #[test]
    fn test_exhausted_allocator_stays_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        let config = DirectoryConfig {
            max_board_id: 1,
            ..DirectoryConfig::default()
        };
        let a = email("a@x");

        {
            let repo = Arc::new(JsonFileRepository::open(&path).unwrap());
            let api = DirectoryService::new(repo, config.clone());
            with_users(&api, &["a@x"]);
            api.add_owned_board(&a, BoardTitle::new("0")).unwrap();
            api.add_owned_board(&a, BoardTitle::new("1")).unwrap();
            api.remove_board(BoardId(1)).unwrap();
            let err = api.add_owned_board(&a, BoardTitle::new("2")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AllocatorExhausted);
        }

        let repo = Arc::new(JsonFileRepository::open(&path).unwrap());
        let api = match DirectoryService::open(repo, config) {
            Ok(service) => service,
            Err(e) => panic!("reopen failed: {e}"),
        };
        let err = api.add_owned_board(&a, BoardTitle::new("2")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocatorExhausted);
    }
}
