//! # Cascade Tests
//!
//! Removing a user or a board must leave no dangling id in any view.

#[cfg(test)]
mod tests {
    use crate::fixtures::{email, memory_service, task, with_users};
    use kb_02_board_directory::{DirectoryApi, ErrorKind};
    use shared_types::{BoardTitle, ColumnKind};

    #[test]
    fn test_remove_user_deletes_owned_and_leaves_joined() {
        let api = memory_service();
        with_users(&api, &["a@x", "b@x", "c@x"]);
        let (a, b, c) = (email("a@x"), email("b@x"), email("c@x"));

        let a_board = api.add_owned_board(&a, BoardTitle::new("A")).unwrap().id();
        let b_board = api.add_owned_board(&b, BoardTitle::new("B")).unwrap().id();
        api.join_board(&a, b_board).unwrap();
        api.join_board(&c, a_board).unwrap();
        api.join_board(&c, b_board).unwrap();

        api.remove_user(&a).unwrap();

        assert!(!api.contains_user(&a));
        assert_eq!(api.get_board(a_board).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(api.get_board(b_board).unwrap().members(), &[c.clone()]);

        let c_boards = api.user_boards(&c).unwrap();
        let joined: Vec<_> = c_boards.joined.iter().map(|s| s.id).collect();
        assert_eq!(joined, vec![b_board]);
        api.verify().unwrap();
    }

    #[test]
    fn test_remove_user_clears_its_assignments() {
        let api = memory_service();
        with_users(&api, &["owner@x", "dev@x"]);
        let (owner, dev) = (email("owner@x"), email("dev@x"));
        let id = api.add_owned_board(&owner, BoardTitle::new("Work")).unwrap().id();
        api.join_board(&dev, id).unwrap();
        let t = api.add_task(&owner, id, task("ship")).unwrap();
        api.assign_task(&owner, id, ColumnKind::Backlog, t.id(), &dev).unwrap();

        api.remove_user(&dev).unwrap();

        let board = api.get_board(id).unwrap();
        let task = board.column(ColumnKind::Backlog).task(t.id()).unwrap();
        assert_eq!(task.assignee(), None);
        // The owner can move it again now that nobody holds it.
        api.advance_task(&owner, id, ColumnKind::Backlog, t.id()).unwrap();
    }

    #[test]
    fn test_leave_board_clears_assignments() {
        let api = memory_service();
        with_users(&api, &["owner@x", "dev@x"]);
        let (owner, dev) = (email("owner@x"), email("dev@x"));
        let id = api.add_owned_board(&owner, BoardTitle::new("Work")).unwrap().id();
        api.join_board(&dev, id).unwrap();
        let t = api.add_task(&dev, id, task("fix")).unwrap();
        api.assign_task(&dev, id, ColumnKind::Backlog, t.id(), &dev).unwrap();

        // Only the assignee may advance it.
        assert_eq!(
            api.advance_task(&owner, id, ColumnKind::Backlog, t.id())
                .unwrap_err()
                .kind(),
            ErrorKind::PermissionDenied
        );

        api.leave_board(&dev, id).unwrap();
        let board = api.get_board(id).unwrap();
        assert!(board.members().is_empty());
        assert_eq!(board.column(ColumnKind::Backlog).task(t.id()).unwrap().assignee(), None);
        assert!(api.user_boards(&dev).unwrap().joined.is_empty());
    }

    #[test]
    fn test_remove_board_purges_every_member() {
        let api = memory_service();
        with_users(&api, &["a@x", "b@x", "c@x", "d@x"]);
        let id = api.add_owned_board(&email("a@x"), BoardTitle::new("Big")).unwrap().id();
        let keep = api.add_owned_board(&email("a@x"), BoardTitle::new("Keep")).unwrap().id();
        for member in ["b@x", "c@x", "d@x"] {
            api.join_board(&email(member), id).unwrap();
            api.join_board(&email(member), keep).unwrap();
        }

        api.remove_board(id).unwrap();

        for member in ["b@x", "c@x", "d@x"] {
            let joined: Vec<_> = api
                .user_boards(&email(member))
                .unwrap()
                .joined
                .iter()
                .map(|s| s.id)
                .collect();
            assert_eq!(joined, vec![keep]);
        }
        let owned: Vec<_> = api
            .user_boards(&email("a@x"))
            .unwrap()
            .owned
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(owned, vec![keep]);
        api.verify().unwrap();
    }

    #[test]
    fn test_removed_title_can_be_reused_with_new_id() {
        let api = memory_service();
        with_users(&api, &["a@x"]);
        let first = api.add_owned_board(&email("a@x"), BoardTitle::new("Sprint")).unwrap().id();
        api.remove_owned_board(&email("a@x"), &BoardTitle::new("sprint")).unwrap();

        let second = api.add_owned_board(&email("a@x"), BoardTitle::new("SPRINT")).unwrap().id();
        assert!(second > first);
    }

    #[test]
    fn test_transfer_rejects_title_clash() {
        let api = memory_service();
        with_users(&api, &["a@x", "b@x"]);
        let (a, b) = (email("a@x"), email("b@x"));
        let id = api.add_owned_board(&a, BoardTitle::new("Plan")).unwrap().id();
        api.add_owned_board(&b, BoardTitle::new("plan")).unwrap();
        api.join_board(&b, id).unwrap();

        let err = api.transfer_ownership(&a, id, &b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(api.get_board(id).unwrap().owner(), &a);
        assert_eq!(api.user_boards(&b).unwrap().joined.len(), 1);
    }

    #[test]
    fn test_failed_cascade_changes_nothing() {
        let api = memory_service();
        with_users(&api, &["a@x"]);
        api.add_owned_board(&email("a@x"), BoardTitle::new("One")).unwrap();

        assert_eq!(api.remove_user(&email("ghost@x")).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(api.list_users().len(), 1);
        assert_eq!(api.user_boards(&email("a@x")).unwrap().owned.len(), 1);
    }
}
