//! # End-to-End Directory Scenarios
//!
//! The directory driven only through `DirectoryApi`, as the request-dispatch
//! layer would.

#[cfg(test)]
mod tests {
    use crate::fixtures::{email, memory_service, task, with_users};
    use kb_02_board_directory::{DirectoryApi, ErrorKind, TaskUpdate};
    use shared_types::{BoardId, BoardTitle, ColumnKind, ColumnLimit};

    #[test]
    fn test_owned_board_appears_once() {
        let api = memory_service();
        with_users(&api, &["a@x"]);

        let board = api.add_owned_board(&email("a@x"), BoardTitle::new("T")).unwrap();
        assert_eq!(api.get_board(board.id()).unwrap().title().as_str(), "T");

        let boards = api.user_boards(&email("a@x")).unwrap();
        let titled_t = boards.owned.iter().filter(|b| b.title.as_str() == "T").count();
        assert_eq!(titled_t, 1);

        let err = api.add_owned_board(&email("a@x"), BoardTitle::new("T")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_joined_view_follows_board_removal() {
        let api = memory_service();
        with_users(&api, &["a@x", "b@x"]);
        let id = api.add_owned_board(&email("a@x"), BoardTitle::new("T")).unwrap().id();

        api.join_board(&email("b@x"), id).unwrap();
        assert_eq!(api.user_boards(&email("b@x")).unwrap().joined.len(), 1);

        api.remove_owned_board(&email("a@x"), &BoardTitle::new("T")).unwrap();
        assert!(api.user_boards(&email("b@x")).unwrap().joined.is_empty());
        assert_eq!(api.get_board(id).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_session_errors() {
        let api = memory_service();
        with_users(&api, &["a@x"]);

        api.set_logged_in(&email("a@x")).unwrap();
        assert_eq!(
            api.set_logged_in(&email("a@x")).unwrap_err().kind(),
            ErrorKind::AlreadyLoggedIn
        );
        api.set_logged_out(&email("a@x")).unwrap();
        assert_eq!(
            api.set_logged_out(&email("a@x")).unwrap_err().kind(),
            ErrorKind::NotLoggedIn
        );
    }

    #[test]
    fn test_board_ids_never_reused() {
        let api = memory_service();
        with_users(&api, &["a@x"]);

        let mut ids = Vec::new();
        for round in 0..20 {
            let board = api
                .add_owned_board(&email("a@x"), BoardTitle::new(format!("B{round}")))
                .unwrap();
            if round % 2 == 1 {
                api.remove_board(board.id()).unwrap();
            }
            ids.push(board.id());
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_full_board_workflow() {
        let api = memory_service();
        with_users(&api, &["owner@x", "dev@x", "qa@x"]);
        let (owner, dev, qa) = (email("owner@x"), email("dev@x"), email("qa@x"));

        let id = api.add_owned_board(&owner, BoardTitle::new("Release")).unwrap().id();
        api.join_board(&dev, id).unwrap();
        api.join_board(&qa, id).unwrap();
        api.limit_column(&owner, id, ColumnKind::InProgress, ColumnLimit::AtMost(1))
            .unwrap();

        let build = api.add_task(&dev, id, task("build")).unwrap();
        let test = api.add_task(&qa, id, task("test")).unwrap();
        assert!(test.id() > build.id());

        api.assign_task(&dev, id, ColumnKind::Backlog, build.id(), &dev).unwrap();
        api.advance_task(&dev, id, ColumnKind::Backlog, build.id()).unwrap();

        // In progress is full.
        let err = api
            .advance_task(&qa, id, ColumnKind::Backlog, test.id())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);

        api.advance_task(&dev, id, ColumnKind::InProgress, build.id()).unwrap();
        api.advance_task(&qa, id, ColumnKind::Backlog, test.id()).unwrap();
        api.update_task(
            &qa,
            id,
            ColumnKind::InProgress,
            test.id(),
            TaskUpdate {
                description: Some("regression suite".into()),
                ..TaskUpdate::default()
            },
        )
        .unwrap();

        let view = api.board_view(id).unwrap();
        assert_eq!(view.members, vec![dev.clone(), qa.clone()]);
        let done = view.column(ColumnKind::Done).unwrap();
        assert_eq!(done.tasks.len(), 1);
        assert_eq!(done.tasks[0].assignee(), Some(&dev));
        let in_progress = view.column(ColumnKind::InProgress).unwrap();
        assert_eq!(in_progress.limit, ColumnLimit::AtMost(1));
        assert_eq!(in_progress.tasks[0].description(), "regression suite");
    }

    #[test]
    fn test_ownership_transfer_swaps_views() {
        let api = memory_service();
        with_users(&api, &["a@x", "b@x"]);
        let (a, b) = (email("a@x"), email("b@x"));
        let id = api.add_owned_board(&a, BoardTitle::new("Shared")).unwrap().id();
        api.join_board(&b, id).unwrap();

        api.transfer_ownership(&a, id, &b).unwrap();

        let a_boards = api.user_boards(&a).unwrap();
        let b_boards = api.user_boards(&b).unwrap();
        assert!(a_boards.owned.is_empty());
        assert_eq!(a_boards.joined[0].id, id);
        assert_eq!(b_boards.owned[0].owner, b);
        assert!(b_boards.joined.is_empty());

        // The previous owner is now an ordinary member.
        assert_eq!(
            api.limit_column(&a, id, ColumnKind::Done, ColumnLimit::AtMost(3))
                .unwrap_err()
                .kind(),
            ErrorKind::PermissionDenied
        );
        api.leave_board(&a, id).unwrap();
        assert!(api.user_boards(&a).unwrap().joined.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_not_found() {
        let api = memory_service();
        with_users(&api, &["a@x"]);

        let kind = |r: Result<(), kb_02_board_directory::DirectoryError>| r.unwrap_err().kind();
        assert_eq!(kind(api.join_board(&email("a@x"), BoardId(3))), ErrorKind::NotFound);
        assert_eq!(kind(api.leave_board(&email("z@x"), BoardId(3))), ErrorKind::NotFound);
        assert_eq!(kind(api.remove_user(&email("z@x"))), ErrorKind::NotFound);
        assert_eq!(
            kind(api.remove_owned_board(&email("a@x"), &BoardTitle::new("none"))),
            ErrorKind::NotFound
        );
        assert!(!api.contains_user(&email("z@x")));
    }

    #[test]
    fn test_rejections_are_counted() {
        let api = memory_service();
        with_users(&api, &["a@x"]);
        let _ = api.join_board(&email("a@x"), BoardId(404));

        let exposition = kb_telemetry::gather_metrics().unwrap();
        assert!(exposition
            .contains(r#"kb_directory_operations_total{operation="join_board",outcome="not_found"}"#));
        assert!(exposition.contains("kb_directory_users"));
    }
}
