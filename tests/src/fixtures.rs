//! Shared test builders.

use chrono::{Duration, Utc};
use kb_02_board_directory::{DirectoryApi, DirectoryConfig, DirectoryService, InMemoryRepository, NewTask};
use shared_types::{Credentials, Email};
use std::sync::Arc;

pub fn email(s: &str) -> Email {
    Email::new(s)
}

pub fn memory_service() -> DirectoryService<InMemoryRepository> {
    DirectoryService::new(Arc::new(InMemoryRepository::new()), DirectoryConfig::default())
}

/// Registers every user in `emails` with a throwaway credential.
pub fn with_users<A: DirectoryApi>(api: &A, emails: &[&str]) {
    for user in emails {
        if let Err(e) = api.add_user(email(user), Credentials::from("Passw0rd")) {
            panic!("fixture user {user} rejected: {e}");
        }
    }
}

pub fn task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: format!("{title} description"),
        due_date: Utc::now() + Duration::days(7),
    }
}
