//! Logged-in identities.

use super::errors::DirectoryError;
use shared_types::Email;
use std::collections::HashSet;

/// Set of users with an active session.
///
/// Independent of the directory indices: it only ever holds emails.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    logged_in: HashSet<Email>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self, email: &Email) -> bool {
        self.logged_in.contains(email)
    }

    pub fn log_in(&mut self, email: &Email) -> Result<(), DirectoryError> {
        if !self.logged_in.insert(email.clone()) {
            return Err(DirectoryError::AlreadyLoggedIn {
                email: email.clone(),
            });
        }
        Ok(())
    }

    pub fn log_out(&mut self, email: &Email) -> Result<(), DirectoryError> {
        if !self.logged_in.remove(email) {
            return Err(DirectoryError::NotLoggedIn {
                email: email.clone(),
            });
        }
        Ok(())
    }

    /// Drops a session without the logged-in check, e.g. when the user is
    /// removed.
    pub(crate) fn forget(&mut self, email: &Email) -> bool {
        self.logged_in.remove(email)
    }

    pub fn len(&self) -> usize {
        self.logged_in.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logged_in.is_empty()
    }
}
