//! Login session
//!
//! The current-user slot is the whole authentication check: a session is
//! "logged in" exactly when that slot holds a user. A `Session` is read once
//! when a page (command) starts and handed to each service explicitly.

use crate::config;
use crate::database::{LocalStore, User};
use crate::error::{AppError, Result};
use crate::services::collection::Collection;

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Read the current-user slot
    pub async fn load(store: &LocalStore) -> Result<Self> {
        let user: Option<User> = store.load(config::CURRENT_USER_KEY).await?;
        Ok(Self { user })
    }

    pub(crate) fn for_user(user: User) -> Self {
        Self {
            user: Some(user.without_password()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Gate for every page that needs a login
    pub fn require_user(&self) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::Auth("Please log in to continue".to_string()))
    }

    /// Write `user` to the current-user slot and to its user-list entry.
    ///
    /// The list entry keeps its stored password hash; the current-user slot
    /// never carries one.
    pub async fn persist_user(&mut self, store: &LocalStore, user: User) -> Result<()> {
        let safe = user.without_password();

        let mut users = Collection::<User>::load(store).await?;
        let updated = users
            .update(&safe.id, |stored| {
                let password = stored.password.take();
                *stored = User {
                    password,
                    ..safe.clone()
                };
            })
            .await?;

        if updated.is_none() {
            tracing::warn!("Current user {} is missing from the user list", safe.email);
        }

        store.save(config::CURRENT_USER_KEY, &safe).await?;
        self.user = Some(safe);

        Ok(())
    }

    /// Forget the login both here and in the store
    pub async fn clear(&mut self, store: &LocalStore) -> Result<()> {
        store.remove(config::CURRENT_USER_KEY).await?;
        self.user = None;
        Ok(())
    }
}
