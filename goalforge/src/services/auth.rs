//! Auth service
//!
//! Local sign-up, log-in and log-out. Accounts live in the user list; the
//! current-user slot marks who is logged in.

use crate::config;
use crate::crypto;
use crate::database::{new_id, LocalStore, User};
use crate::error::{AppError, Result};
use crate::services::collection::Collection;
use crate::services::settings::UserSettings;
use crate::session::Session;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(config::EMAIL_PATTERN).expect("email pattern is a valid regex")
});

/// Loose shape check shared by the auth and friends forms
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Form-level checks, run before touching the store
fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if !is_valid_email(email) {
        return Err(AppError::Validation("Please enter a valid email".to_string()));
    }

    if password.chars().count() < config::MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            config::MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

/// Service for managing local accounts
#[derive(Clone)]
pub struct AuthService {
    store: LocalStore,
}

impl AuthService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Create an account and log it in
    pub async fn sign_up(&self, email: &str, password: &str, confirm: &str) -> Result<Session> {
        let email = email.trim();
        let password = password.trim();

        validate_credentials(email, password)?;
        if password != confirm.trim() {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let mut users = Collection::<User>::load(&self.store).await?;
        if users
            .find_by(|u| u.email.eq_ignore_ascii_case(email))
            .is_some()
        {
            return Err(AppError::Conflict(
                "An account with this email already exists.".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: new_id(),
            email: email.to_string(),
            password: Some(crypto::hash_password(password)?),
            display_name: User::display_name_for(email),
            bio: String::new(),
            created_at: now,
            last_login: now,
            streak: 0,
            last_check_in_date: None,
            settings: UserSettings::default(),
        };

        users.push(user.clone()).await?;
        let session = self.start_session(user).await?;

        tracing::info!("Account created: {}", email);
        Ok(session)
    }

    /// Log in with stored credentials and stamp `lastLogin`
    pub async fn log_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        let password = password.trim();

        validate_credentials(email, password)?;

        let mut users = Collection::<User>::load(&self.store).await?;
        let id = users
            .find_by(|u| {
                u.email.eq_ignore_ascii_case(email)
                    && u
                        .password
                        .as_deref()
                        .is_some_and(|stored| crypto::verify_password(password, stored))
            })
            .map(|u| u.id.clone())
            .ok_or_else(|| AppError::Auth("Invalid email or password.".to_string()))?;

        let user = users
            .update(&id, |u| u.last_login = Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(id.clone()))?;

        let session = self.start_session(user).await?;

        tracing::info!("Logged in: {}", email);
        Ok(session)
    }

    /// Clear the current-user slot. Logging out twice is harmless.
    pub async fn log_out(&self, session: &mut Session) -> Result<()> {
        if let Some(user) = session.current_user() {
            tracing::info!("Logging out: {}", user.email);
        }
        session.clear(&self.store).await
    }

    /// The stored current user, if anyone is logged in
    pub async fn current_user(&self) -> Result<Option<User>> {
        Ok(Session::load(&self.store).await?.current_user().cloned())
    }

    async fn start_session(&self, user: User) -> Result<Session> {
        let session = Session::for_user(user);
        if let Some(safe) = session.current_user() {
            self.store.save(config::CURRENT_USER_KEY, safe).await?;
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_pool;
    use tempfile::TempDir;

    async fn create_test_service() -> (AuthService, LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = create_pool(&temp_dir.path().join("test.db")).await.unwrap();
        let store = LocalStore::new(pool);
        (AuthService::new(store.clone()), store, temp_dir)
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaced out@x.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn test_sign_up_writes_current_user_without_password() {
        let (service, store, _temp) = create_test_service().await;

        let session = service.sign_up("a@x.com", "secret1", "secret1").await.unwrap();

        assert!(session.is_logged_in());
        let current: User = store.load(config::CURRENT_USER_KEY).await.unwrap().unwrap();
        assert_eq!(current.email, "a@x.com");
        assert_eq!(current.display_name, "a");
        assert!(current.password.is_none());

        let raw = store.load_raw(config::CURRENT_USER_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("password"));

        let users: Vec<User> = store.load_or_default(config::USERS_KEY).await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].password.as_deref().unwrap().starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let (service, store, _temp) = create_test_service().await;

        service.sign_up("a@x.com", "secret1", "secret1").await.unwrap();
        let result = service.sign_up("A@X.COM", "other12", "other12").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        let users: Vec<User> = store.load_or_default(config::USERS_KEY).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_short_password_rejected_before_any_write() {
        let (service, store, _temp) = create_test_service().await;

        let result = service.sign_up("a@x.com", "abc", "abc").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_confirmation() {
        let (service, store, _temp) = create_test_service().await;

        let result = service.sign_up("a@x.com", "secret1", "secret2").await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Passwords do not match"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_log_out_then_log_in() {
        let (service, store, _temp) = create_test_service().await;

        let mut session = service.sign_up("a@x.com", "secret1", "secret1").await.unwrap();
        let signed_up_at = session.current_user().unwrap().last_login;

        service.log_out(&mut session).await.unwrap();
        assert!(service.current_user().await.unwrap().is_none());

        let session = service.log_in("a@x.com", "secret1").await.unwrap();
        let user = session.current_user().unwrap();
        assert!(user.last_login >= signed_up_at);

        let users: Vec<User> = store.load_or_default(config::USERS_KEY).await.unwrap();
        assert_eq!(users[0].last_login, user.last_login);
        assert_eq!(
            service.current_user().await.unwrap().map(|u| u.email),
            Some("a@x.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (service, _store, _temp) = create_test_service().await;

        service.sign_up("a@x.com", "secret1", "secret1").await.unwrap();

        let wrong_password = service.log_in("a@x.com", "secret2").await;
        assert!(matches!(wrong_password, Err(AppError::Auth(_))));

        let unknown_user = service.log_in("b@x.com", "secret1").await;
        assert!(matches!(unknown_user, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_log_out_when_logged_out() {
        let (service, _store, _temp) = create_test_service().await;

        let mut session = Session::default();
        service.log_out(&mut session).await.unwrap();

        assert!(!session.is_logged_in());
    }
}
