//! Friends service
//!
//! Friend requests, quick-add, removal, search and the activity feed.
//! There is no second party: a sent request is "accepted" by a timer.

use crate::config;
use crate::database::{new_id, Activity, Friend, FriendRequest, LocalStore, RequestStatus};
use crate::error::{AppError, Result};
use crate::services::auth::is_valid_email;
use crate::services::collection::Collection;
use crate::services::Confirm;
use crate::session::Session;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Result of trying to add someone
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(Friend),
    /// Duplicate email. Reported as a notice, not an error.
    AlreadyFriends(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    Removed(Friend),
    Cancelled,
    NotFound,
}

/// Someone from the suggestion panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub email: String,
}

/// Acceptance scheduled by `request`. Dropping the handle does not cancel it.
pub struct PendingAcceptance {
    handle: JoinHandle<Result<AddOutcome>>,
}

impl PendingAcceptance {
    /// Wait for the simulated reply
    pub async fn wait(self) -> Result<AddOutcome> {
        self.handle
            .await
            .map_err(|e| AppError::Generic(format!("Friend acceptance task failed: {}", e)))?
    }
}

fn validate_friend_email(email: &str) -> Result<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Please enter an email address".to_string()));
    }
    if !is_valid_email(email) {
        return Err(AppError::Validation("Please enter a valid email address".to_string()));
    }
    Ok(email)
}

/// Build the simulated friend record for `email`
fn friend_from_email(email: &str) -> Friend {
    let local = email.split('@').next().unwrap_or(email);
    let mut chars = local.chars();
    let (name, avatar) = match chars.next() {
        Some(first) => {
            let initial: String = first.to_uppercase().collect();
            (format!("{}{}", initial, chars.as_str()), initial)
        }
        None => (String::new(), String::new()),
    };

    let mut rng = rand::thread_rng();
    Friend {
        id: new_id(),
        name,
        email: email.to_string(),
        avatar,
        goals_completed: rng.gen_range(0..config::SIMULATED_MAX_GOALS_COMPLETED),
        active_goals: rng.gen_range(1..=config::SIMULATED_MAX_ACTIVE_GOALS),
        joined_date: Utc::now(),
    }
}

/// Append to the shared feed, newest first
pub(crate) async fn record_activity(store: &LocalStore, user: Option<&str>, message: String) -> Result<Activity> {
    let activity = Activity {
        id: new_id(),
        user: user.map(str::to_string),
        message,
        timestamp: Utc::now(),
    };

    let mut feed = Collection::<Activity>::load(store).await?;
    feed.push_front(activity.clone()).await?;

    Ok(activity)
}

/// Add `email` as a friend unless already present
async fn accept(store: &LocalStore, user: Option<&str>, email: &str) -> Result<AddOutcome> {
    let mut friends = Collection::<Friend>::load(store).await?;

    if let Some(existing) = friends.find_by(|f| f.email.eq_ignore_ascii_case(email)) {
        tracing::debug!("{} is already a friend", email);
        return Ok(AddOutcome::AlreadyFriends(existing.name.clone()));
    }

    let friend = friend_from_email(email);
    friends.push(friend.clone()).await?;
    record_activity(
        store,
        user,
        format!("{} accepted your friend request and joined GoalForge!", friend.name),
    )
    .await?;

    tracing::info!("Friend added: {}", friend.email);
    Ok(AddOutcome::Added(friend))
}

/// Service for managing friends
#[derive(Clone)]
pub struct FriendsService {
    store: LocalStore,
    accept_delay: Duration,
}

impl FriendsService {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            accept_delay: config::FRIEND_ACCEPT_DELAY,
        }
    }

    /// Override how long simulated acceptance takes
    pub fn with_accept_delay(mut self, delay: Duration) -> Self {
        self.accept_delay = delay;
        self
    }

    /// Record a pending request and schedule its acceptance
    pub async fn request(
        &self,
        session: &Session,
        email: &str,
        message: &str,
    ) -> Result<(FriendRequest, PendingAcceptance)> {
        let user = session.require_user()?.email.clone();
        let email = validate_friend_email(email)?.to_string();

        let request = FriendRequest {
            id: new_id(),
            email: email.clone(),
            message: message.trim().to_string(),
            timestamp: Utc::now(),
            status: RequestStatus::Pending,
        };

        let mut requests = Collection::<FriendRequest>::load(&self.store).await?;
        requests.push(request.clone()).await?;
        tracing::info!("Friend request sent to {}", email);

        let store = self.store.clone();
        let delay = self.accept_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            accept(&store, Some(user.as_str()), &email).await
        });

        Ok((request, PendingAcceptance { handle }))
    }

    /// Add straight away, skipping the request step
    pub async fn quick_add(&self, session: &Session, email: &str) -> Result<AddOutcome> {
        let user = session.require_user()?;
        let email = validate_friend_email(email)?;

        accept(&self.store, Some(user.email.as_str()), email).await
    }

    /// Remove a friend after confirmation
    pub async fn remove(&self, session: &Session, id: &str, confirm: &dyn Confirm) -> Result<RemoveOutcome> {
        let user = session.require_user()?;

        if !confirm.confirm("Are you sure you want to remove this friend?") {
            return Ok(RemoveOutcome::Cancelled);
        }

        let mut friends = Collection::<Friend>::load(&self.store).await?;
        let Some(friend) = friends.remove(id).await? else {
            tracing::debug!("Remove ignored, no friend {}", id);
            return Ok(RemoveOutcome::NotFound);
        };

        record_activity(
            &self.store,
            Some(user.email.as_str()),
            format!("You removed {} from your friends.", friend.name),
        )
        .await?;

        tracing::info!("Friend removed: {}", friend.email);
        Ok(RemoveOutcome::Removed(friend))
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<Friend>> {
        session.require_user()?;
        Ok(Collection::<Friend>::load(&self.store).await?.into_items())
    }

    /// Case-insensitive match on name or email. Blank query: everyone.
    pub async fn search(&self, session: &Session, query: &str) -> Result<Vec<Friend>> {
        let friends = self.list(session).await?;
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return Ok(friends);
        }

        Ok(friends
            .into_iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&query) || f.email.to_lowercase().contains(&query)
            })
            .collect())
    }

    pub async fn requests(&self, session: &Session) -> Result<Vec<FriendRequest>> {
        session.require_user()?;
        Ok(Collection::<FriendRequest>::load(&self.store).await?.into_items())
    }

    /// Suggested people who are not friends yet
    pub async fn suggestions(&self, session: &Session) -> Result<Vec<Suggestion>> {
        let friends = self.list(session).await?;

        Ok(config::FRIEND_SUGGESTIONS
            .iter()
            .filter(|(_, email)| !friends.iter().any(|f| f.email.eq_ignore_ascii_case(email)))
            .map(|(name, email)| Suggestion {
                name: name.to_string(),
                email: email.to_string(),
            })
            .collect())
    }

    /// Newest `limit` feed entries
    pub async fn activities(&self, session: &Session, limit: usize) -> Result<Vec<Activity>> {
        session.require_user()?;
        let feed = Collection::<Activity>::load(&self.store).await?;
        Ok(feed.into_items().into_iter().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_pool;
    use crate::services::AuthService;
    use tempfile::TempDir;

    async fn create_test_service() -> (FriendsService, Session, LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = create_pool(&temp_dir.path().join("test.db")).await.unwrap();
        let store = LocalStore::new(pool);
        let session = AuthService::new(store.clone())
            .sign_up("a@x.com", "secret1", "secret1")
            .await
            .unwrap();
        let service = FriendsService::new(store.clone()).with_accept_delay(Duration::from_millis(10));
        (service, session, store, temp_dir)
    }

    #[test]
    fn test_friend_from_email() {
        let friend = friend_from_email("sarah.miller@example.com");

        assert_eq!(friend.name, "Sarah.miller");
        assert_eq!(friend.avatar, "S");
        assert!(friend.goals_completed < 10);
        assert!((1..=5).contains(&friend.active_goals));
    }

    #[tokio::test]
    async fn test_quick_add_and_duplicate() {
        let (service, session, store, _temp) = create_test_service().await;

        let added = service.quick_add(&session, "mike@example.com").await.unwrap();
        assert!(matches!(added, AddOutcome::Added(ref f) if f.name == "Mike"));

        let revision = store.revision(config::FRIENDS_KEY).await.unwrap();
        let again = service.quick_add(&session, "MIKE@example.com").await.unwrap();
        assert_eq!(again, AddOutcome::AlreadyFriends("Mike".to_string()));
        assert_eq!(store.revision(config::FRIENDS_KEY).await.unwrap(), revision);

        assert_eq!(service.list(&session).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quick_add_validation() {
        let (service, session, _store, _temp) = create_test_service().await;

        let empty = service.quick_add(&session, "  ").await;
        assert!(matches!(empty, Err(AppError::Validation(ref m)) if m == "Please enter an email address"));

        let malformed = service.quick_add(&session, "mike@example").await;
        assert!(matches!(malformed, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_request_is_accepted_after_delay() {
        let (service, session, _store, _temp) = create_test_service().await;

        let (request, pending) = service
            .request(&session, "alex@example.com", "Let's keep each other honest")
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);

        let outcome = pending.wait().await.unwrap();
        assert!(matches!(outcome, AddOutcome::Added(ref f) if f.email == "alex@example.com"));

        // The request itself stays pending
        let requests = service.requests(&session).await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, RequestStatus::Pending);

        let feed = service.activities(&session, 5).await.unwrap();
        assert_eq!(feed[0].message, "Alex accepted your friend request and joined GoalForge!");
        assert_eq!(feed[0].user.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_remove_needs_confirmation() {
        let (service, session, store, _temp) = create_test_service().await;
        let AddOutcome::Added(friend) = service.quick_add(&session, "sam@example.com").await.unwrap() else {
            panic!("expected a new friend");
        };

        let revision = store.revision(config::FRIENDS_KEY).await.unwrap();
        let cancelled = service.remove(&session, &friend.id, &false).await.unwrap();
        assert_eq!(cancelled, RemoveOutcome::Cancelled);
        let missing = service.remove(&session, "no-such-id", &true).await.unwrap();
        assert_eq!(missing, RemoveOutcome::NotFound);
        assert_eq!(store.revision(config::FRIENDS_KEY).await.unwrap(), revision);

        let removed = service.remove(&session, &friend.id, &true).await.unwrap();
        assert_eq!(removed, RemoveOutcome::Removed(friend));
        assert!(service.list(&session).await.unwrap().is_empty());

        let feed = service.activities(&session, 1).await.unwrap();
        assert_eq!(feed[0].message, "You removed Sam from your friends.");
    }

    #[tokio::test]
    async fn test_search_and_suggestions() {
        let (service, session, _store, _temp) = create_test_service().await;
        service.quick_add(&session, "alex@example.com").await.unwrap();
        service.quick_add(&session, "jordan@work.io").await.unwrap();

        let by_name = service.search(&session, "ALEX").await.unwrap();
        assert_eq!(by_name.len(), 1);

        let by_email = service.search(&session, "work.io").await.unwrap();
        assert_eq!(by_email[0].name, "Jordan");

        assert_eq!(service.search(&session, "   ").await.unwrap().len(), 2);
        assert!(service.search(&session, "zzz").await.unwrap().is_empty());

        let suggestions = service.suggestions(&session).await.unwrap();
        let emails: Vec<&str> = suggestions.iter().map(|s| s.email.as_str()).collect();
        assert_eq!(emails, vec!["sarah@example.com", "mike@example.com"]);
    }
}
