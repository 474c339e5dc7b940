//! Settings service
//!
//! Per-user preferences stored in a nested `settings` object on the user
//! record, plus profile edits, account stats and account deletion.

use crate::database::{Friend, Goal, LocalStore, User};
use crate::error::{AppError, Result};
use crate::services::collection::Collection;
use crate::services::Confirm;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Email and push notification toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub email_goal_reminders: bool,
    #[serde(default = "default_true")]
    pub email_circle_activity: bool,
    #[serde(default)]
    pub email_weekly_reports: bool,
    #[serde(default = "default_true")]
    pub push_goal_updates: bool,
    #[serde(default = "default_true")]
    pub push_circle_messages: bool,
    #[serde(default = "default_true")]
    pub push_streak_reminders: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_goal_reminders: true,
            email_circle_activity: true,
            email_weekly_reports: false,
            push_goal_updates: true,
            push_circle_messages: true,
            push_streak_reminders: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Friends,
    Private,
}

impl FromStr for ProfileVisibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(ProfileVisibility::Public),
            "friends" => Ok(ProfileVisibility::Friends),
            "private" => Ok(ProfileVisibility::Private),
            other => Err(AppError::Validation(format!(
                "Unknown profile visibility: {} (expected public, friends or private)",
                other
            ))),
        }
    }
}

/// What other people get to see
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    #[serde(default)]
    pub profile_visibility: ProfileVisibility,
    #[serde(default = "default_true")]
    pub share_goal_completions: bool,
    #[serde(default = "default_true")]
    pub share_milestone_progress: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: ProfileVisibility::Public,
            share_goal_completions: true,
            share_milestone_progress: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the system preference
    Auto,
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(AppError::Validation(format!(
                "Unknown theme: {} (expected light, dark or auto)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub compact_layout: bool,
}

/// Everything under `user.settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
}

/// One individually saved field, named by its form id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    EmailGoalReminders,
    EmailCircleActivity,
    EmailWeeklyReports,
    PushGoalUpdates,
    PushCircleMessages,
    PushStreakReminders,
    ProfileVisibility,
    ShareGoalCompletions,
    ShareMilestoneProgress,
    Theme,
    CompactLayout,
}

impl SettingKey {
    pub const ALL: [SettingKey; 11] = [
        SettingKey::EmailGoalReminders,
        SettingKey::EmailCircleActivity,
        SettingKey::EmailWeeklyReports,
        SettingKey::PushGoalUpdates,
        SettingKey::PushCircleMessages,
        SettingKey::PushStreakReminders,
        SettingKey::ProfileVisibility,
        SettingKey::ShareGoalCompletions,
        SettingKey::ShareMilestoneProgress,
        SettingKey::Theme,
        SettingKey::CompactLayout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::EmailGoalReminders => "emailGoalReminders",
            SettingKey::EmailCircleActivity => "emailCircleActivity",
            SettingKey::EmailWeeklyReports => "emailWeeklyReports",
            SettingKey::PushGoalUpdates => "pushGoalUpdates",
            SettingKey::PushCircleMessages => "pushCircleMessages",
            SettingKey::PushStreakReminders => "pushStreakReminders",
            SettingKey::ProfileVisibility => "profileVisibility",
            SettingKey::ShareGoalCompletions => "shareGoalCompletions",
            SettingKey::ShareMilestoneProgress => "shareMilestoneProgress",
            SettingKey::Theme => "theme",
            SettingKey::CompactLayout => "compactLayout",
        }
    }

    /// Section of `UserSettings` the key belongs to
    pub fn category(self) -> &'static str {
        match self {
            SettingKey::EmailGoalReminders
            | SettingKey::EmailCircleActivity
            | SettingKey::EmailWeeklyReports
            | SettingKey::PushGoalUpdates
            | SettingKey::PushCircleMessages
            | SettingKey::PushStreakReminders => "notifications",
            SettingKey::ProfileVisibility
            | SettingKey::ShareGoalCompletions
            | SettingKey::ShareMilestoneProgress => "privacy",
            SettingKey::Theme | SettingKey::CompactLayout => "appearance",
        }
    }

    /// Current value as shown in the settings listing
    pub fn value(self, settings: &UserSettings) -> String {
        let on_off = |b: bool| String::from(if b { "on" } else { "off" });
        let notifications = &settings.notifications;
        let privacy = &settings.privacy;
        match self {
            SettingKey::EmailGoalReminders => on_off(notifications.email_goal_reminders),
            SettingKey::EmailCircleActivity => on_off(notifications.email_circle_activity),
            SettingKey::EmailWeeklyReports => on_off(notifications.email_weekly_reports),
            SettingKey::PushGoalUpdates => on_off(notifications.push_goal_updates),
            SettingKey::PushCircleMessages => on_off(notifications.push_circle_messages),
            SettingKey::PushStreakReminders => on_off(notifications.push_streak_reminders),
            SettingKey::ProfileVisibility => match privacy.profile_visibility {
                ProfileVisibility::Public => "public",
                ProfileVisibility::Friends => "friends",
                ProfileVisibility::Private => "private",
            }
            .to_string(),
            SettingKey::ShareGoalCompletions => on_off(privacy.share_goal_completions),
            SettingKey::ShareMilestoneProgress => on_off(privacy.share_milestone_progress),
            SettingKey::Theme => match settings.appearance.theme {
                Theme::Light => "light",
                Theme::Dark => "dark",
                Theme::Auto => "auto",
            }
            .to_string(),
            SettingKey::CompactLayout => on_off(settings.appearance.compact_layout),
        }
    }

    /// Parse `value` for this key and write it into `settings`
    pub fn apply(self, settings: &mut UserSettings, value: &str) -> Result<()> {
        let notifications = &mut settings.notifications;
        let privacy = &mut settings.privacy;
        match self {
            SettingKey::EmailGoalReminders => notifications.email_goal_reminders = parse_bool(value)?,
            SettingKey::EmailCircleActivity => notifications.email_circle_activity = parse_bool(value)?,
            SettingKey::EmailWeeklyReports => notifications.email_weekly_reports = parse_bool(value)?,
            SettingKey::PushGoalUpdates => notifications.push_goal_updates = parse_bool(value)?,
            SettingKey::PushCircleMessages => notifications.push_circle_messages = parse_bool(value)?,
            SettingKey::PushStreakReminders => notifications.push_streak_reminders = parse_bool(value)?,
            SettingKey::ProfileVisibility => privacy.profile_visibility = value.parse()?,
            SettingKey::ShareGoalCompletions => privacy.share_goal_completions = parse_bool(value)?,
            SettingKey::ShareMilestoneProgress => privacy.share_milestone_progress = parse_bool(value)?,
            SettingKey::Theme => settings.appearance.theme = value.parse()?,
            SettingKey::CompactLayout => settings.appearance.compact_layout = parse_bool(value)?,
        }
        Ok(())
    }
}

impl FromStr for SettingKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        SettingKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::Validation(format!("Unknown setting: {}", wanted)))
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(AppError::Validation(format!(
            "Expected on or off, got: {}",
            other
        ))),
    }
}

/// Numbers shown in the account overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStats {
    pub total_goals: usize,
    pub current_streak: u32,
    pub friends: usize,
}

/// Service for per-user settings and account management
#[derive(Clone)]
pub struct SettingsService {
    store: LocalStore,
}

impl SettingsService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn get(&self, session: &Session) -> Result<UserSettings> {
        Ok(session.require_user()?.settings.clone())
    }

    /// Save a single setting immediately
    pub async fn set(&self, session: &mut Session, key: SettingKey, value: &str) -> Result<UserSettings> {
        let mut user = session.require_user()?.clone();
        key.apply(&mut user.settings, value)?;

        let settings = user.settings.clone();
        session.persist_user(&self.store, user).await?;

        tracing::info!("Setting {}.{} = {}", key.category(), key.name(), value.trim());
        Ok(settings)
    }

    /// Update display name and bio
    pub async fn update_profile(&self, session: &mut Session, display_name: &str, bio: Option<&str>) -> Result<User> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::Validation("Display name cannot be empty".to_string()));
        }

        let mut user = session.require_user()?.clone();
        user.display_name = display_name.to_string();
        if let Some(bio) = bio {
            user.bio = bio.trim().to_string();
        }

        session.persist_user(&self.store, user.clone()).await?;

        tracing::info!("Profile updated for {}", user.email);
        Ok(user)
    }

    pub async fn stats(&self, session: &Session) -> Result<AccountStats> {
        let user = session.require_user()?;
        let goals = Collection::<Goal>::load(&self.store).await?;
        let friends = Collection::<Friend>::load(&self.store).await?;

        Ok(AccountStats {
            total_goals: goals.len(),
            current_streak: user.streak,
            friends: friends.len(),
        })
    }

    /// Permanently remove the logged-in account. Returns false when the
    /// user backs out at the confirmation prompt.
    pub async fn delete_account(&self, session: &mut Session, confirm: &dyn Confirm) -> Result<bool> {
        let user = session.require_user()?.clone();

        if !confirm.confirm(
            "Are you absolutely sure? This will permanently delete your account and all data.",
        ) {
            return Ok(false);
        }

        let mut users = Collection::<User>::load(&self.store).await?;
        users.retain(|u| u.id != user.id).await?;
        session.clear(&self.store).await?;

        tracing::info!("Account deleted: {}", user.email);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::database::create_pool;
    use crate::services::AuthService;
    use tempfile::TempDir;

    async fn create_test_service() -> (SettingsService, Session, LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = create_pool(&temp_dir.path().join("test.db")).await.unwrap();
        let store = LocalStore::new(pool);
        let session = AuthService::new(store.clone())
            .sign_up("a@x.com", "secret1", "secret1")
            .await
            .unwrap();
        (SettingsService::new(store.clone()), session, store, temp_dir)
    }

    #[test]
    fn test_default_settings() {
        let settings = UserSettings::default();

        assert!(settings.notifications.email_goal_reminders);
        assert!(!settings.notifications.email_weekly_reports);
        assert!(settings.notifications.push_streak_reminders);
        assert_eq!(settings.privacy.profile_visibility, ProfileVisibility::Public);
        assert!(settings.privacy.share_goal_completions);
        assert_eq!(settings.appearance.theme, Theme::Light);
        assert!(!settings.appearance.compact_layout);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"appearance": {"theme": "dark"}}"#).unwrap();

        assert_eq!(settings.appearance.theme, Theme::Dark);
        assert!(settings.notifications.push_goal_updates);
        assert!(settings.privacy.share_milestone_progress);
    }

    #[test]
    fn test_setting_key_parsing() {
        assert_eq!("emailWeeklyReports".parse::<SettingKey>().unwrap(), SettingKey::EmailWeeklyReports);
        assert_eq!("THEME".parse::<SettingKey>().unwrap(), SettingKey::Theme);
        assert_eq!(SettingKey::ShareGoalCompletions.category(), "privacy");
        assert!(matches!("fontSize".parse::<SettingKey>(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_value_reads_back_what_apply_wrote() {
        let mut settings = UserSettings::default();
        assert_eq!(SettingKey::EmailWeeklyReports.value(&settings), "off");
        assert_eq!(SettingKey::Theme.value(&settings), "light");

        SettingKey::Theme.apply(&mut settings, "Dark").unwrap();
        SettingKey::EmailWeeklyReports.apply(&mut settings, "yes").unwrap();
        SettingKey::ProfileVisibility.apply(&mut settings, "friends").unwrap();

        assert_eq!(SettingKey::Theme.value(&settings), "dark");
        assert_eq!(SettingKey::EmailWeeklyReports.value(&settings), "on");
        assert_eq!(SettingKey::ProfileVisibility.value(&settings), "friends");
    }

    #[tokio::test]
    async fn test_set_persists_to_user_record() {
        let (service, mut session, store, _temp) = create_test_service().await;

        service.set(&mut session, SettingKey::Theme, "dark").await.unwrap();
        service.set(&mut session, SettingKey::EmailWeeklyReports, "on").await.unwrap();

        let reloaded = Session::load(&store).await.unwrap();
        let settings = service.get(&reloaded).unwrap();
        assert_eq!(settings.appearance.theme, Theme::Dark);
        assert!(settings.notifications.email_weekly_reports);

        let users: Vec<User> = store.load_or_default(config::USERS_KEY).await.unwrap();
        assert_eq!(users[0].settings.appearance.theme, Theme::Dark);
        assert!(users[0].password.is_some());
    }

    #[tokio::test]
    async fn test_bad_value_leaves_settings_untouched() {
        let (service, mut session, store, _temp) = create_test_service().await;

        let result = service.set(&mut session, SettingKey::ProfileVisibility, "everyone").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        let reloaded = Session::load(&store).await.unwrap();
        assert_eq!(
            service.get(&reloaded).unwrap().privacy.profile_visibility,
            ProfileVisibility::Public
        );
    }

    #[tokio::test]
    async fn test_update_profile() {
        let (service, mut session, _store, _temp) = create_test_service().await;

        let user = service
            .update_profile(&mut session, "  Alice ", Some("Runs every morning"))
            .await
            .unwrap();

        assert_eq!(user.display_name, "Alice");
        assert_eq!(session.current_user().unwrap().bio, "Runs every morning");

        let renamed = service.update_profile(&mut session, "Ally", None).await.unwrap();
        assert_eq!(renamed.bio, "Runs every morning");

        let cleared = service.update_profile(&mut session, "Ally", Some("")).await.unwrap();
        assert!(cleared.bio.is_empty());

        let blank = service.update_profile(&mut session, "   ", None).await;
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_account_requires_confirmation() {
        let (service, mut session, store, _temp) = create_test_service().await;

        assert!(!service.delete_account(&mut session, &false).await.unwrap());
        assert!(session.is_logged_in());

        assert!(service.delete_account(&mut session, &true).await.unwrap());
        assert!(!session.is_logged_in());

        let users: Vec<User> = store.load_or_default(config::USERS_KEY).await.unwrap();
        assert!(users.is_empty());
        assert!(store.load_raw(config::CURRENT_USER_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_require_login() {
        let (service, _session, _store, _temp) = create_test_service().await;

        let mut anonymous = Session::default();
        let result = service.set(&mut anonymous, SettingKey::Theme, "dark").await;

        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
