//! Database models
//!
//! Rust structs for every record kept in the local store.
//! Field names serialize in camelCase so stored JSON keeps the shape the
//! browser version wrote; fields added later all carry serde defaults.

use crate::config;
use crate::services::settings::UserSettings;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A list-shaped entity persisted as one JSON array under a fixed key.
pub trait Record: Clone + Serialize + serde::de::DeserializeOwned + Send + Sync + 'static {
    /// Store key holding the whole list
    const STORE_KEY: &'static str;

    fn id(&self) -> &str;
}

/// Time-ordered identifier for new records
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Deadlines arrive from forms as "" when left blank.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// A registered local account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string. Absent in the current-user slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, deserialize_with = "optional_date")]
    pub last_check_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub settings: UserSettings,
}

impl User {
    /// Copy safe to write into the current-user slot
    pub fn without_password(&self) -> User {
        User {
            password: None,
            ..self.clone()
        }
    }

    /// Local part of an email, used as the initial display name
    pub fn display_name_for(email: &str) -> String {
        email.split('@').next().unwrap_or(email).to_string()
    }
}

impl Record for User {
    const STORE_KEY: &'static str = config::USERS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A step inside a goal. Only ever stored as part of its goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub deadline: Option<NaiveDate>,
    /// 0..=100
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Record for Goal {
    const STORE_KEY: &'static str = config::GOALS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A friend entry. Purely local; not linked to another account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Single upper-case initial
    pub avatar: String,
    #[serde(default)]
    pub goals_completed: u32,
    #[serde(default)]
    pub active_goals: u32,
    pub joined_date: DateTime<Utc>,
}

impl Record for Friend {
    const STORE_KEY: &'static str = config::FRIENDS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Requests are recorded but never move past pending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: RequestStatus,
}

impl Record for FriendRequest {
    const STORE_KEY: &'static str = config::FRIEND_REQUESTS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Feed entry. The feed is append-only and never pruned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// Email of the user whose action produced the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Record for Activity {
    const STORE_KEY: &'static str = config::ACTIVITIES_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Message sent from the help page contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub topic: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Record for SupportRequest {
    const STORE_KEY: &'static str = config::SUPPORT_REQUESTS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// App-level copy of the latest check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSnapshot {
    pub user_id: String,
    pub streak: u32,
    pub last_check_in_date: NaiveDate,
    pub updated_at: DateTime<Utc>,
}
