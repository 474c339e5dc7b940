//! Application configuration constants
//!
//! Central location for store keys, validation boundaries and timings
//! used throughout the application.

use std::time::Duration;

// ===== Store Keys =====

/// Logged-in user record (password stripped). Its presence is the login.
pub const CURRENT_USER_KEY: &str = "goalforgeCurrentUser";
/// Every registered user, password hashes included
pub const USERS_KEY: &str = "goalforgeUsers";
pub const GOALS_KEY: &str = "goalforge-goals";
pub const FRIENDS_KEY: &str = "goalforge-friends";
pub const FRIEND_REQUESTS_KEY: &str = "goalforge-friend-requests";
/// Activity feed, newest first
pub const ACTIVITIES_KEY: &str = "goalforge-activities";
pub const SUPPORT_REQUESTS_KEY: &str = "goalforgeSupportRequests";
/// App-level streak snapshot written on every check-in
pub const CHECK_IN_KEY: &str = "goalforge-checkin";

// ===== Storage =====

/// Database file name inside the data directory
pub const DATABASE_FILE_NAME: &str = "goalforge.db";

/// Directory name under the platform data dir when none is configured
pub const DEFAULT_DATA_DIR_NAME: &str = "goalforge";

// ===== Auth Limits =====

/// Minimum password length accepted at sign-up and log-in
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Email shape check. Deliberately loose: something@something.tld
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

// ===== Goals =====

/// Category assigned when the create form leaves it blank
pub const DEFAULT_GOAL_CATEGORY: &str = "Personal";

pub const GOAL_COMPLETE_PROGRESS: u8 = 100;

// ===== Friends =====

/// Delay before a sent friend request is "accepted"
pub const FRIEND_ACCEPT_DELAY: Duration = Duration::from_secs(2);

/// Number of activities shown in the feed previews
pub const ACTIVITY_FEED_PREVIEW: usize = 5;

/// Upper bound (exclusive) of the simulated completed-goal count
pub const SIMULATED_MAX_GOALS_COMPLETED: u32 = 10;

/// Upper bound (inclusive) of the simulated active-goal count
pub const SIMULATED_MAX_ACTIVE_GOALS: u32 = 5;

/// People offered in the "suggested friends" panel
pub const FRIEND_SUGGESTIONS: &[(&str, &str)] = &[
    ("Alex Johnson", "alex@example.com"),
    ("Sarah Miller", "sarah@example.com"),
    ("Mike Chen", "mike@example.com"),
];

// ===== Notices =====

/// How long success and info notices stay visible
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Errors linger a little longer
pub const ERROR_NOTICE_DURATION: Duration = Duration::from_secs(4);
