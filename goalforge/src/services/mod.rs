//! Services module
//!
//! Business logic services that coordinate between commands and the local store.

pub mod auth;
pub mod collection;
pub mod dashboard;
pub mod friends;
pub mod goals;
pub mod help;
pub mod settings;

pub use auth::AuthService;
pub use dashboard::{CheckInOutcome, DashboardService, DashboardSummary};
pub use friends::{AddOutcome, FriendsService, PendingAcceptance, RemoveOutcome, Suggestion};
pub use goals::{CreateGoalRequest, GoalFilter, GoalStats, GoalsService, UpdateGoalRequest};
pub use help::{FaqMatch, FaqSection, HelpService};
pub use settings::{AccountStats, SettingKey, SettingsService, UserSettings};

/// Yes/no gate in front of destructive actions
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Pre-answered confirmation (`--yes`, tests)
impl Confirm for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}
