//! Dashboard service
//!
//! Read-only summary of the logged-in user plus the daily check-in.

use crate::config;
use crate::database::{Activity, CheckInSnapshot, Friend, Goal, LocalStore};
use crate::error::Result;
use crate::services::collection::Collection;
use crate::services::friends::record_activity;
use crate::services::goals::GoalStats;
use crate::session::Session;
use chrono::{Local, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub display_name: String,
    pub goals: GoalStats,
    pub streak: u32,
    pub checked_in_today: bool,
    pub friends: usize,
    pub recent_activity: Vec<Activity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    CheckedIn { streak: u32 },
    AlreadyCheckedIn { streak: u32 },
}

#[derive(Clone)]
pub struct DashboardService {
    store: LocalStore,
}

impl DashboardService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub async fn summary(&self, session: &Session) -> Result<DashboardSummary> {
        self.summary_on(session, Local::now().date_naive()).await
    }

    pub async fn summary_on(&self, session: &Session, today: NaiveDate) -> Result<DashboardSummary> {
        let user = session.require_user()?;

        let goals = Collection::<Goal>::load(&self.store).await?;
        let friends = Collection::<Friend>::load(&self.store).await?;
        let feed = Collection::<Activity>::load(&self.store).await?;

        Ok(DashboardSummary {
            display_name: user.display_name.clone(),
            goals: GoalStats::from_goals(goals.items()),
            streak: user.streak,
            checked_in_today: user.last_check_in_date == Some(today),
            friends: friends.len(),
            recent_activity: feed
                .into_items()
                .into_iter()
                .take(config::ACTIVITY_FEED_PREVIEW)
                .collect(),
        })
    }

    /// Check in for the local calendar day
    pub async fn check_in(&self, session: &mut Session) -> Result<CheckInOutcome> {
        self.check_in_on(session, Local::now().date_naive()).await
    }

    /// Once per calendar day. A missed day does not reset the streak.
    pub async fn check_in_on(&self, session: &mut Session, today: NaiveDate) -> Result<CheckInOutcome> {
        let mut user = session.require_user()?.clone();

        if user.last_check_in_date == Some(today) {
            return Ok(CheckInOutcome::AlreadyCheckedIn { streak: user.streak });
        }

        user.streak += 1;
        user.last_check_in_date = Some(today);
        let streak = user.streak;

        let snapshot = CheckInSnapshot {
            user_id: user.id.clone(),
            streak,
            last_check_in_date: today,
            updated_at: Utc::now(),
        };
        let email = user.email.clone();

        session.persist_user(&self.store, user).await?;
        self.store.save(config::CHECK_IN_KEY, &snapshot).await?;
        record_activity(
            &self.store,
            Some(email.as_str()),
            format!("You checked in! Current streak: {} {}", streak, days(streak)),
        )
        .await?;

        tracing::info!("Checked in on {} (streak {})", today, streak);
        Ok(CheckInOutcome::CheckedIn { streak })
    }
}

fn days(n: u32) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}
