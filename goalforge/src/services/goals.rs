//! Goals service
//!
//! Create, edit, complete and delete goals. Completion is a two-state
//! toggle: it does not follow progress, it sets it.

use crate::config;
use crate::database::{new_id, Goal, GoalStatus, LocalStore, Milestone};
use crate::error::{AppError, Result};
use crate::services::collection::Collection;
use crate::session::Session;
use chrono::{NaiveDate, Utc};
use std::str::FromStr;

/// Which goals a list shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GoalFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl GoalFilter {
    pub fn matches(self, goal: &Goal) -> bool {
        match self {
            GoalFilter::All => true,
            GoalFilter::Active => goal.status == GoalStatus::Active,
            GoalFilter::Completed => goal.status == GoalStatus::Completed,
        }
    }

    pub fn apply(self, goals: &[Goal]) -> Vec<Goal> {
        goals.iter().filter(|g| self.matches(g)).cloned().collect()
    }
}

impl FromStr for GoalFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(GoalFilter::All),
            "active" => Ok(GoalFilter::Active),
            "completed" => Ok(GoalFilter::Completed),
            other => Err(AppError::Validation(format!(
                "Unknown filter: {} (expected all, active or completed)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for GoalFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalFilter::All => write!(f, "all"),
            GoalFilter::Active => write!(f, "active"),
            GoalFilter::Completed => write!(f, "completed"),
        }
    }
}

/// Create goal request
#[derive(Debug, Clone, Default)]
pub struct CreateGoalRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub deadline: Option<NaiveDate>,
}

/// Update goal request. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<Option<NaiveDate>>,
    pub milestones: Option<Vec<Milestone>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl GoalStats {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let completed = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count();

        Self {
            total: goals.len(),
            active: goals.len() - completed,
            completed,
        }
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Goal title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

fn category_or_default(category: &str) -> String {
    match category.trim() {
        "" => config::DEFAULT_GOAL_CATEGORY.to_string(),
        other => other.to_string(),
    }
}

/// Service for managing goals
#[derive(Clone)]
pub struct GoalsService {
    store: LocalStore,
}

impl GoalsService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    async fn goals(&self, session: &Session) -> Result<Collection<Goal>> {
        session.require_user()?;
        Collection::load(&self.store).await
    }

    /// Create a new active goal with no progress
    pub async fn create(&self, session: &Session, req: CreateGoalRequest) -> Result<Goal> {
        let title = validate_title(&req.title)?;
        let mut goals = self.goals(session).await?;

        let category = category_or_default(&req.category);

        let goal = Goal {
            id: new_id(),
            title,
            description: req.description.trim().to_string(),
            category,
            deadline: req.deadline,
            progress: 0,
            status: GoalStatus::Active,
            created_at: Utc::now(),
            completed_at: None,
            milestones: Vec::new(),
        };

        goals.push(goal.clone()).await?;

        tracing::info!("Goal created: {} ({})", goal.title, goal.id);
        Ok(goal)
    }

    pub async fn get(&self, session: &Session, id: &str) -> Result<Option<Goal>> {
        Ok(self.goals(session).await?.find(id).cloned())
    }

    /// Goals matching `filter`, in creation order
    pub async fn list(&self, session: &Session, filter: GoalFilter) -> Result<Vec<Goal>> {
        let goals = self.goals(session).await?;
        Ok(filter.apply(goals.items()))
    }

    /// Apply the provided fields. Unknown id: `None`, nothing written.
    pub async fn update(&self, session: &Session, id: &str, req: UpdateGoalRequest) -> Result<Option<Goal>> {
        let title = req.title.as_deref().map(validate_title).transpose()?;
        let mut goals = self.goals(session).await?;

        let updated = goals
            .update(id, |goal| {
                if let Some(title) = title {
                    goal.title = title;
                }
                if let Some(description) = req.description {
                    goal.description = description.trim().to_string();
                }
                if let Some(category) = req.category {
                    goal.category = category_or_default(&category);
                }
                if let Some(deadline) = req.deadline {
                    goal.deadline = deadline;
                }
                if let Some(milestones) = req.milestones {
                    goal.milestones = milestones;
                }
            })
            .await?;

        match &updated {
            Some(goal) => tracing::info!("Goal updated: {}", goal.id),
            None => tracing::debug!("Update ignored, no goal {}", id),
        }
        Ok(updated)
    }

    /// Flip between active (progress 0) and completed (progress 100)
    pub async fn toggle_complete(&self, session: &Session, id: &str) -> Result<Option<Goal>> {
        let mut goals = self.goals(session).await?;

        let toggled = goals
            .update(id, |goal| match goal.status {
                GoalStatus::Completed => {
                    goal.status = GoalStatus::Active;
                    goal.progress = 0;
                    goal.completed_at = None;
                }
                GoalStatus::Active => {
                    goal.status = GoalStatus::Completed;
                    goal.progress = config::GOAL_COMPLETE_PROGRESS;
                    goal.completed_at = Some(Utc::now());
                }
            })
            .await?;

        if let Some(goal) = &toggled {
            tracing::info!("Goal {} is now {}", goal.id, goal.status);
        }
        Ok(toggled)
    }

    /// Remove a goal. Unknown id: `None`, nothing written.
    pub async fn delete(&self, session: &Session, id: &str) -> Result<Option<Goal>> {
        let mut goals = self.goals(session).await?;
        let removed = goals.remove(id).await?;

        if let Some(goal) = &removed {
            tracing::info!("Goal deleted: {}", goal.id);
        }
        Ok(removed)
    }

    pub async fn stats(&self, session: &Session) -> Result<GoalStats> {
        let goals = self.goals(session).await?;
        Ok(GoalStats::from_goals(goals.items()))
    }
}
