//! Goal commands

use crate::app::AppState;
use crate::cli::GoalsCommand;
use crate::database::GoalStatus;
use crate::error::{AppError, Result};
use crate::notify::{Notice, NoticeBoard};
use crate::services::{Confirm, CreateGoalRequest, UpdateGoalRequest};
use crate::views::{GoalCardView, GoalListView, Render};

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("goal {}", id))
}

pub async fn run(
    state: &AppState,
    command: GoalsCommand,
    confirm: &dyn Confirm,
    board: &mut NoticeBoard,
) -> Result<String> {
    let session = state.session().await?;
    let goals = &state.goals_service;

    match command {
        GoalsCommand::List { filter } => {
            let list = goals.list(&session, filter).await?;
            Ok(GoalListView { goals: &list, filter }.render())
        }

        GoalsCommand::Add {
            title,
            description,
            category,
            deadline,
        } => {
            let goal = goals
                .create(
                    &session,
                    CreateGoalRequest {
                        title,
                        description: description.unwrap_or_default(),
                        category: category.unwrap_or_default(),
                        deadline,
                    },
                )
                .await?;

            board.post(Notice::success("Goal created successfully!"));
            Ok(GoalCardView { goal: &goal }.render())
        }

        GoalsCommand::Show { id } => {
            let goal = goals.get(&session, &id).await?.ok_or_else(|| not_found(&id))?;
            Ok(GoalCardView { goal: &goal }.render())
        }

        GoalsCommand::Edit {
            id,
            title,
            description,
            category,
            deadline,
            clear_deadline,
        } => {
            let deadline = if clear_deadline { Some(None) } else { deadline.map(Some) };
            let req = UpdateGoalRequest {
                title,
                description,
                category,
                deadline,
                milestones: None,
            };

            let goal = goals
                .update(&session, &id, req)
                .await?
                .ok_or_else(|| not_found(&id))?;

            board.post(Notice::success("Goal updated successfully!"));
            Ok(GoalCardView { goal: &goal }.render())
        }

        GoalsCommand::Toggle { id } => {
            let Some(goal) = goals.toggle_complete(&session, &id).await? else {
                board.post(Notice::info(format!("No goal {}", id)));
                return Ok(String::new());
            };

            let text = match goal.status {
                GoalStatus::Completed => "Goal completed! Great job!",
                GoalStatus::Active => "Goal reactivated!",
            };
            board.post(Notice::success(text));
            Ok(String::new())
        }

        GoalsCommand::Delete { id } => {
            session.require_user()?;
            if !confirm.confirm("Are you sure you want to delete this goal?") {
                board.post(Notice::info("Delete cancelled"));
                return Ok(String::new());
            }

            match goals.delete(&session, &id).await? {
                Some(_) => board.post(Notice::success("Goal deleted successfully!")),
                None => board.post(Notice::info(format!("No goal {}", id))),
            }
            Ok(String::new())
        }

        GoalsCommand::Stats => {
            let stats = goals.stats(&session).await?;
            Ok(format!(
                "Total: {}  Active: {}  Completed: {}\n",
                stats.total, stats.active, stats.completed
            ))
        }
    }
}
