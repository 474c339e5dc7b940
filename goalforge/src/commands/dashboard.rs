//! Dashboard commands

use crate::app::AppState;
use crate::error::Result;
use crate::notify::{Notice, NoticeBoard};
use crate::services::CheckInOutcome;
use crate::views::{DashboardView, Render};
use chrono::Utc;

pub async fn show(state: &AppState) -> Result<String> {
    let session = state.session().await?;
    let summary = state.dashboard_service.summary(&session).await?;

    Ok(DashboardView {
        summary: &summary,
        now: Utc::now(),
    }
    .render())
}

pub async fn check_in(state: &AppState, board: &mut NoticeBoard) -> Result<String> {
    let mut session = state.session().await?;

    match state.dashboard_service.check_in(&mut session).await? {
        CheckInOutcome::CheckedIn { streak } => {
            board.post(Notice::success(format!("Checked in! Streak: {}", streak)));
        }
        CheckInOutcome::AlreadyCheckedIn { streak } => {
            board.post(Notice::info(format!(
                "You already checked in today. Streak: {}",
                streak
            )));
        }
    }

    Ok(String::new())
}
