//! Friend commands

use crate::app::AppState;
use crate::cli::FriendsCommand;
use crate::error::Result;
use crate::notify::{Notice, NoticeBoard};
use crate::services::{AddOutcome, Confirm, RemoveOutcome};
use crate::views::{ActivityFeedView, FriendListView, Render};
use chrono::Utc;
use std::fmt::Write;

fn report_add(outcome: AddOutcome, board: &mut NoticeBoard) {
    match outcome {
        AddOutcome::Added(friend) => board.post(Notice::success(format!(
            "{} accepted your friend request!",
            friend.name
        ))),
        AddOutcome::AlreadyFriends(_) => board.post(Notice::info("This friend is already in your list")),
    }
}

pub async fn run(
    state: &AppState,
    command: FriendsCommand,
    confirm: &dyn Confirm,
    board: &mut NoticeBoard,
) -> Result<String> {
    let session = state.session().await?;
    let friends = &state.friends_service;

    match command {
        FriendsCommand::List { search } => {
            let list = friends.search(&session, search.as_deref().unwrap_or("")).await?;
            let suggestions = friends.suggestions(&session).await?;

            Ok(FriendListView {
                friends: &list,
                query: search.as_deref(),
                suggestions: &suggestions,
            }
            .render())
        }

        FriendsCommand::Request { email, message } => {
            let (request, pending) = friends.request(&session, &email, &message).await?;
            board.post(Notice::success(format!("Friend request sent to {}", request.email)));

            report_add(pending.wait().await?, board);
            Ok(String::new())
        }

        FriendsCommand::Add { email } => {
            let outcome = friends.quick_add(&session, &email).await?;
            report_add(outcome, board);
            Ok(String::new())
        }

        FriendsCommand::Remove { id } => {
            match friends.remove(&session, &id, confirm).await? {
                RemoveOutcome::Removed(friend) => {
                    board.post(Notice::success(format!("{} removed from your friends", friend.name)));
                }
                RemoveOutcome::Cancelled => board.post(Notice::info("Remove cancelled")),
                RemoveOutcome::NotFound => board.post(Notice::info(format!("No friend {}", id))),
            }
            Ok(String::new())
        }

        FriendsCommand::Requests => {
            let requests = friends.requests(&session).await?;
            if requests.is_empty() {
                return Ok("No friend requests sent\n".to_string());
            }

            let mut out = String::new();
            for request in requests {
                let _ = write!(
                    out,
                    "{}  {:?}  {}",
                    request.email,
                    request.status,
                    request.timestamp.date_naive()
                );
                if !request.message.is_empty() {
                    let _ = write!(out, "  \"{}\"", request.message);
                }
                out.push('\n');
            }
            Ok(out)
        }

        FriendsCommand::Activity { limit } => {
            let feed = friends.activities(&session, limit).await?;
            Ok(ActivityFeedView {
                activities: &feed,
                now: Utc::now(),
            }
            .render())
        }
    }
}
