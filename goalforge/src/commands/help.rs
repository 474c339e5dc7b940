//! Help commands

use crate::app::AppState;
use crate::cli::HelpCommand;
use crate::error::Result;
use crate::notify::{Notice, NoticeBoard};
use crate::views::{FaqResultsView, Render};

pub async fn run(state: &AppState, command: HelpCommand, board: &mut NoticeBoard) -> Result<String> {
    let session = state.session().await?;

    match command {
        HelpCommand::Search { query } => {
            let query = query.join(" ");
            let matches = state.help_service.search(&session, &query)?;
            Ok(FaqResultsView {
                query: &query,
                matches: &matches,
            }
            .render())
        }

        HelpCommand::Contact { topic, message } => {
            state
                .help_service
                .submit_support_request(&session, &topic, &message)
                .await?;

            board.post(Notice::success(
                "Your message has been sent! We'll get back to you within 24 hours.",
            ));
            Ok(String::new())
        }
    }
}
