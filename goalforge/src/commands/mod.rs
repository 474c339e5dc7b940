//! Commands run from the terminal
//!
//! This module organizes commands into logical submodules:
//! - `auth`: Sign up, log in, log out
//! - `dashboard`: Overview and daily check-in
//! - `goals`: Goal CRUD and filtering
//! - `friends`: Friend requests, list and activity feed
//! - `settings`: Preferences, profile and account deletion
//! - `help`: FAQ search and support requests
//!
//! Every command returns the text to print on stdout and reports outcomes
//! through the notice board.

pub mod auth;
pub mod dashboard;
pub mod friends;
pub mod goals;
pub mod help;
pub mod settings;

use crate::app::AppState;
use crate::cli::Command;
use crate::error::Result;
use crate::notify::NoticeBoard;
use crate::services::Confirm;

/// Confirmation read from the terminal, unless `--yes` was given
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!("Confirmation prompt failed, treating as no: {}", e);
                false
            })
    }
}

/// Dispatch one parsed command
pub async fn run(
    state: &AppState,
    command: Command,
    confirm: &dyn Confirm,
    board: &mut NoticeBoard,
) -> Result<String> {
    match command {
        Command::Signup(creds) => auth::sign_up(state, creds, board).await,
        Command::Login(creds) => auth::log_in(state, creds, board).await,
        Command::Logout => auth::log_out(state, board).await,
        Command::Whoami => auth::whoami(state).await,
        Command::Dashboard => dashboard::show(state).await,
        Command::Checkin => dashboard::check_in(state, board).await,
        Command::Goals(cmd) => goals::run(state, cmd, confirm, board).await,
        Command::Friends(cmd) => friends::run(state, cmd, confirm, board).await,
        Command::Settings(cmd) => settings::run(state, cmd, confirm, board).await,
        Command::Help(cmd) => help::run(state, cmd, board).await,
    }
}
