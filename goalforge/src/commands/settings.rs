//! Settings commands

use crate::app::AppState;
use crate::cli::SettingsCommand;
use crate::error::Result;
use crate::notify::{Notice, NoticeBoard};
use crate::services::{Confirm, SettingKey};
use crate::views::{Render, SettingsView};

pub async fn run(
    state: &AppState,
    command: SettingsCommand,
    confirm: &dyn Confirm,
    board: &mut NoticeBoard,
) -> Result<String> {
    let mut session = state.session().await?;
    let settings = &state.settings_service;

    match command {
        SettingsCommand::Show => {
            let stats = settings.stats(&session).await?;
            let user = session.require_user()?;
            Ok(SettingsView { user, stats: &stats }.render())
        }

        SettingsCommand::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            settings.set(&mut session, key, &value).await?;

            let section = match key.category() {
                "notifications" => "Notification",
                "privacy" => "Privacy",
                _ => "Appearance",
            };
            board.post(Notice::success(format!("{} settings saved!", section)));
            Ok(String::new())
        }

        SettingsCommand::Profile { display_name, bio } => {
            settings.update_profile(&mut session, &display_name, bio.as_deref()).await?;
            board.post(Notice::success("Profile updated successfully!"));
            Ok(String::new())
        }

        SettingsCommand::DeleteAccount => {
            if settings.delete_account(&mut session, confirm).await? {
                board.post(Notice::success("Account deleted successfully"));
            } else {
                board.post(Notice::info("Account deletion cancelled"));
            }
            Ok(String::new())
        }
    }
}
