//! Account commands

use crate::app::AppState;
use crate::cli::Credentials;
use crate::error::{AppError, Result};
use crate::notify::{Notice, NoticeBoard};

fn prompt_password(prompt: &str) -> Result<String> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| AppError::Generic(format!("Failed to read password: {}", e)))
}

pub async fn sign_up(state: &AppState, creds: Credentials, board: &mut NoticeBoard) -> Result<String> {
    let (password, confirm) = match creds.password {
        Some(password) => (password.clone(), password),
        None => (prompt_password("Password")?, prompt_password("Confirm password")?),
    };

    let session = state
        .auth_service
        .sign_up(&creds.email, &password, &confirm)
        .await?;

    board.post(Notice::success("🎉 Account created successfully!"));
    Ok(session
        .current_user()
        .map(|u| format!("Logged in as {}\n", u.email))
        .unwrap_or_default())
}

pub async fn log_in(state: &AppState, creds: Credentials, board: &mut NoticeBoard) -> Result<String> {
    let password = match creds.password {
        Some(password) => password,
        None => prompt_password("Password")?,
    };

    let session = state.auth_service.log_in(&creds.email, &password).await?;

    if let Some(user) = session.current_user() {
        board.post(Notice::success(format!("Welcome back, {}!", user.display_name)));
    }
    Ok(String::new())
}

pub async fn log_out(state: &AppState, board: &mut NoticeBoard) -> Result<String> {
    let mut session = state.session().await?;
    state.auth_service.log_out(&mut session).await?;

    board.post(Notice::success("Logged out successfully"));
    Ok(String::new())
}

pub async fn whoami(state: &AppState) -> Result<String> {
    Ok(match state.auth_service.current_user().await? {
        Some(user) => format!("{} <{}>\n", user.display_name, user.email),
        None => "Not logged in\n".to_string(),
    })
}
