// GoalForge - local-first goal tracking and accountability
// Entry point and application setup

use clap::Parser;
use goalforge::cli::Cli;
use goalforge::commands::{self, PromptConfirm};
use goalforge::notify::{Notice, NoticeBoard, NoticeLevel};
use goalforge::{app, error::AppError};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_notices(board: &mut NoticeBoard) {
    for notice in board.drain() {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.text),
            NoticeLevel::Info => println!("ℹ {}", notice.text),
            NoticeLevel::Error => eprintln!("✗ {}", notice.text),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goalforge=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => app::default_data_dir()?,
    };

    tracing::debug!("Starting GoalForge");
    let state = app::setup(&data_dir).await?;

    let confirm = PromptConfirm::new(cli.yes);
    let mut board = NoticeBoard::new();

    let result = commands::run(&state, cli.command, &confirm, &mut board).await;
    let code = match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if !err.is_user_facing() {
                tracing::error!("Command failed: {}", err);
            }
            board.post(Notice::from(&err));
            exit_code(&err)
        }
    };

    print_notices(&mut board);
    Ok(code)
}

fn exit_code(err: &AppError) -> ExitCode {
    match err {
        AppError::Validation(_) | AppError::Conflict(_) => ExitCode::from(2),
        AppError::Auth(_) => ExitCode::from(3),
        AppError::NotFound(_) => ExitCode::from(4),
        _ => ExitCode::FAILURE,
    }
}
