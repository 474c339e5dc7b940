//! CLI module - Command-line interface for GoalForge
//!
//! One subcommand per page of the app. Every invocation reads the
//! current-user slot first, so a login persists between runs.

use crate::services::GoalFilter;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// GoalForge - goals, streaks and accountability friends
#[derive(Parser, Debug)]
#[command(name = "goalforge")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Directory holding goalforge.db
    #[arg(long, global = true, env = "GOALFORGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and log in
    Signup(Credentials),

    /// Log in to an existing account
    Login(Credentials),

    /// Log out
    Logout,

    /// Show who is logged in
    Whoami,

    /// Goals overview, streak and recent activity
    #[command(alias = "home")]
    Dashboard,

    /// Daily check-in
    Checkin,

    /// Manage goals
    #[command(subcommand)]
    Goals(GoalsCommand),

    /// Manage friends
    #[command(subcommand)]
    Friends(FriendsCommand),

    /// View and change settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// FAQ search and support
    #[command(subcommand)]
    Help(HelpCommand),
}

#[derive(Args, Debug)]
pub struct Credentials {
    /// Account email
    #[arg(long, short)]
    pub email: String,

    /// Password (prompted for when omitted)
    #[arg(long, env = "GOALFORGE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum GoalsCommand {
    /// List goals
    #[command(alias = "ls")]
    List {
        /// all, active or completed
        #[arg(long, short, default_value_t = GoalFilter::All)]
        filter: GoalFilter,
    },

    /// Create a goal
    Add {
        title: String,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },

    /// Show one goal
    Show { id: String },

    /// Edit a goal
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
        /// YYYY-MM-DD
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        clear_deadline: bool,
    },

    /// Mark complete, or reactivate a completed goal
    #[command(alias = "complete")]
    Toggle { id: String },

    /// Delete a goal
    #[command(alias = "rm")]
    Delete { id: String },

    /// Goal counts
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum FriendsCommand {
    /// List friends and suggestions
    #[command(alias = "ls")]
    List {
        /// Filter by name or email
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Send a friend request and wait for the reply
    Request {
        email: String,
        #[arg(long, short, default_value = "")]
        message: String,
    },

    /// Add a friend immediately
    Add { email: String },

    /// Remove a friend
    #[command(alias = "rm")]
    Remove { id: String },

    /// Sent friend requests
    Requests,

    /// Recent activity
    Activity {
        #[arg(long, short, default_value_t = crate::config::ACTIVITY_FEED_PREVIEW)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show profile, settings and account stats
    Show,

    /// Change one setting, e.g. `theme dark` or `emailWeeklyReports on`
    Set { key: String, value: String },

    /// Update display name and bio
    Profile {
        #[arg(long)]
        display_name: String,
        /// Left unchanged when omitted
        #[arg(long)]
        bio: Option<String>,
    },

    /// Permanently delete the account
    DeleteAccount,
}

#[derive(Subcommand, Debug)]
pub enum HelpCommand {
    /// Search the FAQ (no query lists everything)
    Search { query: Vec<String> },

    /// Send a message to support
    Contact {
        #[arg(long, short, default_value = "general")]
        topic: String,
        #[arg(long, short)]
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_goal_add() {
        let cli = Cli::try_parse_from([
            "goalforge",
            "--data-dir",
            "/tmp/gf",
            "goals",
            "add",
            "Run 5K",
            "--deadline",
            "2024-06-01",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/gf")));
        match cli.command {
            Command::Goals(GoalsCommand::Add { title, deadline, .. }) => {
                assert_eq!(title, "Run 5K");
                assert_eq!(deadline, NaiveDate::from_ymd_opt(2024, 6, 1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_filter_and_global_yes() {
        let cli = Cli::try_parse_from(["goalforge", "goals", "list", "--filter", "completed", "-y"]).unwrap();

        assert!(cli.yes);
        assert!(matches!(
            cli.command,
            Command::Goals(GoalsCommand::List {
                filter: GoalFilter::Completed
            })
        ));
    }
}
