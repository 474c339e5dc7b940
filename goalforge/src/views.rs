//! Plain-text views
//!
//! Each view borrows the data it shows and renders it for the terminal.
//! Time-dependent views take `now` so output is reproducible.

use crate::database::{Activity, Friend, Goal, GoalStatus, User};
use crate::services::{AccountStats, DashboardSummary, FaqMatch, GoalFilter, SettingKey, Suggestion};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::ops::Range;

pub trait Render {
    fn render(&self) -> String;
}

const PROGRESS_BAR_WIDTH: usize = 20;

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        progress
    )
}

/// "Just now", "5m ago", "3h ago", "2d ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

pub struct GoalCardView<'a> {
    pub goal: &'a Goal,
}

impl Render for GoalCardView<'_> {
    fn render(&self) -> String {
        let goal = self.goal;
        let check = if goal.status == GoalStatus::Completed { "x" } else { " " };

        let mut out = format!("[{}] {} ({})\n", check, goal.title, goal.category);
        if !goal.description.is_empty() {
            let _ = writeln!(out, "    {}", goal.description);
        }
        let _ = writeln!(out, "    {}", progress_bar(goal.progress));
        if let Some(deadline) = goal.deadline {
            let _ = writeln!(out, "    Target: {}", deadline);
        }
        match goal.completed_at {
            Some(at) => {
                let _ = writeln!(out, "    Status: {} on {}", goal.status, at.date_naive());
            }
            None => {
                let _ = writeln!(out, "    Status: {}", goal.status);
            }
        }
        for milestone in &goal.milestones {
            let tick = if milestone.completed { "x" } else { " " };
            let _ = writeln!(out, "    - [{}] {}", tick, milestone.text);
        }
        let _ = writeln!(out, "    id: {}", goal.id);
        out
    }
}

pub struct GoalListView<'a> {
    pub goals: &'a [Goal],
    pub filter: GoalFilter,
}

impl GoalListView<'_> {
    fn empty_state(&self) -> (&'static str, &'static str) {
        match self.filter {
            GoalFilter::All => (
                "No goals yet",
                "No goals yet. Create your first goal to start tracking your progress!",
            ),
            GoalFilter::Active => ("No active goals", "No active goals. Create a goal to get started!"),
            GoalFilter::Completed => (
                "No completed goals",
                "No completed goals yet. Keep working on your active goals!",
            ),
        }
    }
}

impl Render for GoalListView<'_> {
    fn render(&self) -> String {
        if self.goals.is_empty() {
            let (title, message) = self.empty_state();
            return format!("{}\n{}\n", title, message);
        }

        self.goals
            .iter()
            .map(|goal| GoalCardView { goal }.render())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct FriendListView<'a> {
    pub friends: &'a [Friend],
    /// Search term the list was filtered with, if any
    pub query: Option<&'a str>,
    pub suggestions: &'a [Suggestion],
}

impl Render for FriendListView<'_> {
    fn render(&self) -> String {
        let mut out = String::new();

        if self.friends.is_empty() {
            out.push_str("No friends found\n");
            let hint = match self.query {
                Some(q) if !q.trim().is_empty() => "Try a different search term",
                _ => "Add friends to build your accountability network!",
            };
            let _ = writeln!(out, "{}", hint);
        }

        for friend in self.friends {
            let _ = writeln!(
                out,
                "({}) {} <{}>  {} goals completed, {} active  id: {}",
                friend.avatar,
                friend.name,
                friend.email,
                friend.goals_completed,
                friend.active_goals,
                friend.id
            );
        }

        if !self.suggestions.is_empty() {
            out.push_str("\nSuggested friends:\n");
            for suggestion in self.suggestions {
                let _ = writeln!(out, "  {} <{}>", suggestion.name, suggestion.email);
            }
        }

        out
    }
}

pub struct ActivityFeedView<'a> {
    pub activities: &'a [Activity],
    pub now: DateTime<Utc>,
}

impl Render for ActivityFeedView<'_> {
    fn render(&self) -> String {
        if self.activities.is_empty() {
            return "Friend activity will appear here\n".to_string();
        }

        self.activities
            .iter()
            .map(|a| format!("{}  ({})\n", a.message, relative_time(a.timestamp, self.now)))
            .collect()
    }
}

pub struct DashboardView<'a> {
    pub summary: &'a DashboardSummary,
    pub now: DateTime<Utc>,
}

impl Render for DashboardView<'_> {
    fn render(&self) -> String {
        let s = self.summary;
        let mut out = format!("Welcome back, {}!\n\n", s.display_name);

        let _ = writeln!(
            out,
            "Goals: {} total, {} active, {} completed",
            s.goals.total, s.goals.active, s.goals.completed
        );
        let check_in = if s.checked_in_today {
            "checked in today"
        } else {
            "not checked in today"
        };
        let _ = writeln!(out, "Streak: {} ({})", s.streak, check_in);
        let _ = writeln!(out, "Friends: {}", s.friends);

        out.push_str("\nRecent activity:\n");
        out.push_str(
            &ActivityFeedView {
                activities: &s.recent_activity,
                now: self.now,
            }
            .render(),
        );
        out
    }
}

pub struct SettingsView<'a> {
    pub user: &'a User,
    pub stats: &'a AccountStats,
}

impl Render for SettingsView<'_> {
    fn render(&self) -> String {
        let user = self.user;
        let mut out = String::from("Profile\n");
        let _ = writeln!(out, "  displayName: {}", user.display_name);
        let _ = writeln!(out, "  email: {}", user.email);
        if !user.bio.is_empty() {
            let _ = writeln!(out, "  bio: {}", user.bio);
        }
        let _ = writeln!(out, "  member since: {}", user.created_at.date_naive());

        let mut category = "";
        for key in SettingKey::ALL {
            if key.category() != category {
                category = key.category();
                let _ = writeln!(out, "\n{}", category);
            }
            let _ = writeln!(out, "  {}: {}", key.name(), key.value(&user.settings));
        }

        let _ = writeln!(
            out,
            "\nTotal goals: {}  Current streak: {}  Friends: {}",
            self.stats.total_goals, self.stats.current_streak, self.stats.friends
        );
        out
    }
}

/// Wrap each highlighted byte range in `[` `]`
fn mark(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    let mut last = 0;
    for range in ranges {
        out.push_str(&text[last..range.start]);
        out.push('[');
        out.push_str(&text[range.clone()]);
        out.push(']');
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}

pub struct FaqResultsView<'a> {
    pub query: &'a str,
    pub matches: &'a [FaqMatch],
}

impl Render for FaqResultsView<'_> {
    fn render(&self) -> String {
        if self.matches.is_empty() {
            return format!(
                "No results found for \"{}\"\nTry searching with different keywords or browse the categories.\n",
                self.query.trim()
            );
        }

        let mut out = String::new();
        let mut section = None;
        for m in self.matches {
            if section != Some(m.entry.section) {
                section = Some(m.entry.section);
                let _ = writeln!(out, "== {} ==", m.entry.section);
            }
            let _ = writeln!(out, "Q: {}", mark(m.entry.question, &m.question_highlights));
            let _ = writeln!(out, "A: {}\n", mark(m.entry.answer, &m.answer_highlights));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Milestone;
    use crate::services::{help, GoalStats};
    use chrono::{Duration, NaiveDate};

    fn goal(title: &str, status: GoalStatus) -> Goal {
        Goal {
            id: "g1".to_string(),
            title: title.to_string(),
            description: String::new(),
            category: "Health".to_string(),
            deadline: NaiveDate::from_ymd_opt(2024, 6, 1),
            progress: if status == GoalStatus::Completed { 100 } else { 40 },
            status,
            created_at: Utc::now(),
            completed_at: None,
            milestones: vec![Milestone {
                text: "First 1K".to_string(),
                completed: true,
            }],
        }
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();

        assert_eq!(relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), format!("[{}] 0%", "-".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}] 50%", "#".repeat(10), "-".repeat(10)));
    }

    #[test]
    fn test_goal_card() {
        let active = goal("Run 5K", GoalStatus::Active);
        let card = GoalCardView { goal: &active }.render();

        assert!(card.starts_with("[ ] Run 5K (Health)"));
        assert!(card.contains("Target: 2024-06-01"));
        assert!(card.contains("- [x] First 1K"));
        assert!(card.contains("Status: active"));
    }

    #[test]
    fn test_empty_goal_lists() {
        let all = GoalListView { goals: &[], filter: GoalFilter::All }.render();
        assert!(all.contains("Create your first goal"));

        let completed = GoalListView {
            goals: &[],
            filter: GoalFilter::Completed,
        }
        .render();
        assert!(completed.starts_with("No completed goals"));
    }

    #[test]
    fn test_friend_list_empty_states() {
        let plain = FriendListView {
            friends: &[],
            query: None,
            suggestions: &[],
        }
        .render();
        assert!(plain.contains("Add friends to build your accountability network!"));

        let searched = FriendListView {
            friends: &[],
            query: Some("zed"),
            suggestions: &[],
        }
        .render();
        assert!(searched.contains("Try a different search term"));
    }

    #[test]
    fn test_dashboard_view() {
        let now = Utc::now();
        let summary = DashboardSummary {
            display_name: "Alice".to_string(),
            goals: GoalStats {
                total: 3,
                active: 2,
                completed: 1,
            },
            streak: 4,
            checked_in_today: true,
            friends: 2,
            recent_activity: vec![Activity {
                id: "a1".to_string(),
                user: None,
                message: "Mike accepted your friend request and joined GoalForge!".to_string(),
                timestamp: now - Duration::hours(2),
            }],
        };

        let text = DashboardView { summary: &summary, now }.render();

        assert!(text.starts_with("Welcome back, Alice!"));
        assert!(text.contains("Goals: 3 total, 2 active, 1 completed"));
        assert!(text.contains("Streak: 4 (checked in today)"));
        assert!(text.contains("joined GoalForge!  (2h ago)"));
    }

    #[test]
    fn test_faq_highlighting() {
        let matches = help::search("goal").unwrap();
        let text = FaqResultsView {
            query: "goal",
            matches: &matches,
        }
        .render();

        assert!(text.contains("Q: How do I create a [goal]?"));

        let none = FaqResultsView {
            query: "blockchain",
            matches: &[],
        }
        .render();
        assert!(none.starts_with("No results found for \"blockchain\""));
    }

    #[test]
    fn test_mark_preserves_original_case() {
        assert_eq!(mark("Goal goals", &[0..4, 5..9]), "[Goal] [goal]s");
    }
}
