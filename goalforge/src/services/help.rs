//! Help centre: FAQ search and support requests

use crate::database::{new_id, LocalStore, SupportRequest};
use crate::error::{AppError, Result};
use crate::services::collection::Collection;
use crate::session::Session;
use chrono::Utc;
use regex::RegexBuilder;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqSection {
    GettingStarted,
    Goals,
    Friends,
    Account,
}

impl fmt::Display for FaqSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            FaqSection::GettingStarted => "Getting Started",
            FaqSection::Goals => "Goals",
            FaqSection::Friends => "Friends",
            FaqSection::Account => "Account",
        };
        f.write_str(title)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct FaqEntry {
    pub section: FaqSection,
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        section: FaqSection::GettingStarted,
        question: "How do I create an account?",
        answer: "Sign up with your email address and a password of at least 6 characters. You are logged in straight away.",
    },
    FaqEntry {
        section: FaqSection::GettingStarted,
        question: "Where is my data stored?",
        answer: "Everything stays on this device. Nothing is sent to a server.",
    },
    FaqEntry {
        section: FaqSection::GettingStarted,
        question: "What is a daily check-in?",
        answer: "Checking in once a day grows your streak. You can check in once per calendar day.",
    },
    FaqEntry {
        section: FaqSection::Goals,
        question: "How do I create a goal?",
        answer: "Give the goal a title. Description, category and deadline are optional; the category defaults to Personal.",
    },
    FaqEntry {
        section: FaqSection::Goals,
        question: "How do I mark a goal as complete?",
        answer: "Toggle the goal. Completing sets progress to 100%, and toggling again makes it active.",
    },
    FaqEntry {
        section: FaqSection::Goals,
        question: "Can I delete a goal?",
        answer: "Yes. You will be asked to confirm before the goal is removed.",
    },
    FaqEntry {
        section: FaqSection::Friends,
        question: "How do I add a friend?",
        answer: "Send a friend request to their email address, or use quick add to add them at once.",
    },
    FaqEntry {
        section: FaqSection::Friends,
        question: "What shows up in the activity feed?",
        answer: "New friends, removed friends and your check-ins, newest first.",
    },
    FaqEntry {
        section: FaqSection::Account,
        question: "How do I change my display name?",
        answer: "Open settings and update your profile. The display name cannot be blank.",
    },
    FaqEntry {
        section: FaqSection::Account,
        question: "How do I delete my account?",
        answer: "Delete it from settings. This removes your account from this device and logs you out.",
    },
];

/// An FAQ entry that matched, with byte ranges to highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqMatch {
    pub entry: &'static FaqEntry,
    pub question_highlights: Vec<Range<usize>>,
    pub answer_highlights: Vec<Range<usize>>,
}

/// Case-insensitive FAQ search. A blank query returns every entry unhighlighted.
pub fn search(query: &str) -> Result<Vec<FaqMatch>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(FAQ
            .iter()
            .map(|entry| FaqMatch {
                entry,
                question_highlights: Vec::new(),
                answer_highlights: Vec::new(),
            })
            .collect());
    }

    let re = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| AppError::Generic(format!("Invalid search pattern: {}", e)))?;

    let ranges = |text: &str| -> Vec<Range<usize>> { re.find_iter(text).map(|m| m.range()).collect() };

    Ok(FAQ
        .iter()
        .filter_map(|entry| {
            let question_highlights = ranges(entry.question);
            let answer_highlights = ranges(entry.answer);
            if question_highlights.is_empty() && answer_highlights.is_empty() {
                None
            } else {
                Some(FaqMatch {
                    entry,
                    question_highlights,
                    answer_highlights,
                })
            }
        })
        .collect())
}

#[derive(Clone)]
pub struct HelpService {
    store: LocalStore,
}

impl HelpService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn search(&self, session: &Session, query: &str) -> Result<Vec<FaqMatch>> {
        session.require_user()?;
        search(query)
    }

    /// Queue a support message. Name and email come from the logged-in user.
    pub async fn submit_support_request(
        &self,
        session: &Session,
        topic: &str,
        message: &str,
    ) -> Result<SupportRequest> {
        let user = session.require_user()?;

        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("Please enter a message".to_string()));
        }

        let request = SupportRequest {
            id: new_id(),
            name: user.display_name.clone(),
            email: user.email.clone(),
            topic: topic.trim().to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        };

        let mut requests = Collection::<SupportRequest>::load(&self.store).await?;
        requests.push(request.clone()).await?;

        tracing::info!("Support request submitted by {}", request.email);
        Ok(request)
    }
}
