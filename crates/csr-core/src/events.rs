use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::question::{QuestionKind, ResponseState};

/// Which of the two tests an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Aptitude,
    Personality,
}

/// Every state change in a test session produces an Event.
/// The presentation layer polls `snapshot()` and consumes command results;
/// the core never reaches into UI widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The session moved to (or refreshed) a question.
    QuestionShown {
        test: TestKind,
        index: usize,
        total: usize,
        question_id: i64,
        at: DateTime<Utc>,
    },
    /// An aptitude response was reset to Unanswered.
    ResponseCleared {
        index: usize,
        at: DateTime<Utc>,
    },
    /// A personality question was answered with the given score.
    QuestionScored {
        index: usize,
        stream: String,
        score: f64,
        at: DateTime<Utc>,
    },
    /// A personality question was skipped (scored 0, counted per stream).
    QuestionSkipped {
        index: usize,
        stream: String,
        at: DateTime<Utc>,
    },
    /// The user asked to quit; awaiting confirm or cancel.
    QuitRequested {
        test: TestKind,
        at: DateTime<Utc>,
    },
    /// The quit request was cancelled; the session continues.
    QuitCancelled {
        test: TestKind,
        at: DateTime<Utc>,
    },
    /// The session was abandoned without scoring.
    SessionAbandoned {
        test: TestKind,
        at: DateTime<Utc>,
    },
    /// Terminal: scores were computed and persisted.
    TestFinished {
        test: TestKind,
        /// True when the aptitude countdown forced finalization. The flag
        /// changes the completion message only, never the scores.
        finished_by_timer: bool,
        scores: BTreeMap<String, i32>,
        at: DateTime<Utc>,
    },
    /// Full state snapshot of an aptitude session.
    AptitudeSnapshot {
        session_id: Uuid,
        index: usize,
        total: usize,
        question_id: i64,
        state: ResponseState,
        pending_option: Option<u8>,
        pending_confidence: u8,
        remaining_secs: u64,
        next_label: String,
        mark_label: String,
        at: DateTime<Utc>,
    },
    /// Full state snapshot of a personality session.
    PersonalitySnapshot {
        session_id: Uuid,
        index: usize,
        total: usize,
        question_id: i64,
        kind: QuestionKind,
        next_label: String,
        finished: bool,
        at: DateTime<Utc>,
    },
}
