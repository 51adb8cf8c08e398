//! Aptitude test session.
//!
//! A state machine over an ordered question list. Each question moves
//! `Unanswered -> Answered` (option + confidence committed by Next) and may
//! move to `Marked` (same data, revisit-later intent) or back to
//! `Unanswered` via an explicit clear. The uncommitted selection lives on
//! the session and is only committed by `advance`; navigating to another
//! question restores the selection from that question's committed response.
//!
//! ## Scoring
//!
//! At finalization every non-Unanswered question contributes
//! `confidence / questions_in_its_category`, positive when the selected
//! option is correct and negative otherwise. Category sums are rounded to
//! the nearest integer and persisted in a single transaction together with
//! the completion flag.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::countdown::Countdown;
use crate::error::{CoreError, Result};
use crate::events::{Event, TestKind};
use crate::question::{AptitudeQuestion, AptitudeResponse, ResponseState};
use crate::storage::{Config, QuestionBank, ResultStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Active,
    /// A quit was requested and awaits confirm/cancel.
    QuitPending,
    /// Scores computed and persisted. Terminal.
    Finished,
    /// Quit confirmed before finishing; nothing persisted. Terminal.
    Abandoned,
}

/// One run of the aptitude test.
///
/// Owns its response list for the lifetime of the test screen; only the
/// derived category scores survive finalization.
#[derive(Debug)]
pub struct AptitudeSession {
    id: Uuid,
    questions: Vec<AptitudeQuestion>,
    responses: Vec<AptitudeResponse>,
    /// Question count per category, the divisor of every contribution.
    category_totals: HashMap<String, usize>,
    current: usize,
    /// Uncommitted selection for the current question.
    pending_option: Option<u8>,
    pending_confidence: u8,
    countdown: Countdown,
    phase: SessionPhase,
}

impl AptitudeSession {
    /// Load all aptitude questions and start the countdown.
    ///
    /// # Errors
    /// Fails if the bank cannot be read or holds no aptitude questions.
    pub fn begin(bank: &dyn QuestionBank, config: &Config) -> Result<Self> {
        let questions = bank.aptitude_questions()?;
        if questions.is_empty() {
            return Err(CoreError::Precondition(
                "aptitude question bank is empty".into(),
            ));
        }

        let mut category_totals: HashMap<String, usize> = HashMap::new();
        for q in &questions {
            *category_totals.entry(q.category.clone()).or_default() += 1;
        }

        let id = Uuid::new_v4();
        debug!(
            session = %id,
            questions = questions.len(),
            categories = category_totals.len(),
            budget_min = config.aptitude.time_budget_min,
            "aptitude session started"
        );

        let responses = vec![AptitudeResponse::new(); questions.len()];
        Ok(Self {
            id,
            questions,
            responses,
            category_totals,
            current: 0,
            pending_option: None,
            pending_confidence: 0,
            countdown: Countdown::start(config.aptitude.time_budget_min * 60),
            phase: SessionPhase::Active,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &AptitudeQuestion {
        &self.questions[self.current]
    }

    pub fn response(&self, index: usize) -> &AptitudeResponse {
        &self.responses[index]
    }

    pub fn pending_option(&self) -> Option<u8> {
        self.pending_option
    }

    pub fn pending_confidence(&self) -> u8 {
        self.pending_confidence
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    fn at_last_question(&self) -> bool {
        self.current == self.questions.len() - 1
    }

    /// Label of the Next button ("Finish" on the last question).
    pub fn next_label(&self) -> &'static str {
        if self.at_last_question() {
            "Finish"
        } else {
            "Next"
        }
    }

    /// Label of the Mark button ("Mark" on the last question, because
    /// marking there does not move forward).
    pub fn mark_label(&self) -> &'static str {
        if self.at_last_question() {
            "Mark"
        } else {
            "Mark & Next"
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::AptitudeSnapshot {
            session_id: self.id,
            index: self.current,
            total: self.questions.len(),
            question_id: self.current_question().id,
            state: self.responses[self.current].state,
            pending_option: self.pending_option,
            pending_confidence: self.pending_confidence,
            remaining_secs: self.remaining_secs(),
            next_label: self.next_label().into(),
            mark_label: self.mark_label().into(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select an option (1-based) for the current question. Not committed
    /// until `advance`.
    ///
    /// Panics if `option` is outside `1..=4` -- an invalid index is a
    /// presentation-layer bug, not user input.
    pub fn select_option(&mut self, option: u8) {
        assert!((1..=4).contains(&option), "option {option} outside 1..=4");
        if self.phase != SessionPhase::Active {
            return;
        }
        self.pending_option = Some(option);
    }

    /// Set the confidence (0-100) for the current question.
    ///
    /// Panics if `confidence` exceeds 100.
    pub fn set_confidence(&mut self, confidence: u8) {
        assert!(confidence <= 100, "confidence {confidence} outside 0..=100");
        if self.phase != SessionPhase::Active {
            return;
        }
        self.pending_confidence = confidence;
    }

    /// Jump to any question. Committed state of the question being left is
    /// kept; only its uncommitted selection is dropped.
    ///
    /// Panics if `index` is out of bounds.
    pub fn go_to_question(&mut self, index: usize) -> Option<Event> {
        assert!(
            index < self.questions.len(),
            "question index {index} out of bounds ({} questions)",
            self.questions.len()
        );
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.current = index;
        self.restore_pending();
        Some(self.question_shown())
    }

    /// Commit the pending selection (if any) as Answered or Marked, then
    /// move forward. On the last question, `advance(false)` finalizes the
    /// test; `advance(true)` only refreshes the display.
    pub fn advance(&mut self, mark: bool, store: &mut ResultStore) -> Result<Option<Event>> {
        if self.phase != SessionPhase::Active {
            return Ok(None);
        }

        if let Some(option) = self.pending_option {
            let response = &mut self.responses[self.current];
            response.state = if mark {
                ResponseState::Marked
            } else {
                ResponseState::Answered
            };
            response.selected_option = Some(option);
            response.confidence = self.pending_confidence;
        }

        if !self.at_last_question() {
            self.current += 1;
            self.restore_pending();
            return Ok(Some(self.question_shown()));
        }

        if mark {
            // Marking the last question never finishes the test.
            return Ok(Some(self.question_shown()));
        }

        self.finalize(store, false).map(Some)
    }

    /// Reset the current question to Unanswered, option none, confidence 0.
    pub fn clear(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.responses[self.current] = AptitudeResponse::new();
        self.pending_option = None;
        self.pending_confidence = 0;
        Some(Event::ResponseCleared {
            index: self.current,
            at: Utc::now(),
        })
    }

    /// Flush the countdown. When the budget is exhausted the session
    /// finalizes exactly as a manual finish, with `finished_by_timer` set
    /// in the completion event. Call about once a second.
    pub fn tick(&mut self, store: &mut ResultStore) -> Result<Option<Event>> {
        if self.phase != SessionPhase::Active && self.phase != SessionPhase::QuitPending {
            return Ok(None);
        }
        if self.countdown.tick() {
            return self.finalize(store, true).map(Some);
        }
        Ok(None)
    }

    /// Ask to quit. The presentation layer collects the user's decision and
    /// calls `confirm_quit` or `cancel_quit`.
    pub fn request_quit(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.phase = SessionPhase::QuitPending;
        Some(Event::QuitRequested {
            test: TestKind::Aptitude,
            at: Utc::now(),
        })
    }

    /// Abandon the session. Nothing is persisted; the countdown is stopped.
    pub fn confirm_quit(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::QuitPending {
            return None;
        }
        self.phase = SessionPhase::Abandoned;
        self.countdown.cancel();
        Some(Event::SessionAbandoned {
            test: TestKind::Aptitude,
            at: Utc::now(),
        })
    }

    pub fn cancel_quit(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::QuitPending {
            return None;
        }
        self.phase = SessionPhase::Active;
        Some(Event::QuitCancelled {
            test: TestKind::Aptitude,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restore_pending(&mut self) {
        let response = &self.responses[self.current];
        self.pending_option = response.selected_option;
        self.pending_confidence = response.confidence;
    }

    fn question_shown(&self) -> Event {
        Event::QuestionShown {
            test: TestKind::Aptitude,
            index: self.current,
            total: self.questions.len(),
            question_id: self.current_question().id,
            at: Utc::now(),
        }
    }

    /// Compute per-category scores, persist them atomically and close the
    /// session. Unanswered questions are skipped, not zero-added.
    fn finalize(&mut self, store: &mut ResultStore, finished_by_timer: bool) -> Result<Event> {
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();

        for (question, response) in self.questions.iter().zip(&self.responses) {
            if !response.is_answered() {
                continue;
            }
            let total_in_category = self.category_totals[&question.category];
            // f64 division before rounding, so low confidences are not
            // truncated away.
            let magnitude = f64::from(response.confidence) / total_in_category as f64;
            let contribution = if response.selected_option == Some(question.correct_option) {
                magnitude
            } else {
                -magnitude
            };
            *sums.entry(question.category.clone()).or_default() += contribution;
        }

        let scores: BTreeMap<String, i32> = sums
            .into_iter()
            .map(|(category, sum)| (category, sum.round() as i32))
            .collect();

        store.write_aptitude_scores(&scores)?;

        self.countdown.cancel();
        self.phase = SessionPhase::Finished;
        info!(session = %self.id, finished_by_timer, ?scores, "aptitude test finalized");

        Ok(Event::TestFinished {
            test: TestKind::Aptitude,
            finished_by_timer,
            scores,
            at: Utc::now(),
        })
    }
}
