//! Personality test session.
//!
//! Strictly sequential, unlike the aptitude flow: no jump-to-question.
//! Initialization samples a fixed number of questions per stream; each
//! question is then scored by its slider value or by the sentiment-analysis
//! service, or skipped (score 0, counted per stream). Advancing past the
//! last question aggregates per-stream averages and persists them.
//!
//! Starting a personality session requires the aptitude-completed flag --
//! violating that is a fatal precondition error, since only a navigation
//! bug can reach this code without it.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::aptitude::SessionPhase;
use crate::error::{CoreError, Result};
use crate::events::{Event, TestKind};
use crate::personality::{rng_from_seed, sample_questions};
use crate::question::{PersonalityQuestion, PersonalityResponse, QuestionKind};
use crate::sentiment::SentimentAnalyzer;
use crate::storage::{Config, QuestionBank, ResultStore};

/// One run of the personality test.
#[derive(Debug)]
pub struct PersonalitySession {
    id: Uuid,
    /// Stream ids, in sampling order. Every stream gets a persisted score.
    streams: Vec<String>,
    questions: Vec<PersonalityQuestion>,
    responses: Vec<PersonalityResponse>,
    /// Actual per-stream sample size (clamped when a pool ran short).
    sampled_per_stream: HashMap<String, usize>,
    skipped_per_stream: HashMap<String, usize>,
    current: usize,
    analysis_in_flight: bool,
    phase: SessionPhase,
}

impl PersonalitySession {
    /// Sample questions per stream and open the session.
    ///
    /// # Errors
    /// `CoreError::Precondition` (fatal) when the aptitude test has not been
    /// completed, or when the bank has no streams or no questions.
    pub fn begin(
        bank: &dyn QuestionBank,
        store: &ResultStore,
        config: &Config,
    ) -> Result<Self> {
        if !store.aptitude_completed()? {
            return Err(CoreError::Precondition(
                "personality test started without completing aptitude test".into(),
            ));
        }

        let streams = bank.all_streams()?;
        if streams.is_empty() {
            return Err(CoreError::Precondition(
                "question bank has no streams".into(),
            ));
        }

        let n = config.personality.questions_per_stream;
        let mut rng = rng_from_seed(config.personality.sampling_seed);
        let mut questions = Vec::new();
        let mut sampled_per_stream = HashMap::new();
        let mut skipped_per_stream = HashMap::new();
        let mut stream_ids = Vec::new();

        for stream in &streams {
            let pool = bank.personality_questions_by_stream(&stream.id)?;
            let sample = sample_questions(&pool, n, &mut rng);
            debug!(
                stream = %stream.id,
                pool = pool.len(),
                sampled = sample.len(),
                "personality questions drawn"
            );
            sampled_per_stream.insert(stream.id.clone(), sample.len());
            skipped_per_stream.insert(stream.id.clone(), 0);
            stream_ids.push(stream.id.clone());
            questions.extend(sample);
        }

        if questions.is_empty() {
            return Err(CoreError::Precondition(
                "personality question bank is empty".into(),
            ));
        }

        let id = Uuid::new_v4();
        debug!(session = %id, questions = questions.len(), "personality session started");

        let responses = vec![PersonalityResponse::default(); questions.len()];
        Ok(Self {
            id,
            streams: stream_ids,
            questions,
            responses,
            sampled_per_stream,
            skipped_per_stream,
            current: 0,
            analysis_in_flight: false,
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

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &PersonalityQuestion {
        &self.questions[self.current]
    }

    /// "Question 3/14" style progress line.
    pub fn question_number_display(&self) -> String {
        format!("Question {}/{}", self.current + 1, self.questions.len())
    }

    /// Label of the Next button: "Finish" on the last question, so the user
    /// sees the final step coming one question ahead of the end.
    pub fn next_label(&self) -> &'static str {
        if self.current == self.questions.len() - 1 {
            "Finish"
        } else {
            "Next"
        }
    }

    pub fn analysis_in_flight(&self) -> bool {
        self.analysis_in_flight
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::PersonalitySnapshot {
            session_id: self.id,
            index: self.current,
            total: self.questions.len(),
            question_id: self.current_question().id,
            kind: self.current_question().kind,
            next_label: self.next_label().into(),
            finished: self.is_finished(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record the slider value of the current question and advance.
    ///
    /// Panics if `value` exceeds 100 or the current question is textual --
    /// both are presentation-layer contract violations.
    pub fn answer_slider(
        &mut self,
        value: u8,
        store: &mut ResultStore,
    ) -> Result<Option<Event>> {
        assert!(value <= 100, "slider value {value} outside 0..=100");
        assert_eq!(
            self.current_question().kind,
            QuestionKind::Slider,
            "answer_slider on a textual question"
        );
        if self.phase != SessionPhase::Active || self.analysis_in_flight {
            return Ok(None);
        }
        self.record_score(f64::from(value), false, store).map(Some)
    }

    /// Analyze the free-text answer of the current question; on success
    /// record the returned score and advance.
    ///
    /// On failure the question stays open and the recoverable
    /// [`crate::error::AnalysisError`] is returned: the caller offers the
    /// user retry (call this again) or skip.
    ///
    /// Panics if the current question is a slider question.
    pub fn answer_text(
        &mut self,
        analyzer: &dyn SentimentAnalyzer,
        text: &str,
        store: &mut ResultStore,
    ) -> Result<Option<Event>> {
        assert_eq!(
            self.current_question().kind,
            QuestionKind::Textual,
            "answer_text on a slider question"
        );
        if self.phase != SessionPhase::Active || self.analysis_in_flight {
            return Ok(None);
        }

        // Refuse further answer/skip input for this question while the
        // analysis call is outstanding.
        self.analysis_in_flight = true;
        let analyzed = analyzer.analyze(text);
        self.analysis_in_flight = false;

        let score = analyzed?;
        self.record_score(score, false, store).map(Some)
    }

    /// Record score 0 for the current question, count the skip against its
    /// stream and advance.
    pub fn skip(&mut self, store: &mut ResultStore) -> Result<Option<Event>> {
        if self.phase != SessionPhase::Active || self.analysis_in_flight {
            return Ok(None);
        }
        self.record_score(0.0, true, store).map(Some)
    }

    /// Ask to quit; awaits `confirm_quit` or `cancel_quit`.
    pub fn request_quit(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.phase = SessionPhase::QuitPending;
        Some(Event::QuitRequested {
            test: TestKind::Personality,
            at: Utc::now(),
        })
    }

    /// Abandon the session without persisting anything.
    pub fn confirm_quit(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::QuitPending {
            return None;
        }
        self.phase = SessionPhase::Abandoned;
        Some(Event::SessionAbandoned {
            test: TestKind::Personality,
            at: Utc::now(),
        })
    }

    pub fn cancel_quit(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::QuitPending {
            return None;
        }
        self.phase = SessionPhase::Active;
        Some(Event::QuitCancelled {
            test: TestKind::Personality,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn record_score(
        &mut self,
        score: f64,
        skipped: bool,
        store: &mut ResultStore,
    ) -> Result<Event> {
        let stream = self.current_question().stream.clone();
        self.responses[self.current].score = Some(score);
        if skipped {
            *self.skipped_per_stream.entry(stream.clone()).or_default() += 1;
        }

        if self.current == self.questions.len() - 1 {
            return self.finalize(store);
        }

        let index = self.current;
        self.current += 1;
        Ok(if skipped {
            Event::QuestionSkipped {
                index,
                stream,
                at: Utc::now(),
            }
        } else {
            Event::QuestionScored {
                index,
                stream,
                score,
                at: Utc::now(),
            }
        })
    }

    /// Aggregate per-stream averages and persist them atomically. Runs
    /// exactly once; the terminal phase blocks every later command.
    fn finalize(&mut self, store: &mut ResultStore) -> Result<Event> {
        let mut sums: HashMap<String, f64> = HashMap::new();
        for (question, response) in self.questions.iter().zip(&self.responses) {
            *sums.entry(question.stream.clone()).or_default() +=
                response.score.unwrap_or(0.0);
        }

        let mut scores = BTreeMap::new();
        for stream in &self.streams {
            let sampled = self.sampled_per_stream[stream];
            let skipped = self.skipped_per_stream[stream];
            let answered = sampled - skipped;
            // Every question skipped would divide 0.0 by 0: substitute 0.
            let score = if answered == 0 {
                0.0
            } else {
                sums.get(stream).copied().unwrap_or(0.0) / answered as f64
            };
            scores.insert(stream.clone(), score.round() as i32);
        }

        store.write_personality_scores(&scores)?;

        self.phase = SessionPhase::Finished;
        info!(session = %self.id, ?scores, "personality test finalized");

        Ok(Event::TestFinished {
            test: TestKind::Personality,
            finished_by_timer: false,
            scores,
            at: Utc::now(),
        })
    }
}
