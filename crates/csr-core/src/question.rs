//! Question bank records and per-question response holders.
//!
//! Question records are immutable once loaded from the database; the
//! response holders are the only mutable per-session state and are owned
//! exclusively by the session that created them.

use serde::{Deserialize, Serialize};

/// A career stream (e.g. Science, Commerce): groups personality questions,
/// jobs and final recommendation scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stream {
    /// Stable identifier used as the score key (e.g. "commerce").
    pub id: String,
    /// Display title (e.g. "Commerce").
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Static job/career information attached to a stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub stream: String,
}

/// One aptitude question: four options, exactly one correct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeQuestion {
    pub id: i64,
    /// Aptitude grouping (e.g. "logical", "verbal") used for scoring.
    pub category: String,
    pub text: String,
    pub options: [String; 4],
    /// 1-based index into `options`.
    pub correct_option: u8,
    /// Optional identifier of a reference image shipped with the bank.
    #[serde(default)]
    pub reference_image: Option<String>,
}

impl AptitudeQuestion {
    /// Text of the 1-based option `index`.
    ///
    /// Panics if `index` is outside `1..=4` -- passing an invalid option
    /// index is a programming error, not user input.
    pub fn option_text(&self, index: u8) -> &str {
        assert!(
            (1..=4).contains(&index),
            "option index {index} outside 1..=4"
        );
        &self.options[(index - 1) as usize]
    }
}

/// How a personality question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free-text answer, scored by the sentiment-analysis service.
    Textual,
    /// 0-100 slider answer, scored by its raw value.
    Slider,
}

/// One personality question, belonging to a single stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityQuestion {
    pub id: i64,
    pub stream: String,
    pub kind: QuestionKind,
    pub text: String,
}

/// Lifecycle of an aptitude response.
///
/// `Marked` carries the same data as `Answered`; the distinct state only
/// records the intent to revisit the question later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseState {
    Unanswered,
    Answered,
    Marked,
}

/// Mutable response holder for one aptitude question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeResponse {
    pub state: ResponseState,
    /// 1-based selected option, `None` while unanswered.
    pub selected_option: Option<u8>,
    /// User-reported certainty, 0-100. 0 is a valid committed value.
    pub confidence: u8,
}

impl AptitudeResponse {
    pub fn new() -> Self {
        Self {
            state: ResponseState::Unanswered,
            selected_option: None,
            confidence: 0,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.state != ResponseState::Unanswered
    }
}

impl Default for AptitudeResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable response holder for one personality question.
///
/// `score` stays `None` until the question is answered or skipped
/// (a skip records 0.0); once set it is never reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalityResponse {
    pub score: Option<f64>,
}
