//! # CSR Core Library
//!
//! This library provides the core logic for csr, a career/stream
//! recommendation tool: it administers an aptitude test and a personality
//! test, scores the responses, and keeps question banks and final scores
//! in local SQLite storage. There is no server component; everything runs
//! on-device against a pre-seeded database.
//!
//! ## Architecture
//!
//! - **Aptitude session**: per-question answer/mark/clear state machine
//!   with a wall-clock countdown; the caller invokes `tick()` periodically
//! - **Personality session**: sequential per-stream sampled questions,
//!   slider or sentiment-analyzed free-text answers, retry-or-skip on
//!   analysis failure
//! - **Storage**: SQLite question bank and result store, TOML configuration
//! - **Sentiment**: trait seam over the external analysis service
//!
//! ## Key Components
//!
//! - [`AptitudeSession`]: aptitude test state machine and scoring
//! - [`PersonalitySession`]: personality test flow and aggregation
//! - [`QuestionDb`]: pre-seeded question bank
//! - [`ResultStore`]: durable per-category / per-stream scores
//! - [`SentimentAnalyzer`]: contract of the external analysis service

pub mod aptitude;
pub mod error;
pub mod events;
pub mod personality;
pub mod question;
pub mod sentiment;
pub mod storage;

pub use aptitude::{AptitudeSession, Countdown, SessionPhase};
pub use error::{AnalysisError, ConfigError, CoreError, DatabaseError};
pub use events::{Event, TestKind};
pub use personality::PersonalitySession;
pub use question::{
    AptitudeQuestion, AptitudeResponse, Job, PersonalityQuestion, PersonalityResponse,
    QuestionKind, ResponseState, Stream,
};
pub use sentiment::{HttpSentimentAnalyzer, SentimentAnalyzer};
pub use storage::{Config, QuestionBank, QuestionDb, ResultStore};
