//! End-to-end personality test flow against the public API.

use std::collections::BTreeMap;

use csr_core::storage::seed::seed_demo_bank;
use csr_core::{
    AnalysisError, Config, CoreError, Event, PersonalitySession, QuestionBank, QuestionDb,
    QuestionKind, ResultStore, SentimentAnalyzer,
};

struct FixedAnalyzer(f64);

impl SentimentAnalyzer for FixedAnalyzer {
    fn analyze(&self, _text: &str) -> Result<f64, AnalysisError> {
        Ok(self.0)
    }
}

fn seeded_setup() -> (QuestionDb, ResultStore, Config) {
    let db = QuestionDb::open_memory().unwrap();
    seed_demo_bank(&db).unwrap();

    let mut store = ResultStore::open_memory().unwrap();
    store
        .write_aptitude_scores(&BTreeMap::from([("logical".to_string(), 10)]))
        .unwrap();

    let mut config = Config::default();
    config.personality.sampling_seed = Some(1234);
    (db, store, config)
}

#[test]
fn refuses_to_start_without_aptitude_scores() {
    let db = QuestionDb::open_memory().unwrap();
    seed_demo_bank(&db).unwrap();
    let store = ResultStore::open_memory().unwrap();

    match PersonalitySession::begin(&db, &store, &Config::default()) {
        Err(CoreError::Precondition(_)) => {}
        other => panic!("expected fatal precondition error, got {other:?}"),
    }
}

#[test]
fn full_run_scores_every_stream() {
    let (db, mut store, config) = seeded_setup();
    let mut session = PersonalitySession::begin(&db, &store, &config).unwrap();

    let stream_count = db.all_streams().unwrap().len();
    assert_eq!(
        session.total_questions(),
        stream_count * config.personality.questions_per_stream
    );

    let analyzer = FixedAnalyzer(60.0);
    let mut final_scores = None;
    while !session.is_finished() {
        let kind = session.current_question().kind;
        let event = match kind {
            QuestionKind::Slider => session.answer_slider(50, &mut store).unwrap(),
            QuestionKind::Textual => session
                .answer_text(&analyzer, "sounds genuinely interesting", &mut store)
                .unwrap(),
        };
        if let Some(Event::TestFinished { scores, .. }) = event {
            final_scores = Some(scores);
        }
    }

    let scores = final_scores.expect("session must finish with scores");
    assert_eq!(scores.len(), stream_count);
    for stream in db.all_streams().unwrap() {
        // Every answer scored 50 or 60, so each average lands between them.
        let score = scores[&stream.id];
        assert!((50..=60).contains(&score), "{}: {score}", stream.id);
        assert_eq!(store.score(&stream.id).unwrap(), Some(score));
    }
    assert!(store.personality_completed().unwrap());
}

#[test]
fn skipping_the_whole_test_terminates_after_all_samples() {
    let (db, mut store, config) = seeded_setup();
    let mut session = PersonalitySession::begin(&db, &store, &config).unwrap();

    let expected_questions =
        db.all_streams().unwrap().len() * config.personality.questions_per_stream;

    let mut skips = 0;
    while !session.is_finished() {
        session.skip(&mut store).unwrap();
        skips += 1;
        assert!(skips <= expected_questions, "session failed to terminate");
    }

    assert_eq!(skips, expected_questions);
    for stream in db.all_streams().unwrap() {
        assert_eq!(store.score(&stream.id).unwrap(), Some(0));
    }
}
