//! Demo seeding for the question bank.
//!
//! Production builds ship a pre-populated `csr_data.db`; this module
//! generates a small but complete bank for local runs and tests.

use crate::error::DatabaseError;
use crate::question::{AptitudeQuestion, PersonalityQuestion, QuestionKind, Stream};
use crate::storage::QuestionDb;

const STREAMS: &[(&str, &str)] = &[
    ("agriculture", "Agriculture"),
    ("arts", "Arts and Humanities"),
    ("commerce", "Commerce"),
    ("fine_arts", "Fine Arts"),
    ("health", "Health and Life Sciences"),
    ("technical", "Technical"),
    ("uniformed", "Uniformed Services"),
];

/// Counts of what a seeding run inserted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSummary {
    pub streams: usize,
    pub jobs: usize,
    pub aptitude_questions: usize,
    pub personality_questions: usize,
}

/// Populate `db` with the demo bank. Idempotent for streams, additive for
/// the rest -- intended for a freshly created database.
pub fn seed_demo_bank(db: &QuestionDb) -> Result<SeedSummary, DatabaseError> {
    let mut summary = SeedSummary::default();

    for (id, title) in STREAMS {
        db.insert_stream(&Stream {
            id: (*id).into(),
            title: (*title).into(),
            description: format!("Careers in the {title} stream."),
        })?;
        summary.streams += 1;

        for i in 1..=5 {
            db.insert_job(
                &format!("{title} {i}"),
                &format!("Description of {title} {i}"),
                id,
            )?;
            summary.jobs += 1;
        }

        // Two sliders and two textual questions per stream, so that the
        // default sample of 2 always has room to vary.
        for (kind, text) in [
            (
                QuestionKind::Slider,
                format!("How much do you enjoy work related to {title}?"),
            ),
            (
                QuestionKind::Slider,
                format!("How comfortable are you with the daily routine of {title}?"),
            ),
            (
                QuestionKind::Textual,
                format!("Describe a project in {title} you would be proud of."),
            ),
            (
                QuestionKind::Textual,
                format!("What appeals to you about a career in {title}?"),
            ),
        ] {
            db.insert_personality_question(&PersonalityQuestion {
                id: 0,
                stream: (*id).into(),
                kind,
                text,
            })?;
            summary.personality_questions += 1;
        }
    }

    for q in aptitude_bank() {
        db.insert_aptitude_question(&q)?;
        summary.aptitude_questions += 1;
    }

    Ok(summary)
}

fn aptitude_bank() -> Vec<AptitudeQuestion> {
    let mut out = Vec::new();
    let mut push = |category: &str, text: &str, options: [&str; 4], correct: u8| {
        out.push(AptitudeQuestion {
            id: 0,
            category: category.into(),
            text: text.into(),
            options: options.map(String::from),
            correct_option: correct,
            reference_image: None,
        });
    };

    push(
        "logical",
        "Which number continues the series 2, 6, 18, 54, ...?",
        ["108", "162", "216", "324"],
        2,
    );
    push(
        "logical",
        "All roses are flowers. Some flowers fade quickly. Therefore:",
        [
            "All roses fade quickly",
            "Some roses fade quickly",
            "No rose fades quickly",
            "None of these follows",
        ],
        4,
    );
    push(
        "logical",
        "If GARDEN is coded as HBSEFO, how is FLOWER coded?",
        ["GMPXFS", "GMPXFR", "GNPXFS", "GMPWFS"],
        1,
    );
    push(
        "numerical",
        "A trader buys at 80 and sells at 100. The profit percentage is:",
        ["20%", "25%", "30%", "15%"],
        2,
    );
    push(
        "numerical",
        "What is 15% of 240?",
        ["32", "34", "36", "38"],
        3,
    );
    push(
        "numerical",
        "A train covers 180 km in 3 hours. Its average speed is:",
        ["50 km/h", "55 km/h", "60 km/h", "65 km/h"],
        3,
    );
    push(
        "verbal",
        "Choose the word closest in meaning to 'candid':",
        ["Secretive", "Frank", "Careful", "Hostile"],
        2,
    );
    push(
        "verbal",
        "Choose the correctly spelled word:",
        ["Occassion", "Ocasion", "Occasion", "Occasionn"],
        3,
    );
    push(
        "verbal",
        "Pick the antonym of 'scarce':",
        ["Rare", "Abundant", "Sparse", "Scant"],
        2,
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::QuestionBank;

    #[test]
    fn demo_bank_is_complete() {
        let db = QuestionDb::open_memory().unwrap();
        let summary = seed_demo_bank(&db).unwrap();

        assert_eq!(summary.streams, 7);
        assert_eq!(summary.jobs, 7 * 5);
        assert_eq!(summary.personality_questions, 7 * 4);
        assert_eq!(summary.aptitude_questions, 9);

        assert_eq!(db.all_streams().unwrap().len(), 7);
        assert_eq!(
            db.all_categories().unwrap(),
            vec!["logical", "numerical", "verbal"]
        );
        // Every stream can satisfy the default sample of 2.
        for stream in db.all_streams().unwrap() {
            assert!(db.personality_questions_by_stream(&stream.id).unwrap().len() >= 2);
        }
    }
}
