use serde::Serialize;
use std::collections::BTreeMap;

use csr_core::{QuestionBank, QuestionDb, ResultStore};

#[derive(Serialize)]
struct ResultReport {
    aptitude_completed: bool,
    personality_completed: bool,
    category_scores: BTreeMap<String, i32>,
    stream_scores: BTreeMap<String, i32>,
    /// Streams ordered by personality score, best first.
    recommended_streams: Vec<String>,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = QuestionDb::open()?;
    let store = ResultStore::open()?;

    let categories = db.all_categories()?;
    let streams: Vec<String> = db.all_streams()?.into_iter().map(|s| s.id).collect();

    let stream_scores = store.scores(&streams)?;
    let mut ranked: Vec<(&String, &i32)> = stream_scores.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let report = ResultReport {
        aptitude_completed: store.aptitude_completed()?,
        personality_completed: store.personality_completed()?,
        category_scores: store.scores(&categories)?,
        stream_scores: stream_scores.clone(),
        recommended_streams: ranked.into_iter().map(|(name, _)| name.clone()).collect(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
