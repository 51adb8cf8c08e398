use csr_core::storage::seed::seed_demo_bank;
use csr_core::{QuestionBank, QuestionDb};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = QuestionDb::open()?;

    if !db.all_streams()?.is_empty() {
        println!("question bank is already populated; nothing to do");
        return Ok(());
    }

    let summary = seed_demo_bank(&db)?;
    println!(
        "seeded {} streams, {} jobs, {} aptitude questions, {} personality questions",
        summary.streams,
        summary.jobs,
        summary.aptitude_questions,
        summary.personality_questions
    );
    Ok(())
}
