use csr_core::{QuestionBank, QuestionDb};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = QuestionDb::open()?;
    let streams = db.all_streams()?;
    println!("{}", serde_json::to_string_pretty(&streams)?);
    Ok(())
}
