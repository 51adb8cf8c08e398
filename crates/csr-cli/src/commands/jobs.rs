use clap::Subcommand;
use csr_core::QuestionDb;

#[derive(Subcommand)]
pub enum JobsAction {
    /// All jobs in the bank
    List,
    /// Jobs belonging to one stream
    ByStream {
        /// Stream id (e.g. "commerce")
        stream: String,
    },
    /// A single job by id
    Show { id: i64 },
}

pub fn run(action: JobsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = QuestionDb::open()?;

    match action {
        JobsAction::List => {
            let jobs = db.all_jobs()?;
            println!("{}", serde_json::to_string_pretty(&jobs)?);
        }
        JobsAction::ByStream { stream } => {
            let jobs = db.jobs_by_stream(&stream)?;
            println!("{}", serde_json::to_string_pretty(&jobs)?);
        }
        JobsAction::Show { id } => match db.job_by_id(id)? {
            Some(job) => println!("{}", serde_json::to_string_pretty(&job)?),
            None => {
                eprintln!("no job with id {id}");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
