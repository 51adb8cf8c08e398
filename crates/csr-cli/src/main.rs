use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "csr", version, about = "Career & stream recommendation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a test
    Test {
        #[command(subcommand)]
        action: commands::test::TestAction,
    },
    /// Show persisted test results and the recommended streams
    Result,
    /// List career streams
    Streams,
    /// Job/career information
    Jobs {
        #[command(subcommand)]
        action: commands::jobs::JobsAction,
    },
    /// Populate the demo question bank
    Seed,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Test { action } => commands::test::run(action),
        Commands::Result => commands::result::run(),
        Commands::Streams => commands::streams::run(),
        Commands::Jobs { action } => commands::jobs::run(action),
        Commands::Seed => commands::seed::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
