pub mod config;
pub mod database;
pub mod results;
pub mod seed;

pub use config::Config;
pub use database::{QuestionBank, QuestionDb};
pub use results::ResultStore;

use std::path::PathBuf;

/// Returns `~/.config/csr[-dev]/` based on CSR_ENV.
///
/// Set CSR_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CSR_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("csr-dev")
    } else {
        base_dir.join("csr")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
