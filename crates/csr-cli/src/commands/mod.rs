pub mod config;
pub mod jobs;
pub mod result;
pub mod seed;
pub mod streams;
pub mod test;

use std::io::{BufRead, Write};

/// Print `prompt` and read one trimmed line from stdin.
/// Returns `None` on EOF.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
