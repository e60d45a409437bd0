//! Terminal input.

use std::io::{self, BufRead, Write};

use snapmap_admin::Prompt;

/// Reads answers from stdin, one line per question.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
  fn ask(&mut self, question: &str) -> String {
    print!("{question}");
    io::stdout().flush().ok();
    let mut line = String::new();
    // EOF or a broken stdin reads as an empty answer, which every caller
    // treats as "no".
    if io::stdin().lock().read_line(&mut line).is_err() {
      return String::new();
    }
    line.trim().to_string()
  }
}
