//! Interactive stdin answer collector.

use async_trait::async_trait;
use std::io::{BufRead, Write};
use tokio::task;

use crate::domain::session::Choice;
use crate::ports::{AnswerCollector, AnswerError, QuestionPrompt};

use super::render_prompt;

/// Collects answers from the terminal: prints the option table, then
/// loops until the user types 1 or 2.
#[derive(Debug, Clone, Default)]
pub struct ConsoleAnswerCollector;

impl ConsoleAnswerCollector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnswerCollector for ConsoleAnswerCollector {
    async fn choose(&self, prompt: &QuestionPrompt) -> Result<Choice, AnswerError> {
        let text = render_prompt(prompt);
        // Blocking stdin read moved off the runtime.
        task::spawn_blocking(move || {
            print!("{text}");
            let stdin = std::io::stdin();
            let mut lines = stdin.lock().lines();
            loop {
                print!("Your preference (1 for Option A, 2 for Option B): ");
                let _ = std::io::stdout().flush();
                match lines.next() {
                    Some(Ok(line)) => match line.trim() {
                        "1" => return Ok(Choice::OptionA),
                        "2" => return Ok(Choice::OptionB),
                        _ => continue,
                    },
                    Some(Err(e)) => return Err(AnswerError::Closed(e.to_string())),
                    None => return Err(AnswerError::Closed("stdin closed".into())),
                }
            }
        })
        .await
        .map_err(|e| AnswerError::Closed(format!("input task failed: {e}")))?
    }
}
