//! Scripted answer collector for tests and simulations.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::session::Choice;
use crate::ports::{AnswerCollector, AnswerError, QuestionPrompt};

/// Answers from a fixed script, falling back to a default choice once the
/// script runs out. Captures every prompt for verification.
#[derive(Debug, Clone)]
pub struct ScriptedAnswerCollector {
    answers: Arc<Mutex<VecDeque<Choice>>>,
    default: Choice,
    prompts: Arc<Mutex<Vec<QuestionPrompt>>>,
}

impl ScriptedAnswerCollector {
    /// A collector that always picks the given option.
    pub fn always(choice: Choice) -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::new())),
            default: choice,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A collector that follows `answers` in order, then repeats the last
    /// configured default.
    pub fn with_answers(answers: impl IntoIterator<Item = Choice>, default: Choice) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            default,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts presented so far.
    pub fn prompts(&self) -> Vec<QuestionPrompt> {
        self.prompts
            .lock()
            .expect("scripted collector lock poisoned")
            .clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts
            .lock()
            .expect("scripted collector lock poisoned")
            .len()
    }
}

#[async_trait]
impl AnswerCollector for ScriptedAnswerCollector {
    async fn choose(&self, prompt: &QuestionPrompt) -> Result<Choice, AnswerError> {
        self.prompts
            .lock()
            .expect("scripted collector lock poisoned")
            .push(prompt.clone());
        Ok(self
            .answers
            .lock()
            .expect("scripted collector lock poisoned")
            .pop_front()
            .unwrap_or(self.default))
    }
}
