//! Answer collection port - one synchronous 0/1 choice per question.
//!
//! Prompts carry already-resolved names so presentation adapters never
//! touch the decision space types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::criteria::{CriteriaSet, Profile};
use crate::domain::session::Choice;

/// What kind of question is being presented.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// A main paired comparison.
    Main { number: usize, total: usize },
    /// The counterfactual follow-up probing one changed attribute.
    Counterfactual {
        criterion: String,
        original_level: String,
        improved_level: String,
    },
}

/// One table row: a criterion and its level on each option.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRow {
    pub criterion: String,
    pub option_a: String,
    pub option_b: String,
    /// Marks the counterfactually-changed criterion.
    pub highlight: bool,
}

/// A fully-resolved question ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPrompt {
    pub kind: QuestionKind,
    pub rows: Vec<PromptRow>,
}

impl QuestionPrompt {
    /// Resolves a profile pair against the decision space.
    /// `highlight_criterion` marks the row changed by a counterfactual.
    pub fn from_pair(
        set: &CriteriaSet,
        kind: QuestionKind,
        option_a: &Profile,
        option_b: &Profile,
        highlight_criterion: Option<usize>,
    ) -> Self {
        let rows = set
            .criteria()
            .iter()
            .enumerate()
            .map(|(i, criterion)| PromptRow {
                criterion: criterion.name().to_string(),
                option_a: criterion.level_name(option_a.level(i)).to_string(),
                option_b: criterion.level_name(option_b.level(i)).to_string(),
                highlight: highlight_criterion == Some(i),
            })
            .collect();
        Self { kind, rows }
    }
}

/// Answer collection failures end the session; there is no fallback for a
/// user who stopped answering.
#[derive(Debug, Clone, Error)]
pub enum AnswerError {
    #[error("answer channel closed: {0}")]
    Closed(String),
}

/// Port for collecting one choice per presented question.
#[async_trait]
pub trait AnswerCollector: Send + Sync {
    async fn choose(&self, prompt: &QuestionPrompt) -> Result<Choice, AnswerError>;
}
