//! Plain-text rendering of question prompts.

use std::fmt::Write;

use crate::ports::{QuestionKind, QuestionPrompt};

const FEATURE_WIDTH: usize = 25;
const OPTION_WIDTH: usize = 35;

/// Renders a prompt as the side-by-side option table shown to the user.
pub fn render_prompt(prompt: &QuestionPrompt) -> String {
    let mut out = String::new();

    match &prompt.kind {
        QuestionKind::Main { number, total } => {
            let _ = writeln!(out, "Question {number}/{total}: Which option would you choose?");
        }
        QuestionKind::Counterfactual {
            criterion,
            original_level,
            improved_level,
        } => {
            let _ = writeln!(
                out,
                "Follow-up: suppose the option you passed over had '{improved_level}' instead of '{original_level}' for {criterion}."
            );
        }
    }

    let header = format!(
        "| {:<fw$} | {:<ow$} | {:<ow$} |",
        "Feature",
        "Option A",
        "Option B",
        fw = FEATURE_WIDTH,
        ow = OPTION_WIDTH
    );
    let separator = "-".repeat(header.len());

    let _ = writeln!(out, "{separator}");
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{separator}");
    for row in &prompt.rows {
        let option_a = if row.highlight {
            format!("**{}**", row.option_a)
        } else {
            row.option_a.clone()
        };
        let _ = writeln!(
            out,
            "| {:<fw$} | {:<ow$} | {:<ow$} |",
            row.criterion,
            option_a,
            row.option_b,
            fw = FEATURE_WIDTH,
            ow = OPTION_WIDTH
        );
    }
    let _ = writeln!(out, "{separator}");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::fixtures::price_speed_support;
    use crate::ports::QuestionPrompt;

    #[test]
    fn main_prompt_renders_table() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 1, 2]).unwrap();
        let b = set.profile_from_indices(&[2, 0, 1]).unwrap();
        let prompt = QuestionPrompt::from_pair(
            &set,
            QuestionKind::Main {
                number: 2,
                total: 8,
            },
            &a,
            &b,
            None,
        );
        let text = render_prompt(&prompt);
        assert!(text.contains("Question 2/8"));
        assert!(text.contains("Price"));
        assert!(text.contains("medium"));
        assert!(text.contains("premium"));
    }

    #[test]
    fn counterfactual_prompt_highlights_changed_level() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[1, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let prompt = QuestionPrompt::from_pair(
            &set,
            QuestionKind::Counterfactual {
                criterion: "Price".to_string(),
                original_level: "low".to_string(),
                improved_level: "mid".to_string(),
            },
            &a,
            &b,
            Some(0),
        );
        let text = render_prompt(&prompt);
        assert!(text.contains("**mid**"));
        assert!(text.contains("instead of 'low'"));
    }
}
