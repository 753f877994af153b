//! The append-only record of answered questions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::criteria::Profile;

/// Which of the two presented options the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    OptionA,
    OptionB,
}

impl Choice {
    /// 0 for option A, 1 for option B; the index used in the choice
    /// vector sent to the inference collaborator.
    pub fn index(&self) -> usize {
        match self {
            Choice::OptionA => 0,
            Choice::OptionB => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Choice::OptionA),
            1 => Some(Choice::OptionB),
            _ => None,
        }
    }
}

/// One answered main question: the presented pair and the pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub profile_a: Profile,
    pub profile_b: Profile,
    pub chosen: Choice,
    pub asked_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn new(profile_a: Profile, profile_b: Profile, chosen: Choice) -> Self {
        Self {
            profile_a,
            profile_b,
            chosen,
            asked_at: Utc::now(),
        }
    }

    /// The profile the user picked.
    pub fn chosen_profile(&self) -> &Profile {
        match self.chosen {
            Choice::OptionA => &self.profile_a,
            Choice::OptionB => &self.profile_b,
        }
    }

    /// The profile the user passed over.
    pub fn rejected_profile(&self) -> &Profile {
        match self.chosen {
            Choice::OptionA => &self.profile_b,
            Choice::OptionB => &self.profile_a,
        }
    }
}

/// Ordered, append-only sequence of main-question responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    records: Vec<ResponseRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record; records are never removed or reordered.
    pub fn push(&mut self, record: ResponseRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::fixtures::price_speed_support;

    #[test]
    fn choice_index_round_trips() {
        assert_eq!(Choice::OptionA.index(), 0);
        assert_eq!(Choice::OptionB.index(), 1);
        assert_eq!(Choice::from_index(0), Some(Choice::OptionA));
        assert_eq!(Choice::from_index(1), Some(Choice::OptionB));
        assert_eq!(Choice::from_index(2), None);
    }

    #[test]
    fn record_resolves_chosen_and_rejected() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[1, 1, 1]).unwrap();
        let record = ResponseRecord::new(a.clone(), b.clone(), Choice::OptionB);
        assert_eq!(record.chosen_profile(), &b);
        assert_eq!(record.rejected_profile(), &a);
    }

    #[test]
    fn history_preserves_order() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[1, 1, 1]).unwrap();
        let mut history = SessionHistory::new();
        history.push(ResponseRecord::new(a.clone(), b.clone(), Choice::OptionA));
        history.push(ResponseRecord::new(b.clone(), a.clone(), Choice::OptionB));
        assert_eq!(history.len(), 2);
        assert_eq!(history.records()[0].chosen, Choice::OptionA);
        assert_eq!(history.records()[1].chosen, Choice::OptionB);
    }
}
