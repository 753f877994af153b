//! The decision space: criteria, levels, and hypothetical profiles.
//!
//! `CriteriaSet` is the single place where the 3 criteria x 3 levels
//! structure is enforced; every component downstream takes a validated set
//! and indexes into it with `LevelKey`, so string-keyed lookups exist only
//! at the collaborator boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Number of criteria the orthogonal design assumes.
pub const CRITERIA_COUNT: usize = 3;

/// Number of levels per criterion the orthogonal design assumes.
pub const LEVELS_PER_CRITERION: usize = 3;

/// One decision attribute with its ordered levels. Level index 0 is the
/// fixed reference against which the other levels' utilities are measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    name: String,
    levels: Vec<String>,
}

impl Criterion {
    /// Creates a criterion with exactly three uniquely-named levels.
    pub fn new(
        name: impl Into<String>,
        levels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("criterion"));
        }
        let levels: Vec<String> = levels.into_iter().map(Into::into).collect();
        if levels.len() != LEVELS_PER_CRITERION {
            return Err(ValidationError::invalid_configuration(format!(
                "criterion '{}' must have exactly {} levels, got {}",
                name,
                LEVELS_PER_CRITERION,
                levels.len()
            )));
        }
        for level in &levels {
            if level.trim().is_empty() {
                return Err(ValidationError::empty_field("level"));
            }
        }
        for (i, level) in levels.iter().enumerate() {
            if levels[..i].contains(level) {
                return Err(ValidationError::invalid_format(
                    "level",
                    format!("duplicate level '{}' in criterion '{}'", level, name),
                ));
            }
        }
        Ok(Self { name, levels })
    }

    /// Returns the criterion name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered level names.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Returns the name of the level at `index`.
    pub fn level_name(&self, index: usize) -> &str {
        &self.levels[index]
    }

    /// Returns the index of the named level, if defined.
    pub fn level_index(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == name)
    }
}

/// Typed composite key addressing one (criterion, level) cell of the
/// decision space. Indices are valid for the `CriteriaSet` they were
/// derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelKey {
    pub criterion: usize,
    pub level: usize,
}

impl LevelKey {
    pub fn new(criterion: usize, level: usize) -> Self {
        Self { criterion, level }
    }

    /// True for the fixed reference level of a criterion.
    pub fn is_reference(&self) -> bool {
        self.level == 0
    }
}

/// The validated decision space: exactly 3 criteria with 3 levels each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaSet {
    criteria: Vec<Criterion>,
}

impl CriteriaSet {
    /// Validates and builds the decision space. Anything other than the
    /// 3x3 structure is refused up front; the engine never runs on a
    /// malformed space.
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, ValidationError> {
        if criteria.len() != CRITERIA_COUNT {
            return Err(ValidationError::invalid_configuration(format!(
                "expected exactly {} criteria, got {}",
                CRITERIA_COUNT,
                criteria.len()
            )));
        }
        for (i, criterion) in criteria.iter().enumerate() {
            if criteria[..i].iter().any(|c| c.name == criterion.name) {
                return Err(ValidationError::invalid_format(
                    "criterion",
                    format!("duplicate criterion '{}'", criterion.name),
                ));
            }
        }
        Ok(Self { criteria })
    }

    /// Returns the criteria in presentation order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Returns the criterion at `index`.
    pub fn criterion(&self, index: usize) -> &Criterion {
        &self.criteria[index]
    }

    /// Looks up a criterion index by name.
    pub fn criterion_index(&self, name: &str) -> Option<usize> {
        self.criteria.iter().position(|c| c.name == name)
    }

    /// Resolves a key to its (criterion name, level name) pair.
    pub fn names_for(&self, key: LevelKey) -> (&str, &str) {
        let criterion = &self.criteria[key.criterion];
        (criterion.name(), criterion.level_name(key.level))
    }

    /// Iterates every (criterion, level) key in the space, criteria-major.
    pub fn level_keys(&self) -> impl Iterator<Item = LevelKey> + '_ {
        self.criteria.iter().enumerate().flat_map(|(c, criterion)| {
            (0..criterion.levels().len()).map(move |l| LevelKey::new(c, l))
        })
    }

    /// Iterates the non-reference keys, the estimable parameters of the
    /// choice model.
    pub fn non_reference_keys(&self) -> impl Iterator<Item = LevelKey> + '_ {
        self.level_keys().filter(|k| !k.is_reference())
    }

    /// Converts a name-keyed profile (the collaborator wire shape) into a
    /// typed profile, rejecting unknown or missing entries.
    pub fn profile_from_names(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<Profile, ValidationError> {
        let mut levels = Vec::with_capacity(self.criteria.len());
        for criterion in &self.criteria {
            let level_name = values.get(criterion.name()).ok_or_else(|| {
                ValidationError::invalid_format(
                    "profile",
                    format!("missing criterion '{}'", criterion.name()),
                )
            })?;
            let level = criterion.level_index(level_name).ok_or_else(|| {
                ValidationError::invalid_format(
                    "profile",
                    format!(
                        "unknown level '{}' for criterion '{}'",
                        level_name,
                        criterion.name()
                    ),
                )
            })?;
            levels.push(level);
        }
        Ok(Profile { levels })
    }

    /// Converts a typed profile back to the name-keyed wire shape.
    pub fn profile_to_names(&self, profile: &Profile) -> BTreeMap<String, String> {
        self.criteria
            .iter()
            .zip(&profile.levels)
            .map(|(criterion, &level)| {
                (
                    criterion.name().to_string(),
                    criterion.level_name(level).to_string(),
                )
            })
            .collect()
    }

    /// Builds a profile from per-criterion level indices, validating range.
    pub fn profile_from_indices(&self, indices: &[usize]) -> Result<Profile, ValidationError> {
        if indices.len() != self.criteria.len() {
            return Err(ValidationError::invalid_format(
                "profile",
                format!(
                    "expected {} level indices, got {}",
                    self.criteria.len(),
                    indices.len()
                ),
            ));
        }
        for (criterion, &level) in self.criteria.iter().zip(indices) {
            if level >= criterion.levels().len() {
                return Err(ValidationError::out_of_range(
                    "level",
                    0,
                    criterion.levels().len() as i64 - 1,
                    level as i64,
                ));
            }
        }
        Ok(Profile {
            levels: indices.to_vec(),
        })
    }
}

/// One hypothetical option: a full assignment of one level to every
/// criterion, stored as level indices in criteria order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    levels: Vec<usize>,
}

impl Profile {
    /// Returns the level index chosen for `criterion`.
    pub fn level(&self, criterion: usize) -> usize {
        self.levels[criterion]
    }

    /// Iterates the profile as (criterion, level) keys.
    pub fn keys(&self) -> impl Iterator<Item = LevelKey> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(c, &l)| LevelKey::new(c, l))
    }

    /// Returns a copy with one criterion reassigned to another level.
    pub fn with_level(&self, criterion: usize, level: usize) -> Self {
        let mut levels = self.levels.clone();
        levels[criterion] = level;
        Self { levels }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", level)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// The 3x3 decision space used throughout the engine tests.
    pub fn price_speed_support() -> CriteriaSet {
        CriteriaSet::new(vec![
            Criterion::new("Price", ["low", "mid", "high"]).unwrap(),
            Criterion::new("Speed", ["slow", "medium", "fast"]).unwrap(),
            Criterion::new("Support", ["basic", "standard", "premium"]).unwrap(),
        ])
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_requires_three_levels() {
        assert!(Criterion::new("Price", ["low", "high"]).is_err());
        assert!(Criterion::new("Price", ["a", "b", "c", "d"]).is_err());
        assert!(Criterion::new("Price", ["low", "mid", "high"]).is_ok());
    }

    #[test]
    fn criterion_rejects_duplicate_levels() {
        assert!(Criterion::new("Price", ["low", "low", "high"]).is_err());
    }

    #[test]
    fn criteria_set_requires_three_criteria() {
        let c = Criterion::new("Price", ["low", "mid", "high"]).unwrap();
        let err = CriteriaSet::new(vec![c.clone(), c.clone()]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidConfiguration { .. }));
    }

    #[test]
    fn criteria_set_rejects_duplicate_criteria() {
        let c = Criterion::new("Price", ["low", "mid", "high"]).unwrap();
        assert!(CriteriaSet::new(vec![c.clone(), c.clone(), c]).is_err());
    }

    #[test]
    fn non_reference_keys_cover_six_parameters() {
        let set = fixtures::price_speed_support();
        let keys: Vec<_> = set.non_reference_keys().collect();
        assert_eq!(keys.len(), 6);
        assert!(keys.iter().all(|k| k.level != 0));
    }

    #[test]
    fn profile_round_trips_through_names() {
        let set = fixtures::price_speed_support();
        let profile = set.profile_from_indices(&[0, 2, 1]).unwrap();
        let names = set.profile_to_names(&profile);
        assert_eq!(names["Speed"], "fast");
        let back = set.profile_from_names(&names).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn profile_from_names_rejects_unknown_level() {
        let set = fixtures::price_speed_support();
        let mut names = BTreeMap::new();
        names.insert("Price".to_string(), "free".to_string());
        names.insert("Speed".to_string(), "slow".to_string());
        names.insert("Support".to_string(), "basic".to_string());
        assert!(set.profile_from_names(&names).is_err());
    }

    #[test]
    fn profile_from_names_rejects_missing_criterion() {
        let set = fixtures::price_speed_support();
        let mut names = BTreeMap::new();
        names.insert("Price".to_string(), "low".to_string());
        assert!(set.profile_from_names(&names).is_err());
    }

    #[test]
    fn profile_with_level_changes_one_criterion() {
        let set = fixtures::price_speed_support();
        let profile = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let modified = profile.with_level(1, 2);
        assert_eq!(modified.level(0), 0);
        assert_eq!(modified.level(1), 2);
        assert_ne!(profile, modified);
    }

    #[test]
    fn profile_from_indices_rejects_out_of_range() {
        let set = fixtures::price_speed_support();
        assert!(set.profile_from_indices(&[0, 0, 3]).is_err());
        assert!(set.profile_from_indices(&[0, 0]).is_err());
    }
}
