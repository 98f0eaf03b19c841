//! Evaluation settings.

use crate::character::Character;
use std::ops::RangeInclusive;

/// Settings shared by the evaluation protocol and campaigns.
///
/// Override individual fields with struct update syntax:
///
/// ```rust
/// use argubot::eval::EvalConfig;
///
/// let quick = EvalConfig { turns: 4, reps: 1, ..EvalConfig::default() };
/// assert_eq!(quick.research_team, "NLP class students");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Turns per simulated dialogue, including the opening starter.
    pub turns: usize,
    /// Dialogues simulated per character.
    pub reps: usize,
    /// Speaker name used when asking evaluation questions.
    pub research_team: String,
    /// Rating range for questions put to participants.
    pub participant_scale: RangeInclusive<i64>,
    /// Rating range for questions put to the observer.
    pub observer_scale: RangeInclusive<i64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            turns: 6,
            reps: 2,
            research_team: "NLP class students".to_string(),
            participant_scale: 1..=5,
            observer_scale: 1..=10,
        }
    }
}

/// The external observer who rates argubots in campaigns.
pub fn judge() -> Character {
    Character::new(
        "Judge Wise",
        Vec::<String>::new(),
        "a social scientist who studies and assesses political conversations",
    )
}
