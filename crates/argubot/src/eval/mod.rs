//! Dialogue evaluation: the [`Eval`] aggregate and the LLM-as-judge protocol.
//!
//! An [`Eval`] holds the numeric ratings and free-form comments collected for
//! one or more dialogues. Evals add up, so a campaign folds each trial's
//! result into a running total and reports means at the end.
//!
//! ```rust
//! use argubot::eval::Eval;
//!
//! let first = Eval::from_scores([("engaged", 4), ("moral", 2)]);
//! let second = Eval::from_scores([("engaged", 2)]);
//! let total = first + second;
//!
//! assert_eq!(total.count(), 2);
//! assert_eq!(total.mean()["engaged"], 3.0);
//! assert_eq!(total.mean()["TOTAL"], 5.0);
//! ```

pub mod config;
pub mod error;
pub mod protocol;

pub use config::{EvalConfig, judge};
pub use error::EvalError;
pub use protocol::{
    CampaignRecord, CampaignStore, EvalCampaign, EvalContext, eval_by_observer,
    eval_by_participant,
};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Key of the sum of per-criterion means in [`Eval::mean`].
pub const TOTAL: &str = "TOTAL";

/// A free-form answer and who gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub evaluator: String,
    pub text: String,
}

impl Comment {
    pub fn new(evaluator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            evaluator: evaluator.into(),
            text: text.into(),
        }
    }
}

/// Aggregated results of one or more dialogue evaluations.
///
/// `scores` is the total rating per criterion and `denoms` the number of
/// ratings behind it, so means skip missing ratings. Both always have the
/// same keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvalParts")]
pub struct Eval {
    scores: BTreeMap<String, i64>,
    denoms: BTreeMap<String, u32>,
    comments: BTreeMap<String, Vec<Comment>>,
}

#[derive(Deserialize)]
struct EvalParts {
    #[serde(default)]
    scores: BTreeMap<String, i64>,
    #[serde(default)]
    denoms: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    comments: BTreeMap<String, Vec<Comment>>,
}

impl TryFrom<EvalParts> for Eval {
    type Error = EvalError;

    fn try_from(parts: EvalParts) -> Result<Self, Self::Error> {
        Eval::new(parts.comments, parts.scores, parts.denoms)
    }
}

impl Eval {
    /// Builds an eval, counting one rating per score when `denoms` is `None`.
    pub fn new(
        comments: BTreeMap<String, Vec<Comment>>,
        scores: BTreeMap<String, i64>,
        denoms: Option<BTreeMap<String, u32>>,
    ) -> Result<Self, EvalError> {
        let denoms = denoms.unwrap_or_else(|| scores.keys().map(|k| (k.clone(), 1)).collect());

        let score_keys: BTreeSet<&String> = scores.keys().collect();
        let denom_keys: BTreeSet<&String> = denoms.keys().collect();
        if score_keys != denom_keys {
            return Err(EvalError::KeyMismatch {
                scores: scores.keys().cloned().collect(),
                denoms: denoms.keys().cloned().collect(),
            });
        }
        if let Some((key, _)) = denoms.iter().find(|&(_, &d)| d == 0) {
            return Err(EvalError::ZeroDenominator { key: key.clone() });
        }

        Ok(Self {
            scores,
            denoms,
            comments,
        })
    }

    /// One rating per criterion, no comments.
    pub fn from_scores<I, K>(scores: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        let scores: BTreeMap<String, i64> = scores.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let denoms = scores.keys().map(|k| (k.clone(), 1)).collect();
        Self {
            scores,
            denoms,
            comments: BTreeMap::new(),
        }
    }

    /// Appends a comment under `question`.
    pub fn with_comment(mut self, question: impl Into<String>, comment: Comment) -> Self {
        self.comments.entry(question.into()).or_default().push(comment);
        self
    }

    pub fn scores(&self) -> &BTreeMap<String, i64> {
        &self.scores
    }

    pub fn denoms(&self) -> &BTreeMap<String, u32> {
        &self.denoms
    }

    pub fn comments(&self) -> &BTreeMap<String, Vec<Comment>> {
        &self.comments
    }

    /// Approximate number of dialogues evaluated: the largest denominator.
    pub fn count(&self) -> u32 {
        self.denoms.values().copied().max().unwrap_or(0)
    }

    /// Mean rating per criterion, plus their sum under [`TOTAL`].
    pub fn mean(&self) -> BTreeMap<String, f64> {
        let mut means: BTreeMap<String, f64> = self
            .scores
            .iter()
            .map(|(k, score)| {
                let denom = self.denoms.get(k).copied().unwrap_or(0);
                (k.clone(), *score as f64 / f64::from(denom))
            })
            .collect();
        let total = means.values().sum();
        means.insert(TOTAL.to_string(), total);
        means
    }
}

impl AddAssign<&Eval> for Eval {
    fn add_assign(&mut self, other: &Eval) {
        for (k, score) in &other.scores {
            *self.scores.entry(k.clone()).or_insert(0) += score;
        }
        for (k, denom) in &other.denoms {
            *self.denoms.entry(k.clone()).or_insert(0) += denom;
        }
        for (k, comments) in &other.comments {
            self.comments
                .entry(k.clone())
                .or_default()
                .extend(comments.iter().cloned());
        }
    }
}

impl AddAssign for Eval {
    fn add_assign(&mut self, other: Eval) {
        *self += &other;
    }
}

impl Add for Eval {
    type Output = Eval;

    fn add(mut self, other: Eval) -> Eval {
        self += &other;
        self
    }
}

impl Add<&Eval> for &Eval {
    type Output = Eval;

    fn add(self, other: &Eval) -> Eval {
        let mut sum = self.clone();
        sum += other;
        sum
    }
}

impl Sum for Eval {
    fn sum<I: Iterator<Item = Eval>>(iter: I) -> Self {
        iter.fold(Eval::default(), Add::add)
    }
}

impl<'a> Sum<&'a Eval> for Eval {
    fn sum<I: Iterator<Item = &'a Eval>>(iter: I) -> Self {
        iter.fold(Eval::default(), |mut acc, e| {
            acc += e;
            acc
        })
    }
}

impl fmt::Display for Eval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Eval of ≈ {} dialogues:\n{:?}", self.count(), self.mean())?;
        for (question, comments) in &self.comments {
            write!(f, "\n\nComments from {question} question:")?;
            for comment in comments {
                write!(f, "\n({}) {}", comment.evaluator, comment.text)?;
            }
        }
        Ok(())
    }
}
