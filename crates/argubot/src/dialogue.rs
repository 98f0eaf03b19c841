//! Immutable multi-speaker dialogues.
//!
//! A [`Dialogue`] is an ordered sequence of [`Turn`]s, earliest first. It has
//! value semantics: every operation that looks like a mutation returns a new
//! dialogue and leaves the receiver untouched. Speakers are plain names such
//! as `"Alice"` or `"Bob"`.
//!
//! # Examples
//!
//! ```rust
//! use argubot::dialogue::Dialogue;
//!
//! let d = Dialogue::new()
//!     .add("Alice", "Is pineapple on pizza acceptable?")
//!     .add("Bob", "Absolutely not.");
//!
//! assert_eq!(d.len(), 2);
//! assert_eq!(d.to_string(), "(Alice) Is pineapple on pizza acceptable?\n(Bob) Absolutely not.");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Bound, Index, Mul, RangeBounds};

/// A single utterance in a dialogue, attributed to a named speaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: String,
    pub content: String,
}

impl Turn {
    pub fn new(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            content: content.into(),
        }
    }
}

/// An immutable dialogue among any number of speakers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dialogue {
    turns: Vec<Turn>,
}

impl Dialogue {
    /// Creates an empty dialogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-destructively appends a new turn.
    pub fn add(&self, speaker: impl Into<String>, content: impl Into<String>) -> Dialogue {
        self.clone().with_turn(speaker, content)
    }

    /// Consuming form of [`Dialogue::add`]; reuses the existing allocation.
    pub fn with_turn(mut self, speaker: impl Into<String>, content: impl Into<String>) -> Dialogue {
        self.turns.push(Turn::new(speaker, content));
        self
    }

    /// Non-destructively renames every turn spoken by `old` to `new`.
    pub fn rename(&self, old: &str, new: &str) -> Dialogue {
        self.turns
            .iter()
            .map(|turn| {
                let speaker = if turn.speaker == old {
                    new
                } else {
                    turn.speaker.as_str()
                };
                Turn::new(speaker, turn.content.clone())
            })
            .collect()
    }

    /// Returns the turns of `self` followed by the turns of `other`.
    pub fn concat(&self, other: &Dialogue) -> Dialogue {
        self.turns.iter().chain(other.turns.iter()).cloned().collect()
    }

    /// Returns the whole dialogue repeated `n` times in sequence.
    pub fn repeat(&self, n: usize) -> Dialogue {
        std::iter::repeat_n(self.turns.iter(), n)
            .flatten()
            .cloned()
            .collect()
    }

    /// Returns the sub-dialogue covering `range`, clamped to the dialogue's bounds.
    ///
    /// ```rust
    /// use argubot::dialogue::Dialogue;
    ///
    /// let d = Dialogue::new().add("A", "1").add("B", "2").add("A", "3");
    /// assert_eq!(d.slice(1..).len(), 2);
    /// assert_eq!(d.slice(..10).len(), 3);
    /// ```
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Dialogue {
        let len = self.turns.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .clamp(start, len);

        Dialogue {
            turns: self.turns[start..end].to_vec(),
        }
    }

    /// Returns the turn at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    /// Returns the most recent turn, if any.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Distinct speakers in order of first appearance.
    pub fn speakers(&self) -> Vec<&str> {
        let mut speakers: Vec<&str> = Vec::new();
        for turn in &self.turns {
            if !speakers.contains(&turn.speaker.as_str()) {
                speakers.push(&turn.speaker);
            }
        }
        speakers
    }

    /// Returns true if `name` spoke at least once.
    pub fn has_speaker(&self, name: &str) -> bool {
        self.turns.iter().any(|turn| turn.speaker == name)
    }

    /// Formats the dialogue like a play script, for inclusion in an LLM prompt.
    ///
    /// ```rust
    /// use argubot::dialogue::Dialogue;
    ///
    /// let d = Dialogue::new().add("Alice", "Hi").add("Bob", "Hello");
    /// assert_eq!(d.script(), "\"\"\"\nAlice: Hi\n\nBob: Hello\n\"\"\"");
    /// ```
    pub fn script(&self) -> String {
        let body = self
            .turns
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker, turn.content))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("\"\"\"\n{body}\n\"\"\"")
    }
}

impl fmt::Display for Dialogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .turns
            .iter()
            .map(|turn| format!("({}) {}", turn.speaker, turn.content))
            .collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}

impl From<Vec<Turn>> for Dialogue {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

impl FromIterator<Turn> for Dialogue {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dialogue {
    type Item = Turn;
    type IntoIter = std::vec::IntoIter<Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dialogue {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

impl Index<usize> for Dialogue {
    type Output = Turn;

    fn index(&self, index: usize) -> &Turn {
        &self.turns[index]
    }
}

impl Add<&Dialogue> for &Dialogue {
    type Output = Dialogue;

    fn add(self, other: &Dialogue) -> Dialogue {
        self.concat(other)
    }
}

impl Mul<usize> for &Dialogue {
    type Output = Dialogue;

    fn mul(self, n: usize) -> Dialogue {
        self.repeat(n)
    }
}

impl Mul<usize> for Dialogue {
    type Output = Dialogue;

    fn mul(self, n: usize) -> Dialogue {
        self.repeat(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Dialogue {
        Dialogue::new()
            .add("Alice", "one")
            .add("Bob", "two")
            .add("Alice", "three")
    }

    #[test]
    fn test_add_is_non_destructive() {
        let d = abc();
        let extended = d.add("Cara", "four");

        assert_eq!(d.len(), 3);
        assert_eq!(extended.len(), 4);
        assert_eq!(extended.last(), Some(&Turn::new("Cara", "four")));
        assert_eq!(extended.slice(..3), d);
    }

    #[test]
    fn test_rename_preserves_order() {
        let renamed = abc().rename("Alice", "Alicia");
        let speakers: Vec<_> = renamed.iter().map(|t| t.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["Alicia", "Bob", "Alicia"]);
        assert_eq!(renamed[2].content, "three");
    }

    #[test]
    fn test_concat_is_associative() {
        let d1 = abc();
        let d2 = Dialogue::new().add("Cara", "x");
        let d3 = Dialogue::new().add("Dan", "y").add("Eve", "z");

        let left = d1.concat(&d2).concat(&d3);
        let right = d1.concat(&d2.concat(&d3));
        assert_eq!(left, right);
        assert_eq!(left.len(), 6);
        assert_eq!(&d1 + &d2, d1.concat(&d2));
    }

    #[test]
    fn test_repeat() {
        let d = Dialogue::new().add("A", "hi");
        assert_eq!(d.repeat(3).len(), 3);
        assert!(d.repeat(0).is_empty());
        assert_eq!(&d * 2, d.concat(&d));

        let twice = abc().repeat(2);
        assert_eq!(twice.len(), 6);
        assert_eq!(twice.slice(3..), abc());
        assert_eq!(twice[3], Turn::new("Alice", "one"));
    }

    #[test]
    fn test_add_method_with_ops_add_in_scope() {
        #[allow(unused_imports)]
        use std::ops::Add as _;

        let d = Dialogue::new().add("Alice", "one").add("Bob", "two");
        assert_eq!(d.len(), 2);
        assert_eq!(&d + &abc(), d.concat(&abc()));
    }

    #[test]
    fn test_slice_variants() {
        let d = abc();
        assert_eq!(d.slice(1..2).turns(), &[Turn::new("Bob", "two")]);
        assert_eq!(d.slice(..=1).len(), 2);
        assert_eq!(d.slice(2..1).len(), 0);
        assert_eq!(d.slice(5..).len(), 0);
        assert_eq!(d.get(0), Some(&Turn::new("Alice", "one")));
        assert_eq!(d.get(3), None);
    }

    #[test]
    fn test_speakers_in_first_appearance_order() {
        let d = abc().add("Cara", "four");
        assert_eq!(d.speakers(), vec!["Alice", "Bob", "Cara"]);
        assert!(d.has_speaker("Bob"));
        assert!(!d.has_speaker("Dan"));
    }

    #[test]
    fn test_script_and_display() {
        let d = Dialogue::new().add("Alice", "Hi").add("Bob", "Hello");
        assert_eq!(d.script(), "\"\"\"\nAlice: Hi\n\nBob: Hello\n\"\"\"");
        assert_eq!(d.to_string(), "(Alice) Hi\n(Bob) Hello");
        assert_eq!(Dialogue::new().script(), "\"\"\"\n\n\"\"\"");
    }

    #[test]
    fn test_serde_is_a_plain_list_of_turns() {
        let d = Dialogue::new().add("Alice", "Hi");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"[{"speaker":"Alice","content":"Hi"}]"#);
        let back: Dialogue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
