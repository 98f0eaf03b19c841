//! The claim corpus consulted by knowledge-lookup argubots.
//!
//! A corpus holds argumentative claims arranged in debate trees: each claim
//! may list "pro" claims supporting it and "con" claims arguing against it.
//! [`ClaimStore`] is the nearest-neighbour seam; [`ClaimCorpus`] is an
//! in-memory implementation ranking claims with BM25.

use crate::agent::AgentError;
use rand::RngCore;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// Restricts which claims a similarity query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimKind {
    #[default]
    Any,
    /// Only claims that have at least one counterargument.
    HasCons,
    /// Only claims that have at least one supporting argument.
    HasPros,
}

/// Nearest-neighbour lookup over a fixed claim corpus.
pub trait ClaimStore: Send + Sync {
    /// Returns up to `n` claims most similar to `query`, best first.
    ///
    /// When `threshold` is given, claims scoring below it are dropped.
    fn closest(
        &self,
        query: &str,
        n: usize,
        kind: ClaimKind,
        threshold: Option<f64>,
    ) -> Result<Vec<String>, AgentError>;

    /// Counterarguments recorded for `claim`.
    fn cons(&self, claim: &str) -> Vec<String>;

    /// Supporting arguments recorded for `claim`.
    fn pros(&self, claim: &str) -> Vec<String>;

    /// A random top-level claim to open a conversation with.
    fn random_seed_claim(&self, rng: &mut dyn RngCore) -> Option<String>;
}

const BM25_K1: f64 = 1.2;
const BM25_B: f64 = 0.75;

#[derive(Debug, Clone)]
struct ClaimEntry {
    text: String,
    term_counts: HashMap<String, usize>,
    len: usize,
    pros: Vec<String>,
    cons: Vec<String>,
}

/// An in-memory claim corpus ranked with BM25.
///
/// # Examples
///
/// ```rust
/// use argubot::claims::{ClaimCorpus, ClaimKind, ClaimStore};
///
/// let mut corpus = ClaimCorpus::new();
/// corpus.add_claim("Eating meat is wrong.");
/// corpus.add_con("Eating meat is wrong.", "Humans evolved to eat meat.");
///
/// let hits = corpus.closest("is meat wrong", 3, ClaimKind::HasCons, None).unwrap();
/// assert_eq!(hits, vec!["Eating meat is wrong.".to_string()]);
/// assert_eq!(corpus.cons(&hits[0]), vec!["Humans evolved to eat meat.".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClaimCorpus {
    entries: Vec<ClaimEntry>,
    index: HashMap<String, usize>,
    roots: Vec<usize>,
    doc_freq: HashMap<String, usize>,
    total_len: usize,
}

impl ClaimCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level claim (a debate thesis). Returns false if it already existed.
    pub fn add_claim(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.index.contains_key(&text) {
            return false;
        }
        let id = self.insert(text);
        self.roots.push(id);
        true
    }

    /// Records `pro` as supporting `parent`; both become claims of the corpus.
    pub fn add_pro(&mut self, parent: &str, pro: impl Into<String>) {
        let pro = pro.into();
        let parent_id = self.ensure(parent, true);
        self.ensure(&pro, false);
        self.entries[parent_id].pros.push(pro);
    }

    /// Records `con` as a counterargument to `parent`; both become claims of the corpus.
    pub fn add_con(&mut self, parent: &str, con: impl Into<String>) {
        let con = con.into();
        let parent_id = self.ensure(parent, true);
        self.ensure(&con, false);
        self.entries[parent_id].cons.push(con);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `text`, inserting it if missing. New parents become top-level claims.
    fn ensure(&mut self, text: &str, as_root: bool) -> usize {
        if let Some(&id) = self.index.get(text) {
            return id;
        }
        let id = self.insert(text.to_string());
        if as_root {
            self.roots.push(id);
        }
        id
    }

    fn insert(&mut self, text: String) -> usize {
        let tokens = tokenize(&text);
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        for token in &tokens {
            *term_counts.entry(token.clone()).or_default() += 1;
        }
        for term in term_counts.keys() {
            *self.doc_freq.entry(term.clone()).or_default() += 1;
        }
        self.total_len += tokens.len();

        let id = self.entries.len();
        self.index.insert(text.clone(), id);
        self.entries.push(ClaimEntry {
            text,
            term_counts,
            len: tokens.len(),
            pros: Vec::new(),
            cons: Vec::new(),
        });
        id
    }

    fn bm25(&self, entry: &ClaimEntry, query_terms: &[String]) -> f64 {
        let n = self.entries.len() as f64;
        let avgdl = (self.total_len as f64 / n).max(1.0);
        query_terms
            .iter()
            .filter_map(|term| {
                let tf = *entry.term_counts.get(term)? as f64;
                let df = *self.doc_freq.get(term)? as f64;
                let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                let norm = BM25_K1 * (1.0 - BM25_B + BM25_B * entry.len as f64 / avgdl);
                Some(idf * tf * (BM25_K1 + 1.0) / (tf + norm))
            })
            .sum()
    }

    fn get(&self, claim: &str) -> Option<&ClaimEntry> {
        self.index.get(claim).map(|&id| &self.entries[id])
    }
}

impl ClaimStore for ClaimCorpus {
    fn closest(
        &self,
        query: &str,
        n: usize,
        kind: ClaimKind,
        threshold: Option<f64>,
    ) -> Result<Vec<String>, AgentError> {
        let query_terms = tokenize(query);
        let mut scored: Vec<(f64, usize)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| match kind {
                ClaimKind::Any => true,
                ClaimKind::HasCons => !entry.cons.is_empty(),
                ClaimKind::HasPros => !entry.pros.is_empty(),
            })
            .map(|(id, entry)| (self.bm25(entry, &query_terms), id))
            .filter(|(score, _)| threshold.is_none_or(|t| *score >= t))
            .collect();

        // Stable sort keeps insertion order among ties.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(n)
            .map(|(_, id)| self.entries[id].text.clone())
            .collect())
    }

    fn cons(&self, claim: &str) -> Vec<String> {
        self.get(claim).map(|e| e.cons.clone()).unwrap_or_default()
    }

    fn pros(&self, claim: &str) -> Vec<String> {
        self.get(claim).map(|e| e.pros.clone()).unwrap_or_default()
    }

    fn random_seed_claim(&self, rng: &mut dyn RngCore) -> Option<String> {
        self.roots
            .choose(rng)
            .map(|&id| self.entries[id].text.clone())
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corpus() -> ClaimCorpus {
        let mut corpus = ClaimCorpus::new();
        corpus.add_claim("Eating meat is morally wrong.");
        corpus.add_con(
            "Eating meat is morally wrong.",
            "Humans have always eaten meat.",
        );
        corpus.add_pro(
            "Eating meat is morally wrong.",
            "Animals feel pain and fear.",
        );
        corpus.add_claim("Guns should be banned.");
        corpus.add_con("Guns should be banned.", "Banning guns disarms victims.");
        corpus
    }

    #[test]
    fn test_children_become_claims() {
        let mut corpus = corpus();
        assert_eq!(corpus.len(), 5);
        assert!(!corpus.add_claim("Guns should be banned."));
    }

    #[test]
    fn test_closest_ranks_by_overlap() {
        let corpus = corpus();
        let hits = corpus
            .closest("why are guns banned", 3, ClaimKind::Any, None)
            .unwrap();
        assert_eq!(hits[0], "Guns should be banned.");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_kind_filter() {
        let corpus = corpus();
        let hits = corpus.closest("meat", 10, ClaimKind::HasPros, None).unwrap();
        assert_eq!(hits, vec!["Eating meat is morally wrong.".to_string()]);

        let hits = corpus.closest("anything", 10, ClaimKind::HasCons, None).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_threshold_drops_weak_matches() {
        let corpus = corpus();
        let hits = corpus
            .closest("unrelated words", 3, ClaimKind::HasCons, Some(0.1))
            .unwrap();
        assert!(hits.is_empty());

        let hits = corpus
            .closest("meat morally wrong", 3, ClaimKind::HasCons, Some(0.1))
            .unwrap();
        assert_eq!(hits, vec!["Eating meat is morally wrong.".to_string()]);
    }

    #[test]
    fn test_pros_and_cons_lookup() {
        let corpus = corpus();
        assert_eq!(
            corpus.pros("Eating meat is morally wrong."),
            vec!["Animals feel pain and fear.".to_string()]
        );
        assert!(corpus.cons("Animals feel pain and fear.").is_empty());
        assert!(corpus.cons("not in corpus").is_empty());
    }

    #[test]
    fn test_random_seed_claim_is_a_root() {
        let corpus = corpus();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let seed = corpus.random_seed_claim(&mut rng).unwrap();
            assert!(seed == "Eating meat is morally wrong." || seed == "Guns should be banned.");
        }
        assert!(ClaimCorpus::new().random_seed_claim(&mut rng).is_none());
    }
}
