//! TF-IDF term weighting over one corpus.
//!
//! Every document contributes `tf(t, d) * idf(t)` to the score of each term it
//! contains, with the smoothed inverse document frequency
//! `idf(t) = ln((1 + N) / (1 + df(t))) + 1`. A term found in every document
//! keeps an idf of exactly 1, so it is demoted but never erased.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::tokenizer::Tokenizer;

/// How a term's count inside one document becomes its term frequency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermFrequency {
    /// Count divided by the number of terms in the document, so a long post
    /// cannot outweigh many short ones.
    #[default]
    Normalized,
    /// Plain occurrence count.
    Raw,
    /// Raw count times idf, with each document's vector scaled to unit length.
    L2,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TermScore {
    pub term: String,
    pub score: f32,
    /// Number of documents containing the term.
    pub document_frequency: usize,
}

/// Term scores of one corpus, iterated in lexicographic term order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TermScores {
    scores: Vec<TermScore>,
    documents: usize,
}

impl TermScores {
    /// Builds a mapping from arbitrary scores, e.g. precomputed frequencies.
    /// Duplicate terms are summed and negative or NaN scores become 0.
    pub fn from_scores<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let mut merged: BTreeMap<String, f32> = BTreeMap::new();
        for (term, score) in scores {
            let score = if score.is_nan() { 0.0 } else { score.max(0.0) };
            *merged.entry(term.into()).or_insert(0.0) += score;
        }

        TermScores {
            scores: merged
                .into_iter()
                .map(|(term, score)| TermScore {
                    term,
                    score,
                    document_frequency: 0,
                })
                .collect(),
            documents: 0,
        }
    }

    pub fn get(&self, term: &str) -> Option<f32> {
        self.scores
            .binary_search_by(|entry| entry.term.as_str().cmp(term))
            .ok()
            .map(|index| self.scores[index].score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TermScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of documents the scores were computed from.
    pub fn document_count(&self) -> usize {
        self.documents
    }

    /// The `n` best terms, highest score first. Equal scores keep
    /// lexicographic order.
    pub fn ranked(&self, n: usize) -> Vec<&TermScore> {
        let mut ranked: Vec<&TermScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(n);
        ranked
    }
}

/// Smoothed inverse document frequency.
pub fn idf(documents: usize, document_frequency: usize) -> f32 {
    (((1 + documents) as f64 / (1 + document_frequency) as f64).ln() + 1.0) as f32
}

pub fn score<S>(corpus: &[S], tokenizer: &Tokenizer, mode: TermFrequency) -> TermScores
where
    S: AsRef<str> + Sync,
{
    let counts = count_terms(corpus, tokenizer);

    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &counts {
        for term in doc.keys() {
            *document_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let documents = corpus.len();
    let idfs: BTreeMap<&str, f32> = document_frequency
        .iter()
        .map(|(term, df)| (*term, idf(documents, *df)))
        .collect();

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for doc in &counts {
        let length: usize = doc.values().sum();
        let weights: Vec<(&str, f64)> = doc
            .iter()
            .map(|(term, count)| {
                let idf = idfs[term.as_str()] as f64;
                let weight = match mode {
                    TermFrequency::Normalized => *count as f64 / length as f64 * idf,
                    TermFrequency::Raw | TermFrequency::L2 => *count as f64 * idf,
                };
                (term.as_str(), weight)
            })
            .collect();

        let norm = match mode {
            TermFrequency::L2 => weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            _ => 1.0,
        };

        for (term, weight) in weights {
            *totals.entry(term).or_insert(0.0) += weight / norm;
        }
    }

    debug!(
        documents,
        vocabulary = totals.len(),
        ?mode,
        "Scored corpus terms"
    );

    TermScores {
        scores: totals
            .into_iter()
            .map(|(term, score)| TermScore {
                term: term.to_string(),
                score: score as f32,
                document_frequency: document_frequency[term],
            })
            .collect(),
        documents,
    }
}

// Documents without any surviving term are dropped here; they still count
// towards N in the idf.
#[cfg(not(feature = "parallel"))]
fn count_terms<S: AsRef<str>>(
    corpus: &[S],
    tokenizer: &Tokenizer,
) -> Vec<BTreeMap<String, usize>> {
    corpus
        .iter()
        .map(|doc| tokenizer.term_counts(doc.as_ref()))
        .filter(|counts| !counts.is_empty())
        .collect()
}

#[cfg(feature = "parallel")]
fn count_terms<S: AsRef<str> + Sync>(
    corpus: &[S],
    tokenizer: &Tokenizer,
) -> Vec<BTreeMap<String, usize>> {
    corpus
        .par_iter()
        .map(|doc| tokenizer.term_counts(doc.as_ref()))
        .filter(|counts| !counts.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{idf, score, TermFrequency, TermScore, TermScores};
    use crate::stopwords::Stopwords;
    use crate::tokenizer::Tokenizer;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(Stopwords::empty())
    }

    #[test]
    fn idf_of_ubiquitous_term_is_one() {
        assert_eq!(idf(5, 5), 1.0);
        assert!(idf(5, 1) > idf(5, 2));
    }

    #[test]
    fn normalized_scores_match_hand_computation() {
        let corpus = ["silver price rises", "silver demand grows", "gold falls"];
        let scores = score(&corpus, &tokenizer(), TermFrequency::Normalized);

        let silver = 2.0 * (1.0 / 3.0) * ((4.0f32 / 3.0).ln() + 1.0);
        let gold = 0.5 * ((4.0f32 / 2.0).ln() + 1.0);
        assert!((scores.get("silver").unwrap() - silver).abs() < 1e-5);
        assert!((scores.get("gold").unwrap() - gold).abs() < 1e-5);
        assert_eq!(scores.len(), 7);
        assert_eq!(scores.document_count(), 3);
    }

    // Holds with and without the `parallel` feature.
    #[test]
    fn scores_are_bit_exact() {
        let corpus = ["silver price rises", "silver demand grows", "gold falls"];
        let entry = |term: &str, bits: u32, document_frequency: usize| TermScore {
            term: term.to_string(),
            score: f32::from_bits(bits),
            document_frequency,
        };
        let expected = TermScores {
            scores: vec![
                entry("demand", 0x3f10_7b5d, 1),
                entry("falls", 0x3f58_b90c, 1),
                entry("gold", 0x3f58_b90c, 1),
                entry("grows", 0x3f10_7b5d, 1),
                entry("price", 0x3f10_7b5d, 1),
                entry("rises", 0x3f10_7b5d, 1),
                entry("silver", 0x3f5b_c3b0, 2),
            ],
            documents: 3,
        };

        assert_eq!(score(&corpus, &tokenizer(), TermFrequency::Normalized), expected);
    }

    #[test]
    fn raw_mode_rewards_repetition() {
        let corpus = ["gold gold gold silver", "silver"];
        let scores = score(&corpus, &tokenizer(), TermFrequency::Raw);
        assert!(scores.get("gold").unwrap() > scores.get("silver").unwrap());
        assert!((scores.get("silver").unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn l2_mode_caps_each_document_at_unit_length() {
        let corpus = ["gold", "gold"];
        let scores = score(&corpus, &tokenizer(), TermFrequency::L2);
        assert!((scores.get("gold").unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn empty_documents_score_nothing() {
        let corpus = ["", "", ""];
        assert!(score(&corpus, &tokenizer(), TermFrequency::Normalized).is_empty());

        let corpus: [&str; 0] = [];
        assert!(score(&corpus, &tokenizer(), TermFrequency::Normalized).is_empty());
    }

    #[test]
    fn ranked_breaks_ties_lexicographically() {
        let scores = TermScores::from_scores([("b", 1.0), ("a", 1.0), ("c", 2.0)]);
        let ranked: Vec<_> = scores.ranked(3).iter().map(|s| s.term.as_str()).collect();
        assert_eq!(ranked, vec!["c", "a", "b"]);
        assert_eq!(scores.ranked(1).len(), 1);
    }

    #[test]
    fn from_scores_clamps_negative_values() {
        let scores = TermScores::from_scores([("a", -3.0), ("b", f32::NAN), ("a", 1.0)]);
        assert_eq!(scores.get("a"), Some(1.0));
        assert_eq!(scores.get("b"), Some(0.0));
        assert_eq!(scores.get("zzz"), None);
    }
}
