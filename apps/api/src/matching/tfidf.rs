//! TF-IDF vectorizer over the job corpus, used by the alternate text-similarity
//! strategy.
//!
//! Terms are unigrams and bigrams over tokens of at least two characters.
//! Weights are raw term frequency times smoothed IDF, `ln((1 + n) / (1 + df)) + 1`,
//! and every vector is L2-normalized, so cosine similarity is a dot product.

use std::collections::{HashMap, HashSet};

use crate::text::NormalizedText;

/// Single-character tokens carry no signal and are skipped before n-gram building.
const MIN_TERM_CHARS: usize = 2;

type SparseVector = HashMap<usize, f64>;

#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<SparseVector>,
}

impl TfIdfIndex {
    /// Learns the vocabulary and IDF weights from `documents` and stores
    /// their vectors, in order.
    pub fn fit<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedText>,
    {
        let term_lists: Vec<Vec<String>> = documents.into_iter().map(terms).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc_terms in &term_lists {
            let mut seen: HashSet<usize> = HashSet::with_capacity(doc_terms.len());
            for term in doc_terms {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(term.clone()).or_insert(next_id);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                if seen.insert(id) {
                    document_frequency[id] += 1;
                }
            }
        }

        let n = term_lists.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut index = TfIdfIndex {
            vocabulary,
            idf,
            documents: Vec::with_capacity(term_lists.len()),
        };
        let vectors = term_lists
            .iter()
            .map(|doc_terms| index.vectorize(doc_terms))
            .collect();
        index.documents = vectors;
        index
    }

    /// Projects a text into the learned vocabulary. Unknown terms are dropped.
    pub fn transform(&self, text: &NormalizedText) -> SparseVector {
        self.vectorize(&terms(text))
    }

    /// Cosine similarity (0.0 – 1.0) between `query` and every indexed document,
    /// in index order.
    pub fn cosine_similarities(&self, query: &NormalizedText) -> Vec<f64> {
        let query_vector = self.transform(query);
        self.documents
            .iter()
            .map(|doc| dot(&query_vector, doc))
            .collect()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn vectorize(&self, doc_terms: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in doc_terms {
            if let Some(&id) = self.vocabulary.get(term) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }

        for (id, weight) in counts.iter_mut() {
            *weight *= self.idf[*id];
        }

        let norm = counts.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in counts.values_mut() {
                *weight /= norm;
            }
        }
        counts
    }
}

/// Unigrams followed by bigrams.
fn terms(text: &NormalizedText) -> Vec<String> {
    let tokens: Vec<&str> = text
        .tokens()
        .iter()
        .map(String::as_str)
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
        .collect();

    let mut out: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    out.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    out
}

fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(id, w)| large.get(id).map(|other| w * other))
        .sum()
}
