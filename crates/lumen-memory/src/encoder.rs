// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic sparse feature encoder.
//!
//! A text becomes a bag of weighted features: lowercase alphanumeric tokens
//! (stop words removed), synonyms of those tokens, and padded character
//! trigrams of the normalized text. Weights are term counts, L2-normalized.
//! Similarity between two vectors is their dot product, so identical texts
//! score 1.0 and disjoint texts score 0.0.

use std::collections::BTreeMap;

use lumen_core::FeatureVector;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "in", "on", "is", "it", "with",
];

/// Closed synonym table. Each matched token also contributes every listed
/// synonym as a feature.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("favorite", &["favourite", "preferred", "likes"]),
    ("favourite", &["favorite", "preferred"]),
    ("likes", &["favorite", "prefers"]),
    ("like", &["favorite", "prefers"]),
    ("prefers", &["likes", "preferred"]),
    ("preferred", &["favorite", "prefers"]),
    ("coffee", &["espresso", "latte"]),
    ("espresso", &["coffee"]),
    ("latte", &["coffee"]),
    ("movie", &["film"]),
    ("film", &["movie"]),
    ("buy", &["purchase"]),
    ("purchase", &["buy"]),
    ("car", &["automobile", "vehicle"]),
    ("automobile", &["car"]),
    ("capital", &["city"]),
];

/// Trigram features carry a prefix no token can produce.
const TRIGRAM_TAG: &str = "#3:";

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn synonyms_of(token: &str) -> &'static [&'static str] {
    SYNONYMS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, syns)| *syns)
        .unwrap_or(&[])
}

/// Lowercase alphanumeric runs with stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !is_stopword(t))
        .collect()
}

/// Lowercase, every non-alphanumeric character replaced by a space, runs of
/// whitespace collapsed.
fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trigrams(normalized: &str) -> Vec<String> {
    if normalized.is_empty() {
        return Vec::new();
    }
    let padded: Vec<char> = format!(" {normalized} ").chars().collect();
    padded
        .windows(3)
        .map(|w| format!("{TRIGRAM_TAG}{}", w.iter().collect::<String>()))
        .collect()
}

/// Encode `text` into an L2-normalized sparse feature vector.
///
/// Text without any alphanumeric character encodes to the empty vector.
pub fn encode(text: &str) -> FeatureVector {
    let mut counts: BTreeMap<String, f32> = BTreeMap::new();
    let mut bump = |feature: String| *counts.entry(feature).or_insert(0.0) += 1.0;

    for token in tokenize(text) {
        for synonym in synonyms_of(&token) {
            bump((*synonym).to_string());
        }
        bump(token);
    }
    for gram in trigrams(&normalize(text)) {
        bump(gram);
    }

    let norm = counts.values().map(|w| w * w).sum::<f32>().sqrt();
    let norm = if norm == 0.0 { 1.0 } else { norm };
    for weight in counts.values_mut() {
        *weight /= norm;
    }
    FeatureVector::from_map(counts)
}

/// Dot product of two encoded vectors, in `[0, 1]` for normalized input.
pub fn similarity(a: &FeatureVector, b: &FeatureVector) -> f32 {
    a.dot(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn tokens_drop_stopwords_and_punctuation() {
        assert_eq!(
            tokenize("The capital of France, is it Paris?"),
            vec!["capital", "france", "paris"]
        );
    }

    #[test]
    fn synonyms_and_trigrams_are_features() {
        let v = encode("coffee");
        assert!(v.get("coffee").is_some());
        assert!(v.get("espresso").is_some());
        assert!(v.get("latte").is_some());
        assert!(v.get("#3: co").is_some());
        assert!(v.get("#3:ee ").is_some());
    }

    #[test]
    fn trigram_features_cannot_collide_with_tokens() {
        let v = encode("abc");
        assert!(v.get("abc").is_some());
        assert!(v.get("#3:abc").is_some());
    }

    #[test]
    fn vectors_are_unit_length() {
        let v = encode("User likes double espresso with one sugar");
        assert!((v.norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn repeated_tokens_add_weight() {
        let v = encode("paris paris london");
        assert!(v.get("paris").unwrap() > v.get("london").unwrap());
    }

    #[test]
    fn empty_text_is_empty_vector() {
        assert!(encode("").is_empty());
        assert!(encode("  ?! ").is_empty());
        assert_eq!(similarity(&encode(""), &encode("anything")), 0.0);
    }

    #[test]
    fn stopword_only_text_still_has_trigrams() {
        let v = encode("it is");
        assert!(v.get("it").is_none());
        assert!(!v.is_empty());
    }

    #[test]
    fn related_text_beats_unrelated() {
        let query = encode("favorite coffee");
        let near = encode("likes espresso");
        let far = encode("capital of France");
        assert!(similarity(&query, &near) > similarity(&query, &far));
    }

    proptest! {
        #[test]
        fn self_similarity_is_one(text in "[a-zA-Z0-9 ,.?]{1,60}") {
            let v = encode(&text);
            prop_assume!(!v.is_empty());
            prop_assert!((similarity(&v, &v) - 1.0).abs() < 1e-4);
        }

        #[test]
        fn similarity_is_symmetric(a in "[a-z ]{0,40}", b in "[a-z ]{0,40}") {
            let (va, vb) = (encode(&a), encode(&b));
            prop_assert!((similarity(&va, &vb) - similarity(&vb, &va)).abs() < 1e-6);
        }

        #[test]
        fn similarity_is_bounded(a in "[a-z ]{0,40}", b in "[a-z ]{0,40}") {
            let s = similarity(&encode(&a), &encode(&b));
            prop_assert!((-1e-6..=1.0 + 1e-4).contains(&s));
        }
    }
}
