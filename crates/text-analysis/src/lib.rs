//! # Text analysis
//!
//! Deterministic, rule-based analysis of a chat message: question detection, topic category,
//! sentiment with a bounded score, and frequency-ranked keywords. Pure functions; no I/O.
//! Used whenever the AI backend is unavailable.
//!
//! All substring matching is case-insensitive and runs against the lowercased text.

mod labels;
mod lexicon;

use serde::{Deserialize, Serialize};

pub use labels::{Intent, Sentiment, UnknownLabel, Urgency};
pub use lexicon::{NEGATIVE_WORDS, POSITIVE_WORDS, QUESTION_WORDS, STOP_WORDS, TOPIC_KEYWORDS};

/// Default number of keywords returned by [`analyze`].
pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalAnalysis {
    pub is_question: bool,
    pub topic: Option<String>,
    pub sentiment: Sentiment,
    /// In [0.0, 1.0]; 0.5 is neutral.
    pub sentiment_score: f64,
    pub keywords: Vec<String>,
}

impl LexicalAnalysis {
    /// Fixed result for empty text.
    pub fn neutral() -> Self {
        Self {
            is_question: false,
            topic: None,
            sentiment: Sentiment::Neutral,
            sentiment_score: 0.5,
            keywords: Vec::new(),
        }
    }
}

pub fn is_question(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text.contains('?') {
        return true;
    }
    let lower = text.to_lowercase();
    QUESTION_WORDS.iter().any(|word| lower.contains(word))
}

/// Highest-scoring topic category by keyword hits; None when nothing matches.
pub fn detect_topic(text: &str) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();

    let mut best: Option<(&'static str, usize)> = None;
    for (topic, keywords) in TOPIC_KEYWORDS {
        let score = count_hits(&lower, keywords);
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((topic, score)),
        }
    }
    best.map(|(topic, _)| topic)
}

/// Returns the label and a score in [0.0, 1.0].
pub fn detect_sentiment(text: &str) -> (Sentiment, f64) {
    if text.is_empty() {
        return (Sentiment::Neutral, 0.5);
    }
    if is_question(text) {
        return (Sentiment::Question, 0.5);
    }

    let lower = text.to_lowercase();
    let positive = count_hits(&lower, POSITIVE_WORDS);
    let negative = count_hits(&lower, NEGATIVE_WORDS);

    if positive > negative {
        (Sentiment::Positive, (0.5 + 0.1 * positive as f64).min(1.0))
    } else if negative > positive {
        (Sentiment::Negative, (0.5 - 0.1 * negative as f64).max(0.0))
    } else {
        (Sentiment::Neutral, 0.5)
    }
}

/// Most frequent non-stop-word tokens longer than two characters.
/// Ties keep first-occurrence order.
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    let lower = text.to_lowercase();

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for token in lower.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        if token.chars().count() <= 2 || STOP_WORDS.contains(&token) {
            continue;
        }
        match counts.iter_mut().find(|(word, _)| *word == token) {
            Some((_, count)) => *count += 1,
            None => counts.push((token, 1)),
        }
    }

    // stable sort keeps first-occurrence order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(top_n)
        .map(|(word, _)| word.to_string())
        .collect()
}

pub fn analyze(text: &str) -> LexicalAnalysis {
    if text.is_empty() {
        return LexicalAnalysis::neutral();
    }
    let (sentiment, sentiment_score) = detect_sentiment(text);
    LexicalAnalysis {
        is_question: is_question(text),
        topic: detect_topic(text).map(str::to_string),
        sentiment,
        sentiment_score,
        keywords: extract_keywords(text, DEFAULT_KEYWORD_COUNT),
    }
}

fn count_hits(lower: &str, words: &[&str]) -> usize {
    words.iter().filter(|word| lower.contains(*word)).count()
}
