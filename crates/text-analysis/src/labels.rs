//! Label vocabularies shared by the lexical analyzer, the AI client and storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sentiment label. `Question` is produced only by the lexical analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Question,
}

impl Sentiment {
    /// Labels an AI model may answer with, in match priority order.
    pub const AI_LABELS: [Sentiment; 3] =
        [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Question => "question",
        }
    }

    /// Numeric score stored on analysis records: positive 0.8, negative -0.8, otherwise 0.0.
    pub fn score(&self) -> f64 {
        match self {
            Sentiment::Positive => 0.8,
            Sentiment::Negative => -0.8,
            Sentiment::Neutral | Sentiment::Question => 0.0,
        }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Sentiment::Neutral
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            "question" => Ok(Sentiment::Question),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// What the author is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Question,
    Complaint,
    Feedback,
    Request,
    Greeting,
    General,
}

impl Intent {
    /// All labels in match priority order.
    pub const ALL: [Intent; 6] = [
        Intent::Question,
        Intent::Complaint,
        Intent::Feedback,
        Intent::Request,
        Intent::Greeting,
        Intent::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Question => "question",
            Intent::Complaint => "complaint",
            Intent::Feedback => "feedback",
            Intent::Request => "request",
            Intent::Greeting => "greeting",
            Intent::General => "general",
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::General
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Intent::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or(UnknownLabel(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Low
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Urgency::High),
            "medium" => Ok(Urgency::Medium),
            "low" => Ok(Urgency::Low),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Returned when a string is not one of the known labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(" Positive ".parse::<Sentiment>(), Ok(Sentiment::Positive));
        assert_eq!("REQUEST".parse::<Intent>(), Ok(Intent::Request));
        assert_eq!("high".parse::<Urgency>(), Ok(Urgency::High));
    }

    #[test]
    fn unknown_label_names_the_input() {
        let err = "ecstatic".parse::<Sentiment>().unwrap_err();
        assert_eq!(err, UnknownLabel("ecstatic".to_string()));
        assert_eq!(err.to_string(), "unknown label: ecstatic");
        let _: Box<dyn std::error::Error> = Box::new(err);
    }
}
