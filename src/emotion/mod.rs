// src/emotion/mod.rs
//! Keyword heuristic for the user's emotional state.
//!
//! Deliberately simple: a case-insensitive substring scan over fixed keyword
//! sets, checked in priority order. The classifier never fails; anything
//! unrecognized is neutral.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Closed set of mood classifications tracked across a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Sad,
    Anxious,
    Happy,
    Lonely,
    #[serde(other)]
    Neutral,
}

impl EmotionLabel {
    /// Wire form used in API responses and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Anxious => "anxious",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Lonely => "lonely",
        }
    }

    /// Chinese description used when naming the emotion inside prompts.
    pub fn zh(&self) -> &'static str {
        match self {
            EmotionLabel::Neutral => "平静",
            EmotionLabel::Sad => "伤心",
            EmotionLabel::Anxious => "焦虑",
            EmotionLabel::Happy => "开心",
            EmotionLabel::Lonely => "孤独",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = Infallible;

    /// Parse a stored label. Unknown input maps to neutral rather than
    /// failing, so old or corrupted rows never poison a turn.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "sad" => EmotionLabel::Sad,
            "anxious" => EmotionLabel::Anxious,
            "happy" => EmotionLabel::Happy,
            "lonely" => EmotionLabel::Lonely,
            _ => EmotionLabel::Neutral,
        })
    }
}

/// Keyword sets per label, in priority order. First match wins, so a message
/// mixing categories is assigned the earliest-checked one.
const KEYWORD_SETS: &[(EmotionLabel, &[&str])] = &[
    (
        EmotionLabel::Sad,
        &[
            "难过", "伤心", "悲伤", "想哭", "委屈", "沮丧", "失落", "心碎",
            "sad", "unhappy", "depressed", "heartbroken", "miserable", "cry",
        ],
    ),
    (
        EmotionLabel::Anxious,
        &[
            "焦虑", "紧张", "担心", "害怕", "不安", "压力", "慌",
            "anxious", "nervous", "worried", "stressed", "afraid", "panic",
        ],
    ),
    (
        EmotionLabel::Happy,
        &[
            "开心", "高兴", "快乐", "兴奋", "太好了", "幸福",
            "happy", "glad", "excited", "wonderful", "joyful",
        ],
    ),
    (
        EmotionLabel::Lonely,
        &[
            "孤独", "寂寞", "没人理", "一个人待", "没有朋友",
            "lonely", "alone", "isolated", "no one",
        ],
    ),
];

/// Classify a message into an emotional-state label.
///
/// Pure and deterministic: lowercases the input once, then scans the keyword
/// sets in priority order (sad, anxious, happy, lonely).
pub fn classify(text: &str) -> EmotionLabel {
    let lowered = text.to_lowercase();
    for (label, keywords) in KEYWORD_SETS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return *label;
        }
    }
    EmotionLabel::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sad_keywords_win() {
        assert_eq!(classify("I am so sad today"), EmotionLabel::Sad);
        assert_eq!(classify("今天真的好难过"), EmotionLabel::Sad);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("I AM SO SAD"), EmotionLabel::Sad);
        assert_eq!(classify("Feeling LONELY tonight"), EmotionLabel::Lonely);
    }

    #[test]
    fn priority_order_breaks_ties() {
        // Contains both a sad and a lonely keyword; sad is checked first.
        assert_eq!(classify("I'm sad and lonely"), EmotionLabel::Sad);
        // Anxious beats happy.
        assert_eq!(classify("happy but so nervous"), EmotionLabel::Anxious);
    }

    #[test]
    fn unknown_text_is_neutral() {
        assert_eq!(classify("What's the weather like?"), EmotionLabel::Neutral);
        assert_eq!(classify(""), EmotionLabel::Neutral);
        assert_eq!(classify("今天吃什么好呢"), EmotionLabel::Neutral);
    }

    #[test]
    fn lonely_example_classifies_lonely() {
        assert_eq!(classify("I feel so lonely today"), EmotionLabel::Lonely);
    }

    #[test]
    fn from_str_defaults_to_neutral() {
        assert_eq!("sad".parse::<EmotionLabel>().unwrap(), EmotionLabel::Sad);
        assert_eq!("HAPPY".parse::<EmotionLabel>().unwrap(), EmotionLabel::Happy);
        assert_eq!("bogus".parse::<EmotionLabel>().unwrap(), EmotionLabel::Neutral);
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&EmotionLabel::Lonely).unwrap();
        assert_eq!(json, "\"lonely\"");
        let parsed: EmotionLabel = serde_json::from_str("\"unknown-label\"").unwrap();
        assert_eq!(parsed, EmotionLabel::Neutral);
    }
}
