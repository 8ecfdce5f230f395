use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of test being run; decides how the target text is built and when the test ends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TestMode {
    /// ends after a fixed number of seconds
    Time,
    /// ends once a fixed number of random words is typed
    Words,
    /// ends once a quote is typed
    Quote,
}

impl TestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestMode::Time => "time",
            TestMode::Words => "words",
            TestMode::Quote => "quote",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "time" => Some(TestMode::Time),
            "words" => Some(TestMode::Words),
            "quote" => Some(TestMode::Quote),
            _ => None,
        }
    }
}

/// A finished test. Built once when the scorer completes and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// storage row id, `None` until persisted
    pub id: Option<i64>,
    pub timestamp: DateTime<Local>,
    pub mode: TestMode,
    pub duration_seconds: u32,
    pub text_length: usize,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    pub adjusted_wpm: u32,
    pub characters_typed: usize,
    pub characters_correct: usize,
    /// set by the anti-cheat timing check; advisory only
    pub disqualified: bool,
    pub text: String,
}

/// Inputs needed to build a [`TestResult`]; `adjusted_wpm` and `errors` are derived.
#[derive(Debug, Clone)]
pub struct ResultDraft {
    pub timestamp: DateTime<Local>,
    pub mode: TestMode,
    pub duration_seconds: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub characters_typed: usize,
    pub characters_correct: usize,
    pub disqualified: bool,
    pub text: String,
}

impl TestResult {
    pub fn from_draft(draft: ResultDraft) -> Self {
        let accuracy = draft.accuracy.min(100);
        Self {
            id: None,
            timestamp: draft.timestamp,
            mode: draft.mode,
            duration_seconds: draft.duration_seconds,
            text_length: draft.text.chars().count(),
            wpm: draft.wpm,
            accuracy,
            errors: draft.characters_typed.saturating_sub(draft.characters_correct),
            adjusted_wpm: adjusted_wpm(draft.wpm, accuracy),
            characters_typed: draft.characters_typed,
            characters_correct: draft.characters_correct,
            disqualified: draft.disqualified,
            text: draft.text,
        }
    }
}

/// WPM scaled by the accuracy fraction, rounded half up.
pub fn adjusted_wpm(wpm: u32, accuracy: u32) -> u32 {
    (wpm as f64 * accuracy.min(100) as f64 / 100.0).round() as u32
}
