use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Finger expected to press a key on a QWERTY board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Finger {
    LeftPinky,
    LeftRing,
    LeftMiddle,
    LeftIndex,
    RightIndex,
    RightMiddle,
    RightRing,
    RightPinky,
    Thumb,
    Unknown,
}

impl Finger {
    pub const ALL: [Finger; 10] = [
        Finger::LeftPinky,
        Finger::LeftRing,
        Finger::LeftMiddle,
        Finger::LeftIndex,
        Finger::RightIndex,
        Finger::RightMiddle,
        Finger::RightRing,
        Finger::RightPinky,
        Finger::Thumb,
        Finger::Unknown,
    ];

    /// Inverse of the kebab-case `Display` form used in storage.
    pub fn from_slug(slug: &str) -> Finger {
        Finger::ALL
            .into_iter()
            .find(|f| f.to_string() == slug)
            .unwrap_or(Finger::Unknown)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Finger::LeftPinky => "Left Pinky",
            Finger::LeftRing => "Left Ring",
            Finger::LeftMiddle => "Left Middle",
            Finger::LeftIndex => "Left Index",
            Finger::RightIndex => "Right Index",
            Finger::RightMiddle => "Right Middle",
            Finger::RightRing => "Right Ring",
            Finger::RightPinky => "Right Pinky",
            Finger::Thumb => "Thumbs",
            Finger::Unknown => "unknown",
        }
    }
}

/// Static QWERTY key to finger table. Letters are matched case-insensitively.
pub fn finger_for_key(key: char) -> Finger {
    match key.to_ascii_lowercase() {
        '`' | '1' | 'q' | 'a' | 'z' => Finger::LeftPinky,
        '2' | 'w' | 's' | 'x' => Finger::LeftRing,
        '3' | 'e' | 'd' | 'c' => Finger::LeftMiddle,
        '4' | '5' | 'r' | 't' | 'f' | 'g' | 'v' | 'b' => Finger::LeftIndex,
        '6' | '7' | 'y' | 'u' | 'h' | 'j' | 'n' | 'm' => Finger::RightIndex,
        '8' | 'i' | 'k' | ',' => Finger::RightMiddle,
        '9' | 'o' | 'l' | '.' => Finger::RightRing,
        '0' | '-' | '=' | 'p' | '[' | ']' | ';' | '\'' | '/' => Finger::RightPinky,
        ' ' => Finger::Thumb,
        _ => Finger::Unknown,
    }
}

/// One typed character with its timing; lives for a single test and is persisted as a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeEvent {
    pub key: char,
    pub timestamp: DateTime<Local>,
    pub is_correct: bool,
    /// time since the previous keystroke, zero for the first one
    pub delay_ms: u64,
    pub finger: Finger,
}

impl KeystrokeEvent {
    pub fn new(key: char, timestamp: DateTime<Local>, is_correct: bool, delay_ms: u64) -> Self {
        Self {
            key,
            timestamp,
            is_correct,
            delay_ms,
            finger: finger_for_key(key),
        }
    }
}
