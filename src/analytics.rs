//! Per-key, per-finger and over-time breakdowns of a batch of keystrokes.

use crate::error::Result;
use crate::keystroke::{Finger, KeystrokeEvent};
use crate::storage::ResultStore;
use crate::util::{percent, round_to};
use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

/// Keystrokes before the current one included in the rolling pattern window.
const PATTERN_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyAnalytics {
    pub key: char,
    pub count: usize,
    /// whole percent
    pub accuracy: u32,
    pub avg_delay_ms: u64,
    pub finger: Finger,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FingerAnalytics {
    pub finger: Finger,
    /// share of all keystrokes, one decimal
    pub usage: f64,
    /// one decimal
    pub accuracy: f64,
    pub avg_delay_ms: u64,
}

/// Rolling speed/accuracy at one keystroke, used for the results chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternPoint {
    /// whole seconds since the test started
    pub time: u64,
    pub wpm: u32,
    pub accuracy: u32,
    pub key: char,
    pub delay_ms: u64,
}

#[derive(Default)]
struct Tally {
    count: usize,
    correct: usize,
    total_delay: u64,
}

impl Tally {
    fn add(&mut self, ev: &KeystrokeEvent) {
        self.count += 1;
        if ev.is_correct {
            self.correct += 1;
        }
        self.total_delay += ev.delay_ms;
    }

    fn avg_delay(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            (self.total_delay as f64 / self.count as f64).round() as u64
        }
    }
}

/// Group keystrokes by typed key, most used first.
pub fn key_analytics(events: &[KeystrokeEvent]) -> Vec<KeyAnalytics> {
    let mut tallies: HashMap<char, (Tally, Finger)> = HashMap::new();
    for ev in events {
        tallies
            .entry(ev.key)
            .or_insert_with(|| (Tally::default(), ev.finger))
            .0
            .add(ev);
    }

    tallies
        .into_iter()
        .map(|(key, (t, finger))| KeyAnalytics {
            key,
            count: t.count,
            accuracy: percent(t.correct, t.count),
            avg_delay_ms: t.avg_delay(),
            finger,
            errors: t.count - t.correct,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then(a.key.cmp(&b.key)))
        .collect()
}

/// Window used for stored finger usage when the caller does not pick one.
pub const DEFAULT_FINGER_WINDOW_DAYS: i64 = 7;

/// Per-key breakdown of everything a user typed, or of a single stored test.
pub fn stored_key_analytics<S: ResultStore + ?Sized>(
    store: &S,
    user_id: i64,
    test_id: Option<i64>,
) -> Result<Vec<KeyAnalytics>> {
    Ok(key_analytics(&store.keystrokes(user_id, test_id, None)?))
}

/// Per-finger breakdown of a user's stored keystrokes typed at or after `since`,
/// optionally restricted to one test.
pub fn stored_finger_analytics<S: ResultStore + ?Sized>(
    store: &S,
    user_id: i64,
    test_id: Option<i64>,
    since: Option<DateTime<Local>>,
) -> Result<Vec<FingerAnalytics>> {
    Ok(finger_analytics(&store.keystrokes(user_id, test_id, since)?))
}

/// Group keystrokes by finger in the fixed left-to-right finger order.
pub fn finger_analytics(events: &[KeystrokeEvent]) -> Vec<FingerAnalytics> {
    let total = events.len();
    let mut tallies: HashMap<Finger, Tally> = HashMap::new();
    for ev in events {
        tallies.entry(ev.finger).or_default().add(ev);
    }

    tallies
        .into_iter()
        .sorted_by_key(|(finger, _)| *finger)
        .map(|(finger, t)| FingerAnalytics {
            finger,
            usage: round_to(t.count as f64 / total as f64 * 100.0, 1),
            accuracy: round_to(t.correct as f64 / t.count as f64 * 100.0, 1),
            avg_delay_ms: t.avg_delay(),
        })
        .collect()
}

/// Rolling WPM and accuracy at every keystroke over a short trailing window.
pub fn typing_patterns(events: &[KeystrokeEvent], started_at: DateTime<Local>) -> Vec<PatternPoint> {
    events
        .iter()
        .enumerate()
        .map(|(idx, ev)| {
            let since_start_ms = (ev.timestamp - started_at).num_milliseconds().max(0);
            let window = &events[idx.saturating_sub(PATTERN_WINDOW)..=idx];
            let correct = window.iter().filter(|e| e.is_correct).count();

            let wpm = if since_start_ms > 0 {
                ((correct as f64 / 5.0) / (since_start_ms as f64 / 60_000.0)).round() as u32
            } else {
                0
            };

            PatternPoint {
                time: (since_start_ms as f64 / 1000.0).round() as u64,
                wpm,
                accuracy: percent(correct, window.len()),
                key: ev.key,
                delay_ms: ev.delay_ms,
            }
        })
        .collect()
}
