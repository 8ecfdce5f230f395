use crate::error::{Result, TyperankError};
use crate::keystroke::KeystrokeEvent;
use crate::result::{ResultDraft, TestMode, TestResult};
use chrono::{DateTime, Duration, Local};

/// Keystrokes closer together than this are treated as scripted input.
pub const FAST_KEY_THRESHOLD_MS: i64 = 30;

/// Snapshot of the running test, derived entirely from the typed input and the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStats {
    pub wpm: u32,
    pub accuracy: u32,
    /// trailing run of correctly typed characters
    pub streak: usize,
    pub errors: usize,
    pub time_elapsed_secs: f64,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
            streak: 0,
            errors: 0,
            time_elapsed_secs: 0.0,
        }
    }
}

/// Recompute live statistics from scratch.
///
/// Characters are compared position by position; anything typed past the end of `target`
/// counts as an error. WPM uses the five-characters-per-word convention on correct
/// characters only.
pub fn compute_stats(
    input: &str,
    target: &str,
    start: DateTime<Local>,
    end_or_now: DateTime<Local>,
) -> LiveStats {
    let typed = input.chars().count();
    let correct = count_correct(input, target);
    let errors = typed - correct;

    let accuracy = if typed > 0 {
        ((correct as f64 / typed as f64) * 100.0).round() as u32
    } else {
        100
    }
    .min(100);

    let elapsed_secs = (end_or_now - start).num_milliseconds().max(0) as f64 / 1000.0;
    let wpm = if elapsed_secs > 0.0 {
        ((correct as f64 / 5.0) / (elapsed_secs / 60.0)).round().max(0.0) as u32
    } else {
        0
    };

    LiveStats {
        wpm,
        accuracy,
        streak: trailing_streak(input, target),
        errors,
        time_elapsed_secs: elapsed_secs,
    }
}

fn count_correct(input: &str, target: &str) -> usize {
    input
        .chars()
        .zip(target.chars())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

fn trailing_streak(input: &str, target: &str) -> usize {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = input.chars().collect();
    typed
        .iter()
        .enumerate()
        .rev()
        .take_while(|(idx, c)| target.get(*idx) == Some(*c))
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Typing,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AntiCheatFlags {
    pub fast_keys: bool,
}

impl AntiCheatFlags {
    pub fn any(&self) -> bool {
        self.fast_keys
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub mode: TestMode,
    /// only consulted in [`TestMode::Time`]
    pub duration_secs: u32,
}

/// What a keystroke or tick did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Stayed,
    Started,
    Completed(TestResult),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EndReason {
    TextFinished,
    TimeUp,
}

/// Typing session state machine: `Idle -> Typing -> Completed`, back to `Idle` on reset.
#[derive(Debug, Clone)]
pub struct Scorer {
    target: String,
    target_len: usize,
    config: SessionConfig,
    phase: Phase,
    input: String,
    started_at: Option<DateTime<Local>>,
    ended_at: Option<DateTime<Local>>,
    last_key_at: Option<DateTime<Local>>,
    flags: AntiCheatFlags,
    keystrokes: Vec<KeystrokeEvent>,
    stats: LiveStats,
    result: Option<TestResult>,
}

impl Scorer {
    pub fn new(target: String, config: SessionConfig) -> Self {
        debug_assert!(!target.is_empty(), "scorer needs a target text");
        Self {
            target_len: target.chars().count(),
            target,
            config,
            phase: Phase::Idle,
            input: String::new(),
            started_at: None,
            ended_at: None,
            last_key_at: None,
            flags: AntiCheatFlags::default(),
            keystrokes: Vec::new(),
            stats: LiveStats::default(),
            result: None,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> LiveStats {
        self.stats
    }

    pub fn flags(&self) -> AntiCheatFlags {
        self.flags
    }

    pub fn is_disqualified(&self) -> bool {
        self.flags.any()
    }

    pub fn keystrokes(&self) -> &[KeystrokeEvent] {
        &self.keystrokes
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Local>> {
        self.ended_at
    }

    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Character expected at `idx`, if the target is that long.
    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.target.chars().nth(idx)
    }

    /// Seconds left in a timed test; `None` for word and quote tests.
    pub fn seconds_remaining(&self, now: DateTime<Local>) -> Option<f64> {
        if self.config.mode != TestMode::Time {
            return None;
        }
        let elapsed = match self.started_at {
            Some(start) => {
                let end = self.ended_at.unwrap_or(now);
                (end - start).num_milliseconds().max(0) as f64 / 1000.0
            }
            None => 0.0,
        };
        Some((self.config.duration_secs as f64 - elapsed).max(0.0))
    }

    /// Feed the full input typed so far.
    ///
    /// Input longer than the target is rejected with [`TyperankError::InvalidInput`] and
    /// leaves the session untouched. Keystrokes after completion are ignored.
    pub fn on_keystroke(&mut self, input_so_far: &str, now: DateTime<Local>) -> Result<Transition> {
        if self.phase == Phase::Completed {
            return Ok(Transition::Stayed);
        }
        // a key landing after the deadline ends the test on what was typed in time
        if self.phase == Phase::Typing && self.time_is_up(now) {
            return Ok(Transition::Completed(self.complete(now, EndReason::TimeUp)));
        }

        let typed = input_so_far.chars().count();
        if typed > self.target_len {
            return Err(TyperankError::InvalidInput {
                typed,
                target: self.target_len,
            });
        }

        let delay_ms = match self.last_key_at {
            Some(last) => {
                let gap = (now - last).num_milliseconds();
                if gap < FAST_KEY_THRESHOLD_MS {
                    if !self.flags.fast_keys {
                        log::warn!("keystroke {gap}ms after the previous one, session disqualified");
                    }
                    self.flags.fast_keys = true;
                }
                gap.max(0) as u64
            }
            None => 0,
        };
        self.last_key_at = Some(now);

        let mut transition = Transition::Stayed;
        if self.phase == Phase::Idle && typed > 0 {
            self.phase = Phase::Typing;
            self.started_at = Some(now);
            transition = Transition::Started;
            log::debug!("test started ({} mode)", self.config.mode);
        }

        if typed > self.input.chars().count() {
            if let (Some(key), Some(expected)) =
                (input_so_far.chars().last(), self.expected_char(typed - 1))
            {
                self.keystrokes
                    .push(KeystrokeEvent::new(key, now, key == expected, delay_ms));
            }
        }

        self.input = input_so_far.to_string();

        if let Some(start) = self.started_at {
            self.stats = compute_stats(&self.input, &self.target, start, now);
        }

        if self.phase == Phase::Typing && typed == self.target_len {
            return Ok(Transition::Completed(self.complete(now, EndReason::TextFinished)));
        }

        Ok(transition)
    }

    /// Append one character to the current input.
    pub fn type_char(&mut self, c: char, now: DateTime<Local>) -> Result<Transition> {
        let mut next = self.input.clone();
        next.push(c);
        self.on_keystroke(&next, now)
    }

    /// Remove the last typed character, if any.
    pub fn backspace(&mut self, now: DateTime<Local>) -> Result<Transition> {
        if self.input.is_empty() {
            return Ok(Transition::Stayed);
        }
        let mut next = self.input.clone();
        next.pop();
        self.on_keystroke(&next, now)
    }

    /// Periodic refresh while typing; also ends timed tests whose clock ran out.
    pub fn on_tick(&mut self, now: DateTime<Local>) -> Transition {
        if self.phase != Phase::Typing {
            return Transition::Stayed;
        }
        if self.time_is_up(now) {
            return Transition::Completed(self.complete(now, EndReason::TimeUp));
        }
        if let Some(start) = self.started_at {
            self.stats = compute_stats(&self.input, &self.target, start, now);
        }
        Transition::Stayed
    }

    /// Back to `Idle` with a fresh target; every flag and timer is cleared.
    pub fn reset(&mut self, target: String) {
        *self = Scorer::new(target, self.config);
    }

    /// Back to `Idle` keeping the same target text.
    pub fn restart(&mut self) {
        let target = std::mem::take(&mut self.target);
        self.reset(target);
    }

    fn time_is_up(&self, now: DateTime<Local>) -> bool {
        match (self.config.mode, self.started_at) {
            (TestMode::Time, Some(start)) => {
                (now - start).num_milliseconds() >= self.config.duration_secs as i64 * 1000
            }
            _ => false,
        }
    }

    fn complete(&mut self, now: DateTime<Local>, reason: EndReason) -> TestResult {
        let start = self.started_at.unwrap_or(now);
        let end = match reason {
            // ticks may overshoot the deadline; score against the deadline itself
            EndReason::TimeUp => now.min(start + Duration::seconds(self.config.duration_secs as i64)),
            EndReason::TextFinished => now,
        };
        self.ended_at = Some(end);
        self.stats = compute_stats(&self.input, &self.target, start, end);

        let duration_seconds = match reason {
            EndReason::TimeUp => self.config.duration_secs,
            EndReason::TextFinished => self.stats.time_elapsed_secs.round() as u32,
        };
        let characters_typed = self.input.chars().count();

        let result = TestResult::from_draft(ResultDraft {
            timestamp: end,
            mode: self.config.mode,
            duration_seconds,
            wpm: self.stats.wpm,
            accuracy: self.stats.accuracy,
            characters_typed,
            characters_correct: characters_typed - self.stats.errors,
            disqualified: self.flags.any(),
            text: self.target.clone(),
        });

        log::info!(
            "test completed: {} wpm, {}% acc, {} errors{}",
            result.wpm,
            result.accuracy,
            result.errors,
            if result.disqualified { " (disqualified)" } else { "" }
        );

        self.phase = Phase::Completed;
        self.result = Some(result.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn at(base: DateTime<Local>, ms: i64) -> DateTime<Local> {
        base + Duration::milliseconds(ms)
    }

    fn words_config() -> SessionConfig {
        SessionConfig {
            mode: TestMode::Words,
            duration_secs: 60,
        }
    }

    fn time_config(secs: u32) -> SessionConfig {
        SessionConfig {
            mode: TestMode::Time,
            duration_secs: secs,
        }
    }

    #[test]
    fn test_stats_partial_match_scenario() {
        let t0 = Local::now();
        let stats = compute_stats("cac", "cat", t0, at(t0, 6000));

        assert_eq!(stats.errors, 1);
        assert_eq!(stats.accuracy, 67);
        assert_eq!(stats.wpm, 4);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.time_elapsed_secs, 6.0);
    }

    #[test]
    fn test_stats_empty_input() {
        let t0 = Local::now();
        let stats = compute_stats("", "cat", t0, at(t0, 1000));

        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn test_stats_zero_elapsed_gives_zero_wpm() {
        let t0 = Local::now();
        let stats = compute_stats("ca", "cat", t0, t0);
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_stats_clock_going_backwards_is_not_negative() {
        let t0 = Local::now();
        let stats = compute_stats("ca", "cat", t0, at(t0, -500));
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.time_elapsed_secs, 0.0);
    }

    #[test]
    fn test_streak_counts_trailing_correct_run() {
        let t0 = Local::now();
        assert_eq!(compute_stats("hxllo", "hello", t0, t0).streak, 3);
        assert_eq!(compute_stats("hellx", "hello", t0, t0).streak, 0);
        assert_eq!(compute_stats("hello", "hello", t0, t0).streak, 5);
    }

    #[test]
    fn test_input_past_target_counts_as_errors() {
        let t0 = Local::now();
        let stats = compute_stats("cats", "cat", t0, at(t0, 1000));
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.accuracy, 75);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn test_stats_bounds_hold_for_every_prefix() {
        let target = "the quick brown fox jumps over the lazy dog";
        let garbled = "thx quack briwn fix jumps ovrr the lazy dgo";
        let t0 = Local::now();

        for end in 0..=target.len() {
            for input in [&target[..end], &garbled[..end]] {
                let stats = compute_stats(input, target, t0, at(t0, 250 * end as i64));
                assert!(stats.accuracy <= 100);
                assert!(stats.streak <= input.chars().count());
                assert_eq!(stats.errors, input.len() - count_correct(input, target));
            }
        }
    }

    #[test]
    fn test_stats_are_idempotent() {
        let t0 = Local::now();
        let now = at(t0, 4321);
        assert_eq!(
            compute_stats("the qu1ck", "the quick brown", t0, now),
            compute_stats("the qu1ck", "the quick brown", t0, now)
        );
    }

    #[test]
    fn test_new_scorer_is_idle() {
        let scorer = Scorer::new("hello".to_string(), words_config());

        assert_eq!(scorer.phase(), Phase::Idle);
        assert!(!scorer.has_started());
        assert!(!scorer.has_finished());
        assert_eq!(scorer.stats(), LiveStats::default());
        assert!(scorer.keystrokes().is_empty());
    }

    #[test]
    fn test_first_keystroke_starts_timer() {
        let mut scorer = Scorer::new("hello".to_string(), words_config());
        let t0 = Local::now();

        let transition = scorer.on_keystroke("h", t0).unwrap();

        assert_eq!(transition, Transition::Started);
        assert_eq!(scorer.phase(), Phase::Typing);
        assert_eq!(scorer.started_at(), Some(t0));
    }

    #[test]
    fn test_empty_input_does_not_start() {
        let mut scorer = Scorer::new("hello".to_string(), words_config());
        let transition = scorer.on_keystroke("", Local::now()).unwrap();

        assert_eq!(transition, Transition::Stayed);
        assert_eq!(scorer.phase(), Phase::Idle);
    }

    #[test]
    fn test_overflowing_input_is_rejected_without_side_effects() {
        let mut scorer = Scorer::new("hi".to_string(), words_config());
        let t0 = Local::now();
        scorer.on_keystroke("h", t0).unwrap();

        let err = scorer.on_keystroke("hey", at(t0, 200));

        assert_matches!(
            err,
            Err(TyperankError::InvalidInput {
                typed: 3,
                target: 2
            })
        );
        assert_eq!(scorer.input(), "h");
        assert_eq!(scorer.keystrokes().len(), 1);
        assert_eq!(scorer.phase(), Phase::Typing);
    }

    #[test]
    fn test_keystrokes_record_correctness_finger_and_delay() {
        let mut scorer = Scorer::new("ab".to_string(), words_config());
        let t0 = Local::now();

        scorer.type_char('a', t0).unwrap();
        scorer.type_char('x', at(t0, 150)).unwrap();

        let events = scorer.keystrokes();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_correct);
        assert_eq!(events[0].delay_ms, 0);
        assert_eq!(events[0].finger, crate::keystroke::Finger::LeftPinky);
        assert!(!events[1].is_correct);
        assert_eq!(events[1].delay_ms, 150);
        assert_eq!(events[1].finger, crate::keystroke::Finger::LeftRing);
    }

    #[test]
    fn test_fast_keys_disqualify_but_scoring_continues() {
        let mut scorer = Scorer::new("hello".to_string(), words_config());
        let t0 = Local::now();

        scorer.type_char('h', t0).unwrap();
        scorer.type_char('e', at(t0, 10)).unwrap();

        assert!(scorer.flags().fast_keys);
        assert!(scorer.is_disqualified());

        scorer.type_char('l', at(t0, 500)).unwrap();
        scorer.type_char('l', at(t0, 1000)).unwrap();
        let transition = scorer.type_char('o', at(t0, 1500)).unwrap();

        assert!(scorer.is_disqualified(), "flag must stay set");
        let result = assert_matches!(transition, Transition::Completed(r) => r);
        assert!(result.disqualified);
        assert_eq!(result.accuracy, 100);
        assert_eq!(result.wpm, 40); // 1 word in 1.5s
    }

    #[test]
    fn test_keystrokes_at_threshold_are_allowed() {
        let mut scorer = Scorer::new("hello".to_string(), words_config());
        let t0 = Local::now();

        scorer.type_char('h', t0).unwrap();
        scorer.type_char('e', at(t0, FAST_KEY_THRESHOLD_MS)).unwrap();

        assert!(!scorer.is_disqualified());
    }

    #[test]
    fn test_completion_by_text_length() {
        let mut scorer = Scorer::new("cat".to_string(), words_config());
        let t0 = Local::now();

        scorer.type_char('c', t0).unwrap();
        scorer.type_char('a', at(t0, 3000)).unwrap();
        let transition = scorer.type_char('c', at(t0, 6000)).unwrap();

        let result = assert_matches!(transition, Transition::Completed(r) => r);
        assert_eq!(result.wpm, 4);
        assert_eq!(result.accuracy, 67);
        assert_eq!(result.errors, 1);
        assert_eq!(result.adjusted_wpm, 3);
        assert_eq!(result.duration_seconds, 6);
        assert_eq!(result.text_length, 3);
        assert_eq!(result.mode, TestMode::Words);
        assert!(!result.disqualified);

        assert_eq!(scorer.phase(), Phase::Completed);
        assert_eq!(scorer.ended_at(), Some(at(t0, 6000)));
        assert_eq!(scorer.result(), Some(&result));
    }

    #[test]
    fn test_completed_session_ignores_input_and_ticks() {
        let mut scorer = Scorer::new("a".to_string(), words_config());
        let t0 = Local::now();
        scorer.type_char('a', t0).unwrap();
        let frozen = scorer.stats();

        assert_eq!(scorer.on_keystroke("", at(t0, 500)).unwrap(), Transition::Stayed);
        assert_eq!(scorer.on_tick(at(t0, 60_000)), Transition::Stayed);
        assert_eq!(scorer.stats(), frozen);
        assert_eq!(scorer.input(), "a");
    }

    #[test]
    fn test_tick_refreshes_stats() {
        let mut scorer = Scorer::new("hello world".to_string(), words_config());
        let t0 = Local::now();
        scorer.on_keystroke("hello", t0).unwrap();

        scorer.on_tick(at(t0, 6000));

        assert_eq!(scorer.stats().wpm, 10);
        assert_eq!(scorer.stats().time_elapsed_secs, 6.0);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut scorer = Scorer::new("hello".to_string(), time_config(1));
        assert_eq!(scorer.on_tick(Local::now()), Transition::Stayed);
        assert_eq!(scorer.phase(), Phase::Idle);
    }

    #[test]
    fn test_time_mode_completes_on_tick_with_configured_duration() {
        let mut scorer = Scorer::new("hello world".to_string(), time_config(15));
        let t0 = Local::now();
        scorer.on_keystroke("hello", t0).unwrap();

        assert_eq!(scorer.on_tick(at(t0, 14_900)), Transition::Stayed);
        let transition = scorer.on_tick(at(t0, 15_050));

        let result = assert_matches!(transition, Transition::Completed(r) => r);
        assert_eq!(result.duration_seconds, 15);
        assert_eq!(result.wpm, 4); // 1 word in the 15s window
        assert_eq!(scorer.ended_at(), Some(at(t0, 15_000)));
        assert_eq!(scorer.seconds_remaining(at(t0, 20_000)), Some(0.0));
    }

    #[test]
    fn test_time_mode_late_keystroke_is_not_scored() {
        let mut scorer = Scorer::new("hello world".to_string(), time_config(1));
        let t0 = Local::now();
        scorer.type_char('h', t0).unwrap();

        let transition = scorer.type_char('e', at(t0, 1200)).unwrap();

        let result = assert_matches!(transition, Transition::Completed(r) => r);
        assert_eq!(scorer.input(), "h");
        assert_eq!(scorer.keystrokes().len(), 1);
        assert_eq!(result.characters_typed, 1);
        assert_eq!(scorer.ended_at(), Some(at(t0, 1000)));
    }

    #[test]
    fn test_time_mode_tick_and_late_key_score_the_same() {
        let t0 = Local::now();
        let mut ticked = Scorer::new("hello world".to_string(), time_config(1));
        let mut keyed = ticked.clone();
        ticked.type_char('h', t0).unwrap();
        keyed.type_char('h', t0).unwrap();

        let by_tick = assert_matches!(ticked.on_tick(at(t0, 1000)), Transition::Completed(r) => r);
        let by_key = assert_matches!(
            keyed.type_char('e', at(t0, 1200)).unwrap(),
            Transition::Completed(r) => r
        );

        assert_eq!(by_tick.wpm, 12);
        assert_eq!(by_key, by_tick);
        assert_eq!(keyed.ended_at(), ticked.ended_at());
    }

    #[test]
    fn test_time_mode_key_just_before_deadline_counts() {
        let mut scorer = Scorer::new("hello world".to_string(), time_config(1));
        let t0 = Local::now();
        scorer.type_char('h', t0).unwrap();

        assert_eq!(scorer.type_char('e', at(t0, 999)).unwrap(), Transition::Stayed);
        assert_eq!(scorer.input(), "he");
    }

    #[test]
    fn test_seconds_remaining() {
        let scorer = Scorer::new("hello".to_string(), words_config());
        assert_eq!(scorer.seconds_remaining(Local::now()), None);

        let mut timed = Scorer::new("hello".to_string(), time_config(30));
        let t0 = Local::now();
        assert_eq!(timed.seconds_remaining(t0), Some(30.0));
        timed.type_char('h', t0).unwrap();
        assert_eq!(timed.seconds_remaining(at(t0, 2500)), Some(27.5));
    }

    #[test]
    fn test_backspace_shrinks_input_without_recording_keystroke() {
        let mut scorer = Scorer::new("hello".to_string(), words_config());
        let t0 = Local::now();
        scorer.type_char('h', t0).unwrap();
        scorer.type_char('x', at(t0, 100)).unwrap();

        scorer.backspace(at(t0, 200)).unwrap();

        assert_eq!(scorer.input(), "h");
        assert_eq!(scorer.keystrokes().len(), 2);
        assert_eq!(scorer.stats().errors, 0);
        assert_eq!(scorer.stats().streak, 1);
    }

    #[test]
    fn test_backspace_on_empty_input() {
        let mut scorer = Scorer::new("hello".to_string(), words_config());
        assert_eq!(scorer.backspace(Local::now()).unwrap(), Transition::Stayed);
        assert_eq!(scorer.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut scorer = Scorer::new("ab".to_string(), words_config());
        let t0 = Local::now();
        scorer.type_char('a', t0).unwrap();
        scorer.type_char('b', at(t0, 5)).unwrap();
        assert!(scorer.has_finished());
        assert!(scorer.is_disqualified());

        scorer.reset("fresh text".to_string());

        assert_eq!(scorer.phase(), Phase::Idle);
        assert_eq!(scorer.target(), "fresh text");
        assert_eq!(scorer.input(), "");
        assert!(!scorer.is_disqualified());
        assert!(scorer.keystrokes().is_empty());
        assert!(scorer.result().is_none());
        assert!(scorer.started_at().is_none());
        assert_eq!(scorer.stats(), LiveStats::default());
    }

    #[test]
    fn test_restart_keeps_target() {
        let mut scorer = Scorer::new("same".to_string(), words_config());
        scorer.type_char('s', Local::now()).unwrap();

        scorer.restart();

        assert_eq!(scorer.target(), "same");
        assert_eq!(scorer.phase(), Phase::Idle);
    }

    #[test]
    fn test_multibyte_target() {
        let mut scorer = Scorer::new("café".to_string(), words_config());
        let t0 = Local::now();

        let transition = scorer.on_keystroke("café", t0).unwrap();

        // single keystroke both starts and finishes the test
        let result = assert_matches!(transition, Transition::Completed(r) => r);
        assert_eq!(result.accuracy, 100);
        assert_eq!(result.text_length, 4);
        assert_eq!(scorer.keystrokes()[0].key, 'é');
    }
}
