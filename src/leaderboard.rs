//! Rankings, streaks and per-user summaries, recomputed from the store on every call.

use crate::error::Result;
use crate::result::TestMode;
use crate::storage::{ResultFilter, ResultOrder, ResultStore, StoredResult};
use crate::util::{mean, round_to};
use chrono::{DateTime, Duration, Local, NaiveDate};
use clap::ValueEnum;
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortBy {
    #[default]
    Wpm,
    Accuracy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Timeframe {
    #[default]
    All,
    Week,
    Month,
}

impl Timeframe {
    /// Earliest completion time included, `None` when unbounded.
    pub fn since(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        match self {
            Timeframe::All => None,
            Timeframe::Week => Some(now - Duration::hours(7 * 24)),
            Timeframe::Month => Some(now - Duration::hours(30 * 24)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: i64,
    pub username: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub test_mode: TestMode,
    /// seconds
    pub duration: u32,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy)]
enum DurationPolicy {
    /// duration of the user's earliest matching test
    First,
    /// rounded mean over the user's matching tests
    Average,
}

/// Best scores per user for one test mode.
pub fn get_leaderboard<S: ResultStore + ?Sized>(
    store: &S,
    mode: TestMode,
    limit: usize,
    sort_by: SortBy,
    timeframe: Timeframe,
    now: DateTime<Local>,
) -> Result<Vec<LeaderboardEntry>> {
    let rows = store.query_results(&ResultFilter {
        mode: Some(mode),
        since: timeframe.since(now),
        ..Default::default()
    })?;
    Ok(rank_users(rows, limit, sort_by, DurationPolicy::First))
}

/// Best scores per user across every test mode.
pub fn get_global_leaderboard<S: ResultStore + ?Sized>(
    store: &S,
    limit: usize,
    sort_by: SortBy,
    timeframe: Timeframe,
    now: DateTime<Local>,
) -> Result<Vec<LeaderboardEntry>> {
    let rows = store.query_results(&ResultFilter {
        since: timeframe.since(now),
        ..Default::default()
    })?;
    Ok(rank_users(rows, limit, sort_by, DurationPolicy::Average))
}

/// Group rows (oldest first) by user, keep the per-field maximum of wpm and accuracy,
/// then sort and number them.
fn rank_users(
    rows: Vec<StoredResult>,
    limit: usize,
    sort_by: SortBy,
    duration: DurationPolicy,
) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .into_group_map_by(|r| r.user_id)
        .into_iter()
        .filter_map(|(user_id, tests)| {
            let first = tests.first()?;
            let duration = match duration {
                DurationPolicy::First => first.result.duration_seconds,
                DurationPolicy::Average => {
                    let total: u64 = tests.iter().map(|t| t.result.duration_seconds as u64).sum();
                    (total as f64 / tests.len() as f64).round() as u32
                }
            };
            Some(LeaderboardEntry {
                rank: 0,
                user_id,
                username: first.username.clone(),
                wpm: tests.iter().map(|t| t.result.wpm).max()?,
                accuracy: tests.iter().map(|t| t.result.accuracy).max()?,
                test_mode: first.result.mode,
                duration,
                created_at: tests.iter().map(|t| t.result.timestamp).max()?,
            })
        })
        .sorted_by(|a, b| compare_entries(a, b, sort_by))
        .take(limit)
        .enumerate()
        .map(|(idx, entry)| LeaderboardEntry {
            rank: idx + 1,
            ..entry
        })
        .collect()
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry, sort_by: SortBy) -> Ordering {
    let primary = match sort_by {
        SortBy::Wpm => b.wpm.cmp(&a.wpm).then(b.accuracy.cmp(&a.accuracy)),
        SortBy::Accuracy => b.accuracy.cmp(&a.accuracy).then(b.wpm.cmp(&a.wpm)),
    };
    primary
        .then_with(|| a.username.to_lowercase().cmp(&b.username.to_lowercase()))
        .then(a.user_id.cmp(&b.user_id))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
}

/// Day streak of `user_id` as seen on local day `today`.
pub fn compute_streak<S: ResultStore + ?Sized>(
    store: &S,
    user_id: i64,
    today: NaiveDate,
) -> Result<Streak> {
    let dates: Vec<NaiveDate> = store
        .completion_times(user_id)?
        .into_iter()
        .map(|t| t.date_naive())
        .collect();
    Ok(streak_from_dates(&dates, today))
}

/// Walk distinct practice days newest first. Runs of consecutive days extend the streak;
/// the current streak is the run holding the newest day, and only counts when that day is
/// today or yesterday.
pub fn streak_from_dates(dates: &[NaiveDate], today: NaiveDate) -> Streak {
    let days: Vec<NaiveDate> = dates
        .iter()
        .copied()
        .sorted_by(|a, b| b.cmp(a))
        .dedup()
        .collect();
    let Some(&newest) = days.first() else {
        return Streak::default();
    };

    let mut longest = 1;
    let mut run = 1;
    let mut newest_run = None;
    for pair in days.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            run += 1;
        } else {
            newest_run.get_or_insert(run);
            longest = longest.max(run);
            run = 1;
        }
    }
    longest = longest.max(run);
    let newest_run = newest_run.unwrap_or(run);

    let gap = (today - newest).num_days();
    let current = if gap == 0 || gap == 1 { newest_run } else { 0 };

    Streak { current, longest }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total_tests: usize,
    /// seconds
    pub total_time_spent: u64,
    pub average_wpm: f64,
    pub best_wpm: u32,
    pub average_accuracy: f64,
    pub best_accuracy: u32,
    pub total_characters_typed: usize,
    /// five characters per word
    pub total_words_typed: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Lifetime totals and bests of one user.
pub fn user_stats<S: ResultStore + ?Sized>(
    store: &S,
    user_id: i64,
    today: NaiveDate,
) -> Result<UserStats> {
    let rows = store.query_results(&ResultFilter {
        user_id: Some(user_id),
        ..Default::default()
    })?;
    let streak = compute_streak(store, user_id, today)?;

    if rows.is_empty() {
        return Ok(UserStats::default());
    }

    let n = rows.len() as f64;
    let total_characters_typed = rows.iter().map(|r| r.result.characters_typed).sum();
    Ok(UserStats {
        total_tests: rows.len(),
        total_time_spent: rows.iter().map(|r| r.result.duration_seconds as u64).sum(),
        average_wpm: rows.iter().map(|r| r.result.wpm as f64).sum::<f64>() / n,
        best_wpm: rows.iter().map(|r| r.result.wpm).max().unwrap_or(0),
        average_accuracy: rows.iter().map(|r| r.result.accuracy as f64).sum::<f64>() / n,
        best_accuracy: rows.iter().map(|r| r.result.accuracy).max().unwrap_or(0),
        total_characters_typed,
        total_words_typed: words_typed(total_characters_typed),
        current_streak: streak.current,
        longest_streak: streak.longest,
    })
}

const CHARS_PER_WORD: usize = 5;

fn words_typed(characters: usize) -> usize {
    characters / CHARS_PER_WORD
}

/// Days covered by `stats` when no window is given.
pub const DEFAULT_DAILY_WINDOW_DAYS: u32 = 30;

/// One local calendar day of practice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub tests: usize,
    /// seconds
    pub total_time_spent: u64,
    /// one decimal
    pub average_wpm: f64,
    pub best_wpm: u32,
    /// one decimal
    pub average_accuracy: f64,
    pub total_words_typed: usize,
    pub total_characters_typed: usize,
    pub errors: usize,
}

impl DailyStats {
    fn summarise(date: NaiveDate, tests: &[StoredResult]) -> Self {
        let wpm: Vec<f64> = tests.iter().map(|t| t.result.wpm as f64).collect();
        let acc: Vec<f64> = tests.iter().map(|t| t.result.accuracy as f64).collect();
        let characters = tests.iter().map(|t| t.result.characters_typed).sum();

        DailyStats {
            date,
            tests: tests.len(),
            total_time_spent: tests.iter().map(|t| t.result.duration_seconds as u64).sum(),
            average_wpm: round_to(mean(&wpm).unwrap_or(0.0), 1),
            best_wpm: tests.iter().map(|t| t.result.wpm).max().unwrap_or(0),
            average_accuracy: round_to(mean(&acc).unwrap_or(0.0), 1),
            total_words_typed: words_typed(characters),
            total_characters_typed: characters,
            errors: tests.iter().map(|t| t.result.errors).sum(),
        }
    }
}

/// Per-day summaries for the `days` local days ending on `today`, oldest first.
/// Days without tests are included with zero counts.
pub fn daily_stats<S: ResultStore + ?Sized>(
    store: &S,
    user_id: i64,
    days: u32,
    today: NaiveDate,
) -> Result<Vec<DailyStats>> {
    if days == 0 {
        return Ok(Vec::new());
    }
    let first = today - Duration::days(days as i64 - 1);
    let since = first
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest());

    let mut by_day = store
        .query_results(&ResultFilter {
            user_id: Some(user_id),
            since,
            ..Default::default()
        })?
        .into_iter()
        .into_group_map_by(|r| r.result.timestamp.date_naive());

    Ok(first
        .iter_days()
        .take(days as usize)
        .map(|date| DailyStats::summarise(date, &by_day.remove(&date).unwrap_or_default()))
        .collect())
}

/// A page of one user's tests, newest first.
pub fn history<S: ResultStore + ?Sized>(
    store: &S,
    user_id: i64,
    limit: usize,
    skip: usize,
) -> Result<Vec<StoredResult>> {
    store.query_results(&ResultFilter {
        user_id: Some(user_id),
        limit: Some(limit),
        skip,
        order: ResultOrder::NewestFirst,
        ..Default::default()
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryMetrics {
    pub avg_wpm: u32,
    pub best_wpm: u32,
    /// one decimal
    pub avg_accuracy: f64,
    pub tests: usize,
}

/// Headline numbers over a slice of tests.
pub fn history_metrics(rows: &[StoredResult]) -> HistoryMetrics {
    if rows.is_empty() {
        return HistoryMetrics::default();
    }
    let wpm: Vec<f64> = rows.iter().map(|r| r.result.wpm as f64).collect();
    let acc: Vec<f64> = rows.iter().map(|r| r.result.accuracy as f64).collect();

    HistoryMetrics {
        avg_wpm: mean(&wpm).unwrap_or(0.0).round() as u32,
        best_wpm: rows.iter().map(|r| r.result.wpm).max().unwrap_or(0),
        avg_accuracy: round_to(mean(&acc).unwrap_or(0.0), 1),
        tests: rows.len(),
    }
}
