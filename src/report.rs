//! Plain-text and CSV renderings for the non-interactive subcommands.

use std::io::Write;

use crate::analytics::{FingerAnalytics, KeyAnalytics};
use crate::error::Result;
use crate::leaderboard::{DailyStats, HistoryMetrics, LeaderboardEntry, Streak, UserStats};
use crate::storage::StoredResult;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn write_leaderboard<W: Write>(out: &mut W, title: &str, entries: &[LeaderboardEntry]) -> Result<()> {
    writeln!(out, "{title}")?;
    if entries.is_empty() {
        writeln!(out, "no results yet")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:>4}  {:<20} {:>5} {:>5}  {:<6} {:>6}  {}",
        "rank", "user", "wpm", "acc", "mode", "secs", "last test"
    )?;
    for e in entries {
        writeln!(
            out,
            "{:>4}  {:<20} {:>5} {:>4}%  {:<6} {:>6}  {}",
            e.rank,
            e.username,
            e.wpm,
            e.accuracy,
            e.test_mode,
            e.duration,
            e.created_at.format(DATE_FORMAT)
        )?;
    }
    Ok(())
}

pub fn write_streak<W: Write>(out: &mut W, streak: &Streak) -> Result<()> {
    let days = |n: u32| if n == 1 { "day" } else { "days" };
    writeln!(out, "current streak: {} {}", streak.current, days(streak.current))?;
    writeln!(out, "longest streak: {} {}", streak.longest, days(streak.longest))?;
    Ok(())
}

pub fn write_user_stats<W: Write>(out: &mut W, username: &str, stats: &UserStats) -> Result<()> {
    writeln!(out, "stats for {username}")?;
    writeln!(out, "  tests            {}", stats.total_tests)?;
    writeln!(out, "  time practised   {}", format_duration(stats.total_time_spent))?;
    writeln!(out, "  average wpm      {:.1}", stats.average_wpm)?;
    writeln!(out, "  best wpm         {}", stats.best_wpm)?;
    writeln!(out, "  average accuracy {:.1}%", stats.average_accuracy)?;
    writeln!(out, "  best accuracy    {}%", stats.best_accuracy)?;
    writeln!(out, "  characters typed {}", stats.total_characters_typed)?;
    writeln!(out, "  words typed      {}", stats.total_words_typed)?;
    writeln!(
        out,
        "  streak           {} (longest {})",
        stats.current_streak, stats.longest_streak
    )?;
    Ok(())
}

/// Active days of the window only; quiet days are summarised in the heading.
pub fn write_daily_stats<W: Write>(out: &mut W, days: u32, daily: &[DailyStats]) -> Result<()> {
    let active: Vec<&DailyStats> = daily.iter().filter(|d| d.tests > 0).collect();
    writeln!(out, "last {days} days: practised on {} of them", active.len())?;
    for d in active {
        writeln!(
            out,
            "  {}  {:>3} tests {:>6.1} wpm (best {:>3}) {:>5.1}% acc {:>6} words  {}",
            d.date.format("%Y-%m-%d"),
            d.tests,
            d.average_wpm,
            d.best_wpm,
            d.average_accuracy,
            d.total_words_typed,
            format_duration(d.total_time_spent)
        )?;
    }
    Ok(())
}

pub fn write_history<W: Write>(out: &mut W, rows: &[StoredResult], metrics: &HistoryMetrics) -> Result<()> {
    writeln!(
        out,
        "{} tests  avg {} wpm  best {} wpm  avg {:.1}% acc",
        metrics.tests, metrics.avg_wpm, metrics.best_wpm, metrics.avg_accuracy
    )?;
    for row in rows {
        let r = &row.result;
        writeln!(
            out,
            "{:>6}  {}  {:<6} {:>4}s {:>4} wpm {:>4}% acc {:>4} adj{}",
            r.id.unwrap_or_default(),
            r.timestamp.format(DATE_FORMAT),
            r.mode,
            r.duration_seconds,
            r.wpm,
            r.accuracy,
            r.adjusted_wpm,
            if r.disqualified { "  disqualified" } else { "" }
        )?;
    }
    Ok(())
}

/// One CSV record per test, with a header row.
pub fn write_history_csv<W: Write>(out: W, rows: &[StoredResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "id",
        "completed_at",
        "mode",
        "duration",
        "wpm",
        "accuracy",
        "adjusted_wpm",
        "errors",
        "characters_typed",
        "characters_correct",
        "disqualified",
    ])?;
    for row in rows {
        let r = &row.result;
        wtr.write_record([
            r.id.map(|id| id.to_string()).unwrap_or_default(),
            r.timestamp.to_rfc3339(),
            r.mode.to_string(),
            r.duration_seconds.to_string(),
            r.wpm.to_string(),
            r.accuracy.to_string(),
            r.adjusted_wpm.to_string(),
            r.errors.to_string(),
            r.characters_typed.to_string(),
            r.characters_correct.to_string(),
            r.disqualified.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_key_analytics<W: Write>(out: &mut W, keys: &[KeyAnalytics]) -> Result<()> {
    if keys.is_empty() {
        writeln!(out, "no keystrokes recorded")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<6} {:>6} {:>5} {:>9} {:>6}  {}",
        "key", "count", "acc", "avg ms", "errors", "finger"
    )?;
    for k in keys {
        writeln!(
            out,
            "{:<6} {:>6} {:>4}% {:>9} {:>6}  {}",
            key_label(k.key),
            k.count,
            k.accuracy,
            k.avg_delay_ms,
            k.errors,
            k.finger.display_name()
        )?;
    }
    Ok(())
}

pub fn write_finger_analytics<W: Write>(out: &mut W, fingers: &[FingerAnalytics]) -> Result<()> {
    if fingers.is_empty() {
        writeln!(out, "no keystrokes recorded")?;
        return Ok(());
    }
    writeln!(out, "{:<13} {:>6} {:>6} {:>9}", "finger", "usage", "acc", "avg ms")?;
    for f in fingers {
        writeln!(
            out,
            "{:<13} {:>5.1}% {:>5.1}% {:>9}",
            f.finger.display_name(),
            f.usage,
            f.accuracy,
            f.avg_delay_ms
        )?;
    }
    Ok(())
}

pub fn key_label(key: char) -> String {
    match key {
        ' ' => "space".to_string(),
        c => c.to_string(),
    }
}

/// `3725` -> `1h 2m 5s`
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m {s}s"),
    }
}
