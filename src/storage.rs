use crate::error::Result;
use crate::keystroke::{Finger, KeystrokeEvent};
use crate::result::{TestMode, TestResult};
use chrono::{DateTime, Local, TimeZone};
use rusqlite::{params, types::Type, Connection, Row};
use std::path::Path;

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        username   TEXT    NOT NULL UNIQUE COLLATE NOCASE,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sessions (
        token            TEXT    PRIMARY KEY,
        user_id          INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at       INTEGER NOT NULL,
        expires_at       INTEGER NOT NULL,
        last_activity_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS typing_tests (
        id                 INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id            INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        test_mode          TEXT    NOT NULL,
        duration           INTEGER NOT NULL,
        text_length        INTEGER NOT NULL,
        wpm                INTEGER NOT NULL,
        accuracy           INTEGER NOT NULL,
        adjusted_wpm       INTEGER NOT NULL,
        errors             INTEGER NOT NULL,
        characters_typed   INTEGER NOT NULL,
        characters_correct INTEGER NOT NULL,
        disqualified       BOOLEAN NOT NULL,
        text               TEXT    NOT NULL,
        completed_at       INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_typing_tests_mode_completed
        ON typing_tests(test_mode, completed_at);
    CREATE INDEX IF NOT EXISTS idx_typing_tests_user_completed
        ON typing_tests(user_id, completed_at);

    CREATE TABLE IF NOT EXISTS keystrokes (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        test_id    INTEGER NOT NULL REFERENCES typing_tests(id) ON DELETE CASCADE,
        key        TEXT    NOT NULL,
        timestamp  INTEGER NOT NULL,
        is_correct BOOLEAN NOT NULL,
        delay_ms   INTEGER NOT NULL,
        finger     TEXT    NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_keystrokes_user_test ON keystrokes(user_id, test_id);
"#;

/// Row order for [`ResultFilter`] queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Selection over stored tests. Every `None` field means "no restriction".
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    pub mode: Option<TestMode>,
    pub since: Option<DateTime<Local>>,
    pub user_id: Option<i64>,
    pub limit: Option<usize>,
    pub skip: usize,
    pub order: ResultOrder,
}

/// A persisted test together with the user who produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub user_id: i64,
    pub username: String,
    pub result: TestResult,
}

/// Append-only store of finished tests and their keystrokes.
pub trait ResultStore {
    fn append_result(&self, user_id: i64, result: &TestResult) -> Result<i64>;

    /// Store a finished test and its keystrokes together; neither is kept if either fails.
    fn append_result_with_keystrokes(
        &mut self,
        user_id: i64,
        result: &TestResult,
        events: &[KeystrokeEvent],
    ) -> Result<i64>;

    /// Tests matching `filter`. Tests of users that no longer exist are skipped.
    fn query_results(&self, filter: &ResultFilter) -> Result<Vec<StoredResult>>;

    /// Completion times of every test by `user_id`, newest first.
    fn completion_times(&self, user_id: i64) -> Result<Vec<DateTime<Local>>>;

    /// Stored keystrokes of a user, optionally restricted to one test and to keys typed
    /// at or after `since`.
    fn keystrokes(
        &self,
        user_id: i64,
        test_id: Option<i64>,
        since: Option<DateTime<Local>>,
    ) -> Result<Vec<KeystrokeEvent>>;
}

/// SQLite-backed store holding tests, keystrokes, users and sessions.
#[derive(Debug)]
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::debug!("opening store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }
}

pub(crate) fn to_millis(ts: DateTime<Local>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Local>> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

fn stored_result_from_row(row: &Row) -> rusqlite::Result<StoredResult> {
    let mode_str: String = row.get(3)?;
    let mode = TestMode::parse(&mode_str)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(3, "test_mode".to_string(), Type::Text))?;

    let result = TestResult {
        id: Some(row.get(0)?),
        timestamp: from_millis(14, row.get(14)?)?,
        mode,
        duration_seconds: row.get::<_, i64>(4)? as u32,
        text_length: row.get::<_, i64>(5)? as usize,
        wpm: row.get::<_, i64>(6)? as u32,
        accuracy: row.get::<_, i64>(7)? as u32,
        adjusted_wpm: row.get::<_, i64>(8)? as u32,
        errors: row.get::<_, i64>(9)? as usize,
        characters_typed: row.get::<_, i64>(10)? as usize,
        characters_correct: row.get::<_, i64>(11)? as usize,
        disqualified: row.get(12)?,
        text: row.get(13)?,
    };

    Ok(StoredResult {
        user_id: row.get(1)?,
        username: row.get(2)?,
        result,
    })
}

fn insert_result(conn: &Connection, user_id: i64, result: &TestResult) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO typing_tests
        (user_id, test_mode, duration, text_length, wpm, accuracy, adjusted_wpm, errors,
         characters_typed, characters_correct, disqualified, text, completed_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            user_id,
            result.mode.as_str(),
            result.duration_seconds as i64,
            result.text_length as i64,
            result.wpm as i64,
            result.accuracy as i64,
            result.adjusted_wpm as i64,
            result.errors as i64,
            result.characters_typed as i64,
            result.characters_correct as i64,
            result.disqualified,
            result.text,
            to_millis(result.timestamp),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_keystrokes(
    conn: &Connection,
    user_id: i64,
    test_id: i64,
    events: &[KeystrokeEvent],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO keystrokes
        (user_id, test_id, key, timestamp, is_correct, delay_ms, finger)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )?;
    for ev in events {
        stmt.execute(params![
            user_id,
            test_id,
            ev.key.to_string(),
            to_millis(ev.timestamp),
            ev.is_correct,
            ev.delay_ms as i64,
            ev.finger.to_string(),
        ])?;
    }
    Ok(())
}

impl ResultStore for Store {
    fn append_result(&self, user_id: i64, result: &TestResult) -> Result<i64> {
        let id = insert_result(&self.conn, user_id, result)?;
        log::info!("saved test {id} for user {user_id}");
        Ok(id)
    }

    fn append_result_with_keystrokes(
        &mut self,
        user_id: i64,
        result: &TestResult,
        events: &[KeystrokeEvent],
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let id = insert_result(&tx, user_id, result)?;
        insert_keystrokes(&tx, user_id, id, events)?;
        tx.commit()?;
        log::info!(
            "saved test {id} with {} keystrokes for user {user_id}",
            events.len()
        );
        Ok(id)
    }

    fn query_results(&self, filter: &ResultFilter) -> Result<Vec<StoredResult>> {
        let direction = match filter.order {
            ResultOrder::OldestFirst => "ASC",
            ResultOrder::NewestFirst => "DESC",
        };
        let sql = format!(
            r#"
            SELECT t.id, t.user_id, u.username, t.test_mode, t.duration, t.text_length, t.wpm,
                   t.accuracy, t.adjusted_wpm, t.errors, t.characters_typed,
                   t.characters_correct, t.disqualified, t.text, t.completed_at
            FROM typing_tests t
            JOIN users u ON u.id = t.user_id
            WHERE (?1 IS NULL OR t.test_mode = ?1)
              AND (?2 IS NULL OR t.completed_at >= ?2)
              AND (?3 IS NULL OR t.user_id = ?3)
            ORDER BY t.completed_at {direction}, t.id {direction}
            LIMIT ?4 OFFSET ?5
            "#
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                filter.mode.map(|m| m.as_str()),
                filter.since.map(to_millis),
                filter.user_id,
                filter.limit.map_or(-1, |l| l as i64),
                filter.skip as i64,
            ],
            stored_result_from_row,
        )?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn completion_times(&self, user_id: i64) -> Result<Vec<DateTime<Local>>> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_at FROM typing_tests WHERE user_id = ?1 ORDER BY completed_at DESC",
        )?;
        let rows = stmt.query_map([user_id], |row| from_millis(0, row.get(0)?))?;

        let mut times = Vec::new();
        for t in rows {
            times.push(t?);
        }
        Ok(times)
    }

    fn keystrokes(
        &self,
        user_id: i64,
        test_id: Option<i64>,
        since: Option<DateTime<Local>>,
    ) -> Result<Vec<KeystrokeEvent>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT key, timestamp, is_correct, delay_ms, finger
            FROM keystrokes
            WHERE user_id = ?1
              AND (?2 IS NULL OR test_id = ?2)
              AND (?3 IS NULL OR timestamp >= ?3)
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![user_id, test_id, since.map(to_millis)], |row| {
            let finger: String = row.get(4)?;
            Ok(KeystrokeEvent {
                key: row.get::<_, String>(0)?.chars().next().unwrap_or('\0'),
                timestamp: from_millis(1, row.get(1)?)?,
                is_correct: row.get(2)?,
                delay_ms: row.get::<_, i64>(3)?.max(0) as u64,
                finger: Finger::from_slug(&finger),
            })
        })?;

        let mut events = Vec::new();
        for ev in rows {
            events.push(ev?);
        }
        Ok(events)
    }
}
