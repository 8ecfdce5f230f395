use crate::error::{Result, TyperankError};
use crate::storage::{from_millis, to_millis, Store};
use chrono::{DateTime, Duration, Local};
use rand::Rng;
use rusqlite::{params, OptionalExtension};

/// Lifetime of a session token.
pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Local>,
}

/// Resolves an opaque session credential to the user it belongs to.
pub trait Authenticator {
    fn resolve(&self, token: Option<&str>, now: DateTime<Local>) -> Result<User>;
}

/// 32 random bytes, hex encoded.
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    (0..32).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

impl Store {
    pub fn create_user(&self, username: &str, now: DateTime<Local>) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(TyperankError::InvalidUsername(username.to_string()));
        }
        if self.user_by_name(username)?.is_some() {
            return Err(TyperankError::UsernameTaken(username.to_string()));
        }
        self.conn.execute(
            "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
            params![username, to_millis(now)],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("created user {username} ({id})");
        Ok(User {
            id,
            username: username.to_string(),
            created_at: now,
        })
    }

    /// Case-insensitive lookup.
    pub fn user_by_name(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE username = ?1",
                [username.trim()],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at: from_millis(2, row.get(2)?)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?1",
                [id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at: from_millis(2, row.get(2)?)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Issue a new session for an existing user.
    pub fn login(&self, username: &str, now: DateTime<Local>) -> Result<String> {
        let user = self
            .user_by_name(username)?
            .ok_or_else(|| TyperankError::UnknownUser(username.to_string()))?;

        let token = generate_session_token();
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);
        self.conn.execute(
            r#"
            INSERT INTO sessions (token, user_id, created_at, expires_at, last_activity_at)
            VALUES (?1, ?2, ?3, ?4, ?3)
            "#,
            params![token, user.id, to_millis(now), to_millis(expires_at)],
        )?;
        log::info!("session opened for {}", user.username);
        Ok(token)
    }

    pub fn logout(&self, token: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1", [token])?;
        log::debug!("logout removed {deleted} session(s)");
        Ok(())
    }

    /// Drop every session that expired before `now`; returns how many went away.
    pub fn purge_expired_sessions(&self, now: DateTime<Local>) -> Result<usize> {
        let purged = self
            .conn
            .execute("DELETE FROM sessions WHERE expires_at < ?1", [to_millis(now)])?;
        if purged > 0 {
            log::info!("purged {purged} expired session(s)");
        }
        Ok(purged)
    }
}

impl Authenticator for Store {
    fn resolve(&self, token: Option<&str>, now: DateTime<Local>) -> Result<User> {
        let token = token.ok_or_else(|| TyperankError::Unauthenticated("no session".into()))?;

        let user_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > ?2",
                params![token, to_millis(now)],
                |row| row.get(0),
            )
            .optional()?;
        let user_id =
            user_id.ok_or_else(|| TyperankError::Unauthenticated("invalid session".into()))?;

        self.conn.execute(
            "UPDATE sessions SET last_activity_at = ?1 WHERE token = ?2",
            params![to_millis(now), token],
        )?;

        self.user_by_id(user_id)?
            .ok_or_else(|| TyperankError::Unauthenticated("invalid session".into()))
    }
}
