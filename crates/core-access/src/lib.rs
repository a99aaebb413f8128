//! # Core Access Crate
//!
//! The identity layer of Ichidan-Dokusho: users created from a verified
//! Google sign-in, their roles, and anonymous browser sessions that let
//! signed-out visitors like records.
//!
//! User ids are deterministic (UUIDv5 of `google:<sub>`), so signing in twice
//! with the same Google account always maps to the same row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use turso::{Database, Error as TursoError, Row, Value, params};
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

const USER_COLUMNS: &str = "id, email, display_name, avatar_url, role, created_at";

#[derive(Error, Debug)]
pub enum CoreAccessError {
    #[error("Database error: {0}")]
    Database(#[from] TursoError),
    #[error("Failed to create or find user for subject: {0}")]
    UserPersistenceFailed(String),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

/// The profile asserted by the identity provider at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    /// The provider's stable subject (`sub`) claim.
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Represents a user in the system.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    /// The unique, deterministic ID of the user (UUIDv5 from the Google subject).
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Either `user` or `admin`.
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// An anonymous browser session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreAccessError> {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
        .map_err(|e| CoreAccessError::DataIntegrity(format!("Failed to parse date '{raw}': {e}")))
}

fn opt_text(row: &Row, idx: usize) -> Result<Option<String>, CoreAccessError> {
    match row.get_value(idx)? {
        Value::Text(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => Err(CoreAccessError::DataIntegrity(format!(
            "Expected TEXT or NULL in column {idx}, got {other:?}"
        ))),
    }
}

fn opt_value(value: Option<&str>) -> Value {
    match value {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

impl TryFrom<&Row> for User {
    type Error = CoreAccessError;

    fn try_from(row: &Row) -> std::result::Result<Self, Self::Error> {
        let created_at_str: String = row.get(5)?;
        Ok(User {
            id: row.get(0)?,
            email: opt_text(row, 1)?,
            display_name: opt_text(row, 2)?,
            avatar_url: opt_text(row, 3)?,
            role: row.get(4)?,
            created_at: parse_timestamp(&created_at_str)?,
        })
    }
}

/// The deterministic user id for a Google subject.
pub fn user_id_for_subject(subject: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("google:{subject}").as_bytes()).to_string()
}

/// Finds the user for `profile.subject`, creating them if they don't exist.
///
/// Profile fields and `role` are refreshed on every call, so a changed Google
/// avatar or a newly configured admin e-mail takes effect at the next sign-in.
pub async fn get_or_create_user(
    db: &Database,
    profile: &UserProfile,
    role: &str,
) -> Result<User, CoreAccessError> {
    let conn = db.connect()?;
    let user_id = user_id_for_subject(&profile.subject);

    // SELECT first, then INSERT or UPDATE.
    let exists = conn
        .query("SELECT 1 FROM users WHERE id = ?", params![user_id.clone()])
        .await?
        .next()
        .await?
        .is_some();

    let fields = vec![
        opt_value(profile.email.as_deref()),
        opt_value(profile.display_name.as_deref()),
        opt_value(profile.avatar_url.as_deref()),
        Value::Text(role.to_string()),
    ];

    if exists {
        let mut params = fields;
        params.push(Value::Text(user_id.clone()));
        conn.execute(
            "UPDATE users SET email = ?, display_name = ?, avatar_url = ?, role = ? WHERE id = ?",
            params,
        )
        .await?;
    } else {
        let mut params = vec![
            Value::Text(user_id.clone()),
            Value::Text(profile.subject.clone()),
        ];
        params.extend(fields);
        conn.execute(
            "INSERT INTO users (id, google_sub, email, display_name, avatar_url, role)
             VALUES (?, ?, ?, ?, ?, ?)",
            params,
        )
        .await?;
        info!(user_id = %user_id, role, "Created user");
    }

    get_user_by_id(db, &user_id)
        .await?
        .ok_or_else(|| CoreAccessError::UserPersistenceFailed(profile.subject.clone()))
}

pub async fn get_user_by_id(db: &Database, id: &str) -> Result<Option<User>, CoreAccessError> {
    let conn = db.connect()?;
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let mut rows = conn.query(&sql, params![id.to_string()]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(User::try_from(&row)?)),
        None => Ok(None),
    }
}

/// Lists all users, newest first.
pub async fn list_users(db: &Database) -> Result<Vec<User>, CoreAccessError> {
    let conn = db.connect()?;
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id ASC");
    let mut rows = conn.query(&sql, ()).await?;
    let mut users = Vec::new();
    while let Some(row) = rows.next().await? {
        users.push(User::try_from(&row)?);
    }
    Ok(users)
}

/// Starts a new anonymous session with a random id.
pub async fn create_session(db: &Database) -> Result<Session, CoreAccessError> {
    let conn = db.connect()?;
    let id = Uuid::new_v4().to_string();
    conn.execute("INSERT INTO sessions (id) VALUES (?)", params![id.clone()])
        .await?;

    let mut rows = conn
        .query(
            "SELECT id, created_at FROM sessions WHERE id = ?",
            params![id.clone()],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| CoreAccessError::UserPersistenceFailed(format!("session {id}")))?;
    let created_at_str: String = row.get(1)?;
    Ok(Session {
        id: row.get(0)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

pub async fn session_exists(db: &Database, id: &str) -> Result<bool, CoreAccessError> {
    let conn = db.connect()?;
    let found = conn
        .query("SELECT 1 FROM sessions WHERE id = ?", params![id.to_string()])
        .await?
        .next()
        .await?
        .is_some();
    Ok(found)
}
