//! # User Settings

use crate::{
    constants::{DEFAULT_DRAFT_THRESHOLD, MAX_DRAFT_THRESHOLD, MIN_DRAFT_THRESHOLD},
    errors::IchidanError,
    row,
    types::{UpdateSettings, UserSettings},
};
use tracing::info;
use turso::Database;

/// Returns the user's settings, or the defaults if they never saved any.
pub async fn get_settings(db: &Database, user_id: &str) -> Result<UserSettings, IchidanError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            "SELECT hide_spoilers, draft_threshold, updated_at FROM user_settings WHERE user_id = ?",
            vec![row::text(user_id)],
        )
        .await?;

    match rows.next().await? {
        Some(r) => Ok(UserSettings {
            user_id: user_id.to_string(),
            hide_spoilers: row::get_bool(&r, 0)?,
            draft_threshold: r.get(1)?,
            updated_at: row::get_opt_timestamp(&r, 2)?,
        }),
        None => Ok(UserSettings {
            user_id: user_id.to_string(),
            hide_spoilers: false,
            draft_threshold: DEFAULT_DRAFT_THRESHOLD,
            updated_at: None,
        }),
    }
}

/// Merges `update` into the stored settings and saves them.
pub async fn update_settings(
    db: &Database,
    user_id: &str,
    update: UpdateSettings,
) -> Result<UserSettings, IchidanError> {
    if let Some(threshold) = update.draft_threshold {
        if !(MIN_DRAFT_THRESHOLD..=MAX_DRAFT_THRESHOLD).contains(&threshold) {
            return Err(IchidanError::validation(format!(
                "draft_threshold must be between {MIN_DRAFT_THRESHOLD} and {MAX_DRAFT_THRESHOLD}."
            )));
        }
    }

    let current = get_settings(db, user_id).await?;
    let hide_spoilers = update.hide_spoilers.unwrap_or(current.hide_spoilers);
    let draft_threshold = update.draft_threshold.unwrap_or(current.draft_threshold);

    let conn = db.connect()?;
    conn.execute(
        "INSERT INTO user_settings (user_id, hide_spoilers, draft_threshold, updated_at)
         VALUES (?, ?, ?, CURRENT_TIMESTAMP)
         ON CONFLICT(user_id) DO UPDATE SET
            hide_spoilers = excluded.hide_spoilers,
            draft_threshold = excluded.draft_threshold,
            updated_at = CURRENT_TIMESTAMP",
        vec![
            row::text(user_id),
            row::boolean(hide_spoilers),
            row::integer(draft_threshold),
        ],
    )
    .await?;
    info!(user_id = %user_id, hide_spoilers, draft_threshold, "Saved user settings");

    get_settings(db, user_id).await
}
