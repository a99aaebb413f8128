//! # Writing Themes
//!
//! User-scoped labels that bucket records for draft generation. Theme names
//! are unique per user.

use crate::{
    constants::{MAX_THEME_DESCRIPTION_CHARS, MAX_THEME_NAME_CHARS},
    errors::IchidanError,
    row,
    types::{NewTheme, Theme, ThemeSummary, UpdateTheme},
    validate,
};
use tracing::info;
use turso::{Connection, Database, Row};

const THEME_COLUMNS: &str = "id, owner_id, name, description, created_at";

fn theme_from_row(r: &Row) -> Result<Theme, IchidanError> {
    Ok(Theme {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        name: r.get(2)?,
        description: row::get_opt_text(r, 3)?,
        created_at: row::get_timestamp(r, 4)?,
    })
}

async fn fetch_owned(conn: &Connection, owner_id: &str, id: i64) -> Result<Theme, IchidanError> {
    let sql = format!("SELECT {THEME_COLUMNS} FROM themes WHERE id = ? AND owner_id = ?");
    let mut rows = conn
        .query(&sql, vec![row::integer(id), row::text(owner_id)])
        .await?;
    match rows.next().await? {
        Some(r) => theme_from_row(&r),
        None => Err(IchidanError::not_found(format!("Theme {id}"))),
    }
}

/// Rejects theme ids that do not belong to `owner_id`.
///
/// Records may only be filed under the owner's own themes, so a foreign or
/// missing theme id is a validation error rather than a 404 for the record.
pub(crate) async fn ensure_owned(
    conn: &Connection,
    owner_id: &str,
    theme_id: i64,
) -> Result<(), IchidanError> {
    match fetch_owned(conn, owner_id, theme_id).await {
        Ok(_) => Ok(()),
        Err(IchidanError::NotFound(_)) => Err(IchidanError::validation(format!(
            "theme_id {theme_id} does not refer to one of your themes."
        ))),
        Err(e) => Err(e),
    }
}

async fn ensure_unique_name(
    conn: &Connection,
    owner_id: &str,
    name: &str,
    except_id: Option<i64>,
) -> Result<(), IchidanError> {
    let count = row::scalar_i64(
        conn,
        "SELECT COUNT(*) FROM themes WHERE owner_id = ? AND name = ? AND id != ?",
        vec![
            row::text(owner_id),
            row::text(name),
            row::integer(except_id.unwrap_or(-1)),
        ],
    )
    .await?;
    if count > 0 {
        return Err(IchidanError::validation(format!(
            "You already have a theme named '{name}'."
        )));
    }
    Ok(())
}

async fn record_count(conn: &Connection, theme_id: i64) -> Result<i64, IchidanError> {
    row::scalar_i64(
        conn,
        "SELECT COUNT(*) FROM reading_records WHERE theme_id = ?",
        vec![row::integer(theme_id)],
    )
    .await
}

pub async fn create_theme(
    db: &Database,
    owner_id: &str,
    input: NewTheme,
) -> Result<Theme, IchidanError> {
    let name = validate::required("name", &input.name, MAX_THEME_NAME_CHARS)?;
    let description =
        validate::optional("description", input.description, MAX_THEME_DESCRIPTION_CHARS)?;
    let conn = db.connect()?;
    ensure_unique_name(&conn, owner_id, &name, None).await?;

    let mut rows = conn
        .query(
            "INSERT INTO themes (owner_id, name, description) VALUES (?, ?, ?) RETURNING id",
            vec![row::text(owner_id), row::text(name), row::opt_text(description)],
        )
        .await?;
    let mut new_id = None;
    while let Some(r) = rows.next().await? {
        new_id = Some(r.get::<i64>(0)?);
    }
    let id = new_id.ok_or_else(|| {
        IchidanError::StorageOperationFailed("INSERT did not return an id".to_string())
    })?;
    info!(theme_id = id, owner_id = %owner_id, "Created theme");

    fetch_owned(&conn, owner_id, id).await
}

/// Fetches one of the owner's themes.
pub async fn get_theme(db: &Database, owner_id: &str, id: i64) -> Result<Theme, IchidanError> {
    let conn = db.connect()?;
    fetch_owned(&conn, owner_id, id).await
}

/// Lists the owner's themes by name, each with the number of records filed under it.
pub async fn list_themes(
    db: &Database,
    owner_id: &str,
) -> Result<Vec<ThemeSummary>, IchidanError> {
    let conn = db.connect()?;
    let sql = format!("SELECT {THEME_COLUMNS} FROM themes WHERE owner_id = ? ORDER BY name ASC");
    let mut rows = conn.query(&sql, vec![row::text(owner_id)]).await?;
    let mut themes = Vec::new();
    while let Some(r) = rows.next().await? {
        themes.push(theme_from_row(&r)?);
    }

    let mut summaries = Vec::with_capacity(themes.len());
    for theme in themes {
        let record_count = record_count(&conn, theme.id).await?;
        summaries.push(ThemeSummary {
            theme,
            record_count,
        });
    }
    Ok(summaries)
}

pub async fn update_theme(
    db: &Database,
    owner_id: &str,
    id: i64,
    update: UpdateTheme,
) -> Result<Theme, IchidanError> {
    let conn = db.connect()?;
    let current = fetch_owned(&conn, owner_id, id).await?;

    let name = match update.name {
        Some(n) => {
            let n = validate::required("name", &n, MAX_THEME_NAME_CHARS)?;
            ensure_unique_name(&conn, owner_id, &n, Some(id)).await?;
            n
        }
        None => current.name,
    };
    let description = match update.description {
        Some(d) => validate::optional("description", d, MAX_THEME_DESCRIPTION_CHARS)?,
        None => current.description,
    };

    conn.execute(
        "UPDATE themes SET name = ?, description = ? WHERE id = ? AND owner_id = ?",
        vec![
            row::text(name),
            row::opt_text(description),
            row::integer(id),
            row::text(owner_id),
        ],
    )
    .await?;

    fetch_owned(&conn, owner_id, id).await
}

/// Deletes a theme. Its records stay but are no longer filed under a theme.
pub async fn delete_theme(db: &Database, owner_id: &str, id: i64) -> Result<(), IchidanError> {
    let conn = db.connect()?;
    fetch_owned(&conn, owner_id, id).await?;

    conn.execute(
        "UPDATE reading_records SET theme_id = NULL WHERE theme_id = ? AND owner_id = ?",
        vec![row::integer(id), row::text(owner_id)],
    )
    .await?;
    conn.execute(
        "DELETE FROM themes WHERE id = ? AND owner_id = ?",
        vec![row::integer(id), row::text(owner_id)],
    )
    .await?;
    info!(theme_id = id, owner_id = %owner_id, "Deleted theme");
    Ok(())
}
