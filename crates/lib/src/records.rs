//! # Reading Records
//!
//! CRUD for the user's reading log and the public timeline built from it.
//! Ownership is enforced in the `WHERE` clause: an update or delete that does
//! not match the owner behaves exactly like a missing record.

use crate::{
    constants::{MAX_ACTION_CHARS, MAX_LEARNING_CHARS, MAX_NOTES_CHARS, MAX_TITLE_CHARS},
    errors::IchidanError,
    likes, row,
    providers::db::sqlite::sql::RECORD_COLUMNS,
    settings, tags, themes,
    types::{
        Liker, NewReadingRecord, Pagination, ReadingAmount, ReadingRecord, TimelineEntry,
        TimelineQuery, UpdateReadingRecord,
    },
    validate,
};
use tracing::{debug, info};
use turso::{Connection, Database, Row, Value};

/// Maps a row selected with `RECORD_COLUMNS` to a `ReadingRecord`.
pub(crate) fn record_from_row(r: &Row) -> Result<ReadingRecord, IchidanError> {
    let amount_raw: String = r.get(4)?;
    let amount = ReadingAmount::try_from(amount_raw.as_str())
        .map_err(IchidanError::StorageOperationFailed)?;
    Ok(ReadingRecord {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        title: r.get(2)?,
        link: row::get_opt_text(r, 3)?,
        amount,
        learning: r.get(5)?,
        action: r.get(6)?,
        notes: row::get_opt_text(r, 7)?,
        is_spoiler: row::get_bool(r, 8)?,
        theme_id: row::get_opt_i64(r, 9)?,
        created_at: row::get_timestamp(r, 10)?,
        updated_at: row::get_timestamp(r, 11)?,
    })
}

async fn fetch_record(conn: &Connection, id: i64) -> Result<Option<ReadingRecord>, IchidanError> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM reading_records WHERE id = ?");
    let mut rows = conn.query(&sql, vec![row::integer(id)]).await?;
    match rows.next().await? {
        Some(r) => Ok(Some(record_from_row(&r)?)),
        None => Ok(None),
    }
}

/// Fetches a record only if it belongs to `owner_id`.
async fn fetch_owned_record(
    conn: &Connection,
    owner_id: &str,
    id: i64,
) -> Result<ReadingRecord, IchidanError> {
    let sql =
        format!("SELECT {RECORD_COLUMNS} FROM reading_records WHERE id = ? AND owner_id = ?");
    let mut rows = conn
        .query(&sql, vec![row::integer(id), row::text(owner_id)])
        .await?;
    match rows.next().await? {
        Some(r) => record_from_row(&r),
        None => Err(IchidanError::not_found(format!("Record {id}"))),
    }
}

/// Returns `Ok(())` if the record exists.
pub(crate) async fn ensure_exists(conn: &Connection, id: i64) -> Result<(), IchidanError> {
    let count = row::scalar_i64(
        conn,
        "SELECT COUNT(*) FROM reading_records WHERE id = ?",
        vec![row::integer(id)],
    )
    .await?;
    if count == 0 {
        return Err(IchidanError::not_found(format!("Record {id}")));
    }
    Ok(())
}

/// Logs a new reading record for `owner_id`.
pub async fn create_record(
    db: &Database,
    owner_id: &str,
    input: NewReadingRecord,
) -> Result<ReadingRecord, IchidanError> {
    let title = validate::required("title", &input.title, MAX_TITLE_CHARS)?;
    let learning = validate::required("learning", &input.learning, MAX_LEARNING_CHARS)?;
    let action = validate::required("action", &input.action, MAX_ACTION_CHARS)?;
    let notes = validate::optional("notes", input.notes, MAX_NOTES_CHARS)?;
    let link = validate::link(input.link)?;

    let conn = db.connect()?;
    if let Some(theme_id) = input.theme_id {
        themes::ensure_owned(&conn, owner_id, theme_id).await?;
    }

    let params: Vec<Value> = vec![
        row::text(owner_id),
        row::text(title),
        row::opt_text(link),
        row::text(input.amount.as_str()),
        row::text(learning),
        row::text(action),
        row::opt_text(notes),
        row::boolean(input.is_spoiler),
        row::opt_integer(input.theme_id),
    ];
    let mut rows = conn
        .query(
            "INSERT INTO reading_records (owner_id, title, link, amount, learning, action, notes, is_spoiler, theme_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
            params,
        )
        .await?;

    let mut new_id = None;
    while let Some(r) = rows.next().await? {
        new_id = Some(r.get::<i64>(0)?);
    }
    let id = new_id.ok_or_else(|| {
        IchidanError::StorageOperationFailed("INSERT did not return an id".to_string())
    })?;
    info!(record_id = id, owner_id = %owner_id, "Created reading record");

    fetch_record(&conn, id)
        .await?
        .ok_or_else(|| IchidanError::not_found(format!("Record {id}")))
}

/// Fetches a single record by id.
pub async fn get_record(db: &Database, id: i64) -> Result<ReadingRecord, IchidanError> {
    let conn = db.connect()?;
    fetch_record(&conn, id)
        .await?
        .ok_or_else(|| IchidanError::not_found(format!("Record {id}")))
}

/// Lists the owner's records, newest first.
pub async fn list_user_records(
    db: &Database,
    owner_id: &str,
    page: Pagination,
) -> Result<Vec<ReadingRecord>, IchidanError> {
    let conn = db.connect()?;
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM reading_records WHERE owner_id = ?
         ORDER BY created_at DESC, id DESC LIMIT {} OFFSET {}",
        page.limit(),
        page.offset()
    );
    let mut rows = conn.query(&sql, vec![row::text(owner_id)]).await?;
    let mut records = Vec::new();
    while let Some(r) = rows.next().await? {
        records.push(record_from_row(&r)?);
    }
    Ok(records)
}

/// Lists every record assigned to a theme, oldest first.
pub async fn list_theme_records(
    db: &Database,
    owner_id: &str,
    theme_id: i64,
) -> Result<Vec<ReadingRecord>, IchidanError> {
    let conn = db.connect()?;
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM reading_records WHERE owner_id = ? AND theme_id = ?
         ORDER BY created_at ASC, id ASC"
    );
    let mut rows = conn
        .query(&sql, vec![row::text(owner_id), row::integer(theme_id)])
        .await?;
    let mut records = Vec::new();
    while let Some(r) = rows.next().await? {
        records.push(record_from_row(&r)?);
    }
    Ok(records)
}

/// Applies a partial update to one of the owner's records.
pub async fn update_record(
    db: &Database,
    owner_id: &str,
    id: i64,
    update: UpdateReadingRecord,
) -> Result<ReadingRecord, IchidanError> {
    let conn = db.connect()?;
    let current = fetch_owned_record(&conn, owner_id, id).await?;

    let title = match update.title {
        Some(t) => validate::required("title", &t, MAX_TITLE_CHARS)?,
        None => current.title,
    };
    let learning = match update.learning {
        Some(l) => validate::required("learning", &l, MAX_LEARNING_CHARS)?,
        None => current.learning,
    };
    let action = match update.action {
        Some(a) => validate::required("action", &a, MAX_ACTION_CHARS)?,
        None => current.action,
    };
    let link = match update.link {
        Some(l) => validate::link(l)?,
        None => current.link,
    };
    let notes = match update.notes {
        Some(n) => validate::optional("notes", n, MAX_NOTES_CHARS)?,
        None => current.notes,
    };
    let theme_id = match update.theme_id {
        Some(Some(theme_id)) => {
            themes::ensure_owned(&conn, owner_id, theme_id).await?;
            Some(theme_id)
        }
        Some(None) => None,
        None => current.theme_id,
    };
    let amount = update.amount.unwrap_or(current.amount);
    let is_spoiler = update.is_spoiler.unwrap_or(current.is_spoiler);

    conn.execute(
        "UPDATE reading_records
         SET title = ?, link = ?, amount = ?, learning = ?, action = ?, notes = ?,
             is_spoiler = ?, theme_id = ?, updated_at = CURRENT_TIMESTAMP
         WHERE id = ? AND owner_id = ?",
        vec![
            row::text(title),
            row::opt_text(link),
            row::text(amount.as_str()),
            row::text(learning),
            row::text(action),
            row::opt_text(notes),
            row::boolean(is_spoiler),
            row::opt_integer(theme_id),
            row::integer(id),
            row::text(owner_id),
        ],
    )
    .await?;
    debug!(record_id = id, "Updated reading record");

    fetch_owned_record(&conn, owner_id, id).await
}

/// Deletes one of the owner's records together with its likes.
pub async fn delete_record(db: &Database, owner_id: &str, id: i64) -> Result<(), IchidanError> {
    let conn = db.connect()?;
    fetch_owned_record(&conn, owner_id, id).await?;

    conn.execute("DELETE FROM likes WHERE record_id = ?", vec![row::integer(id)])
        .await?;
    conn.execute(
        "DELETE FROM reading_records WHERE id = ? AND owner_id = ?",
        vec![row::integer(id), row::text(owner_id)],
    )
    .await?;
    info!(record_id = id, owner_id = %owner_id, "Deleted reading record");
    Ok(())
}

/// Builds the public timeline, newest first.
///
/// `viewer` is the signed-in user or anonymous session looking at the page; it
/// decides the `liked` flag and, for signed-in users, whether spoilers are masked.
pub async fn timeline(
    db: &Database,
    query: &TimelineQuery,
    viewer: Option<&Liker>,
) -> Result<Vec<TimelineEntry>, IchidanError> {
    let conn = db.connect()?;
    let page = query.pagination();

    let viewer_user_id = match viewer {
        Some(Liker::User(id)) => Some(id.as_str()),
        _ => None,
    };
    let hide_spoilers = match viewer_user_id {
        Some(user_id) => settings::get_settings(db, user_id).await?.hide_spoilers,
        None => false,
    };

    let mut sql = String::from(
        "SELECT r.id, r.owner_id, u.display_name, r.title, r.link, r.amount, r.learning,
                r.action, r.notes, r.is_spoiler, r.created_at
         FROM reading_records r
         LEFT JOIN users u ON u.id = r.owner_id",
    );
    let mut params: Vec<Value> = Vec::new();
    if let Some(slug) = query.tag.as_deref().filter(|s| !s.is_empty()) {
        sql.push_str(
            " JOIN book_tags bt ON bt.book_title = r.title
              JOIN tags t ON t.id = bt.tag_id AND t.slug = ?",
        );
        params.push(row::text(slug));
    }
    if let Some(user_id) = query.user_id.as_deref().filter(|s| !s.is_empty()) {
        sql.push_str(" WHERE r.owner_id = ?");
        params.push(row::text(user_id));
    }
    sql.push_str(&format!(
        " ORDER BY r.created_at DESC, r.id DESC LIMIT {} OFFSET {}",
        page.limit(),
        page.offset()
    ));

    let mut rows = conn.query(&sql, params).await?;
    let mut entries = Vec::new();
    while let Some(r) = rows.next().await? {
        let amount_raw: String = r.get(5)?;
        let owner_id: String = r.get(1)?;
        let is_spoiler = row::get_bool(&r, 9)?;
        let masked = is_spoiler && hide_spoilers && viewer_user_id != Some(owner_id.as_str());

        let (learning, action, notes) = if masked {
            (None, None, None)
        } else {
            (
                Some(r.get::<String>(6)?),
                Some(r.get::<String>(7)?),
                row::get_opt_text(&r, 8)?,
            )
        };

        entries.push(TimelineEntry {
            id: r.get(0)?,
            owner_id,
            author_name: row::get_opt_text(&r, 2)?,
            title: r.get(3)?,
            link: row::get_opt_text(&r, 4)?,
            amount: ReadingAmount::try_from(amount_raw.as_str())
                .map_err(IchidanError::StorageOperationFailed)?,
            learning,
            action,
            notes,
            is_spoiler,
            spoiler_hidden: masked,
            tags: Vec::new(),
            like_count: 0,
            liked: false,
            created_at: row::get_timestamp(&r, 10)?,
        });
    }

    // Likes and tags are looked up per entry; a page is at most MAX_PAGE_SIZE rows.
    let viewer_key = viewer.map(Liker::key);
    for entry in &mut entries {
        entry.like_count = likes::count_likes(&conn, entry.id).await?;
        if let Some(key) = &viewer_key {
            entry.liked = likes::has_liked(&conn, entry.id, key).await?;
        }
        entry.tags = tags::tags_for_book_on(&conn, &entry.title).await?;
    }

    Ok(entries)
}
