//! # Likes
//!
//! A like is keyed by `(record_id, liker_key)`. The pair is `UNIQUE` in the
//! schema and inserted with `ON CONFLICT DO NOTHING`, so liking twice is a
//! no-op rather than an error.

use crate::{
    errors::IchidanError,
    records, row,
    types::{LikeStatus, Liker},
};
use tracing::info;
use turso::{Connection, Database};

pub(crate) async fn count_likes(conn: &Connection, record_id: i64) -> Result<i64, IchidanError> {
    row::scalar_i64(
        conn,
        "SELECT COUNT(*) FROM likes WHERE record_id = ?",
        vec![row::integer(record_id)],
    )
    .await
}

pub(crate) async fn has_liked(
    conn: &Connection,
    record_id: i64,
    liker_key: &str,
) -> Result<bool, IchidanError> {
    let count = row::scalar_i64(
        conn,
        "SELECT COUNT(*) FROM likes WHERE record_id = ? AND liker_key = ?",
        vec![row::integer(record_id), row::text(liker_key)],
    )
    .await?;
    Ok(count > 0)
}

async fn status(
    conn: &Connection,
    record_id: i64,
    liker: Option<&Liker>,
) -> Result<LikeStatus, IchidanError> {
    let liked = match liker {
        Some(l) => has_liked(conn, record_id, &l.key()).await?,
        None => false,
    };
    Ok(LikeStatus {
        record_id,
        like_count: count_likes(conn, record_id).await?,
        liked,
    })
}

/// Likes a record. Repeating the call leaves the count unchanged.
pub async fn like_record(
    db: &Database,
    record_id: i64,
    liker: &Liker,
) -> Result<LikeStatus, IchidanError> {
    let conn = db.connect()?;
    records::ensure_exists(&conn, record_id).await?;

    let inserted = conn
        .execute(
            "INSERT INTO likes (record_id, liker_key) VALUES (?, ?) ON CONFLICT DO NOTHING",
            vec![row::integer(record_id), row::text(liker.key())],
        )
        .await?;
    if inserted > 0 {
        info!(record_id, liker = %liker.key(), "Record liked");
    }

    status(&conn, record_id, Some(liker)).await
}

/// Removes a like. Unliking a record that was never liked is a no-op.
pub async fn unlike_record(
    db: &Database,
    record_id: i64,
    liker: &Liker,
) -> Result<LikeStatus, IchidanError> {
    let conn = db.connect()?;
    records::ensure_exists(&conn, record_id).await?;

    conn.execute(
        "DELETE FROM likes WHERE record_id = ? AND liker_key = ?",
        vec![row::integer(record_id), row::text(liker.key())],
    )
    .await?;

    status(&conn, record_id, Some(liker)).await
}

/// Returns the like count and whether `liker` (if any) has liked the record.
pub async fn like_status(
    db: &Database,
    record_id: i64,
    liker: Option<&Liker>,
) -> Result<LikeStatus, IchidanError> {
    let conn = db.connect()?;
    records::ensure_exists(&conn, record_id).await?;
    status(&conn, record_id, liker).await
}
