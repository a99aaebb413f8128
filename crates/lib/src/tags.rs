//! # Tag Catalog
//!
//! Tags are managed by administrators and attached to books by title. A
//! reading record carries the tags of its book, and the timeline can be
//! filtered by a tag's romaji slug.

use crate::{
    constants::{MAX_TAG_NAME_CHARS, MAX_TITLE_CHARS},
    errors::IchidanError,
    row,
    text::slugify,
    types::Tag,
    validate,
};
use tracing::info;
use turso::{Connection, Database, Row};

const TAG_COLUMNS: &str = "id, name, slug, created_at";

fn tag_from_row(r: &Row) -> Result<Tag, IchidanError> {
    Ok(Tag {
        id: r.get(0)?,
        name: r.get(1)?,
        slug: r.get(2)?,
        created_at: row::get_timestamp(r, 3)?,
    })
}

async fn collect_tags(mut rows: turso::Rows) -> Result<Vec<Tag>, IchidanError> {
    let mut tags = Vec::new();
    while let Some(r) = rows.next().await? {
        tags.push(tag_from_row(&r)?);
    }
    Ok(tags)
}

async fn ensure_tag_exists(conn: &Connection, tag_id: i64) -> Result<(), IchidanError> {
    let count = row::scalar_i64(
        conn,
        "SELECT COUNT(*) FROM tags WHERE id = ?",
        vec![row::integer(tag_id)],
    )
    .await?;
    if count == 0 {
        return Err(IchidanError::not_found(format!("Tag {tag_id}")));
    }
    Ok(())
}

/// Adds a tag to the catalog. The slug is derived from the name.
pub async fn create_tag(db: &Database, name: &str) -> Result<Tag, IchidanError> {
    let name = validate::required("name", name, MAX_TAG_NAME_CHARS)?;
    let slug = slugify(&name);
    let conn = db.connect()?;

    let existing = row::scalar_i64(
        &conn,
        "SELECT COUNT(*) FROM tags WHERE name = ? OR slug = ?",
        vec![row::text(name.as_str()), row::text(slug.as_str())],
    )
    .await?;
    if existing > 0 {
        return Err(IchidanError::validation(format!(
            "A tag named '{name}' (slug '{slug}') already exists."
        )));
    }

    let mut rows = conn
        .query(
            "INSERT INTO tags (name, slug) VALUES (?, ?) RETURNING id",
            vec![row::text(name.as_str()), row::text(slug.as_str())],
        )
        .await?;
    let mut new_id = None;
    while let Some(r) = rows.next().await? {
        new_id = Some(r.get::<i64>(0)?);
    }
    let id = new_id.ok_or_else(|| {
        IchidanError::StorageOperationFailed("INSERT did not return an id".to_string())
    })?;
    info!(tag_id = id, %slug, "Created tag");

    let sql = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ?");
    let rows = conn.query(&sql, vec![row::integer(id)]).await?;
    collect_tags(rows)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| IchidanError::not_found(format!("Tag {id}")))
}

/// Lists the catalog alphabetically by slug.
pub async fn list_tags(db: &Database) -> Result<Vec<Tag>, IchidanError> {
    let conn = db.connect()?;
    let sql = format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY slug ASC");
    let rows = conn.query(&sql, ()).await?;
    collect_tags(rows).await
}

/// Removes a tag and all of its book associations.
pub async fn delete_tag(db: &Database, tag_id: i64) -> Result<(), IchidanError> {
    let conn = db.connect()?;
    ensure_tag_exists(&conn, tag_id).await?;
    conn.execute(
        "DELETE FROM book_tags WHERE tag_id = ?",
        vec![row::integer(tag_id)],
    )
    .await?;
    conn.execute("DELETE FROM tags WHERE id = ?", vec![row::integer(tag_id)])
        .await?;
    info!(tag_id, "Deleted tag");
    Ok(())
}

/// Associates a book title with a tag. Attaching twice is a no-op.
pub async fn attach_book(
    db: &Database,
    tag_id: i64,
    book_title: &str,
) -> Result<(), IchidanError> {
    let title = validate::required("book_title", book_title, MAX_TITLE_CHARS)?;
    let conn = db.connect()?;
    ensure_tag_exists(&conn, tag_id).await?;
    conn.execute(
        "INSERT INTO book_tags (tag_id, book_title) VALUES (?, ?) ON CONFLICT DO NOTHING",
        vec![row::integer(tag_id), row::text(title)],
    )
    .await?;
    Ok(())
}

/// Removes a book title from a tag.
pub async fn detach_book(
    db: &Database,
    tag_id: i64,
    book_title: &str,
) -> Result<(), IchidanError> {
    let conn = db.connect()?;
    ensure_tag_exists(&conn, tag_id).await?;
    conn.execute(
        "DELETE FROM book_tags WHERE tag_id = ? AND book_title = ?",
        vec![row::integer(tag_id), row::text(book_title.trim())],
    )
    .await?;
    Ok(())
}

pub(crate) async fn tags_for_book_on(
    conn: &Connection,
    title: &str,
) -> Result<Vec<Tag>, IchidanError> {
    let rows = conn
        .query(
            "SELECT t.id, t.name, t.slug, t.created_at
             FROM tags t JOIN book_tags bt ON bt.tag_id = t.id
             WHERE bt.book_title = ?
             ORDER BY t.slug ASC",
            vec![row::text(title)],
        )
        .await?;
    collect_tags(rows).await
}

/// The tags attached to a book title.
pub async fn tags_for_book(db: &Database, title: &str) -> Result<Vec<Tag>, IchidanError> {
    let conn = db.connect()?;
    tags_for_book_on(&conn, title.trim()).await
}
