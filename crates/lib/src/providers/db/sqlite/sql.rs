//! # SQLite Schema
//!
//! This module centralizes the table definitions owned by the application.
//! Every statement is idempotent so the list can run on each startup.

pub const CREATE_USERS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        google_sub TEXT NOT NULL UNIQUE,
        email TEXT,
        display_name TEXT,
        avatar_url TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
";

pub const CREATE_SESSIONS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
";

pub const CREATE_THEMES_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS themes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (owner_id, name),
        FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
    );
";

pub const CREATE_READING_RECORDS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS reading_records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        title TEXT NOT NULL,
        link TEXT,
        amount TEXT NOT NULL,
        learning TEXT NOT NULL,
        action TEXT NOT NULL,
        notes TEXT,
        is_spoiler INTEGER NOT NULL DEFAULT 0,
        theme_id INTEGER,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (theme_id) REFERENCES themes(id) ON DELETE SET NULL
    );
";

pub const CREATE_LIKES_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS likes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        record_id INTEGER NOT NULL,
        liker_key TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (record_id, liker_key),
        FOREIGN KEY (record_id) REFERENCES reading_records(id) ON DELETE CASCADE
    );
";

pub const CREATE_TAGS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
";

pub const CREATE_BOOK_TAGS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS book_tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tag_id INTEGER NOT NULL,
        book_title TEXT NOT NULL,
        UNIQUE (tag_id, book_title),
        FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
    );
";

pub const CREATE_USER_SETTINGS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS user_settings (
        user_id TEXT PRIMARY KEY,
        hide_spoilers INTEGER NOT NULL DEFAULT 0,
        draft_threshold INTEGER NOT NULL DEFAULT 5,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    );
";

pub const CREATE_RECORDS_OWNER_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_reading_records_owner ON reading_records (owner_id);";

pub const CREATE_BOOK_TAGS_TITLE_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_book_tags_title ON book_tags (book_title);";

/// All statements, in dependency order.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_USERS_TABLE_SQL,
    CREATE_SESSIONS_TABLE_SQL,
    CREATE_THEMES_TABLE_SQL,
    CREATE_READING_RECORDS_TABLE_SQL,
    CREATE_LIKES_TABLE_SQL,
    CREATE_TAGS_TABLE_SQL,
    CREATE_BOOK_TAGS_TABLE_SQL,
    CREATE_USER_SETTINGS_TABLE_SQL,
    CREATE_RECORDS_OWNER_INDEX_SQL,
    CREATE_BOOK_TAGS_TITLE_INDEX_SQL,
];

/// The column list matching `records::record_from_row`.
pub const RECORD_COLUMNS: &str = "id, owner_id, title, link, amount, learning, action, notes, is_spoiler, theme_id, created_at, updated_at";
