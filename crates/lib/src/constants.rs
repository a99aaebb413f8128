//! # Shared Constants
//!
//! Limits and defaults shared by the library and the server.

/// The default path for the main application SQLite database.
pub const DEFAULT_DB_FILE: &str = "db/ichidan.db";

/// Maximum length (in characters) of a record's book title.
pub const MAX_TITLE_CHARS: usize = 200;
/// Maximum length of the single learning written per record.
pub const MAX_LEARNING_CHARS: usize = 300;
/// Maximum length of the next action written per record.
pub const MAX_ACTION_CHARS: usize = 300;
/// Maximum length of the optional free-form notes.
pub const MAX_NOTES_CHARS: usize = 2000;
/// Maximum length of a theme name.
pub const MAX_THEME_NAME_CHARS: usize = 50;
/// Maximum length of a theme description.
pub const MAX_THEME_DESCRIPTION_CHARS: usize = 200;
/// Maximum length of a tag name.
pub const MAX_TAG_NAME_CHARS: usize = 30;

/// Number of records a theme needs before a draft may be generated.
pub const DEFAULT_DRAFT_THRESHOLD: i64 = 5;
/// Inclusive bounds accepted for the user's draft threshold setting.
pub const MIN_DRAFT_THRESHOLD: i64 = 1;
pub const MAX_DRAFT_THRESHOLD: i64 = 50;

/// Default and maximum page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// X counts CJK characters double; the limit is expressed in weighted units.
pub const X_WEIGHTED_LIMIT: usize = 280;

/// Default UTC offset (hours) used to bucket records into reading days (JST).
pub const DEFAULT_TIMEZONE_OFFSET_HOURS: i32 = 9;
