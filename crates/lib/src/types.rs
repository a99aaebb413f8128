//! # Domain Types
//!
//! Plain data structures shared between the library operations and the HTTP
//! layer. Request payloads derive `Deserialize`, stored entities derive both.

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// How much was read in a single session. The app encourages tiny steps, so
/// the smallest unit is one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingAmount {
    OneLine,
    OneParagraph,
    OnePage,
    OneChapter,
    Finished,
}

impl ReadingAmount {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingAmount::OneLine => "one_line",
            ReadingAmount::OneParagraph => "one_paragraph",
            ReadingAmount::OnePage => "one_page",
            ReadingAmount::OneChapter => "one_chapter",
            ReadingAmount::Finished => "finished",
        }
    }

    /// The Japanese label shown in the UI and used in generated drafts.
    pub fn label(&self) -> &'static str {
        match self {
            ReadingAmount::OneLine => "1行",
            ReadingAmount::OneParagraph => "1段落",
            ReadingAmount::OnePage => "1ページ",
            ReadingAmount::OneChapter => "1章",
            ReadingAmount::Finished => "読了",
        }
    }
}

impl TryFrom<&str> for ReadingAmount {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "one_line" => Ok(ReadingAmount::OneLine),
            "one_paragraph" => Ok(ReadingAmount::OneParagraph),
            "one_page" => Ok(ReadingAmount::OnePage),
            "one_chapter" => Ok(ReadingAmount::OneChapter),
            "finished" => Ok(ReadingAmount::Finished),
            other => Err(format!("Unknown reading amount '{other}'")),
        }
    }
}

impl fmt::Display for ReadingAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored reading record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub link: Option<String>,
    pub amount: ReadingAmount,
    pub learning: String,
    pub action: String,
    pub notes: Option<String>,
    pub is_spoiler: bool,
    pub theme_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The payload for logging a new reading record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReadingRecord {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    pub amount: ReadingAmount,
    pub learning: String,
    pub action: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_spoiler: bool,
    #[serde(default)]
    pub theme_id: Option<i64>,
}

/// A partial update. Absent fields are left untouched; for the nullable
/// fields an explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReadingRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub link: Option<Option<String>>,
    #[serde(default)]
    pub amount: Option<ReadingAmount>,
    #[serde(default)]
    pub learning: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub is_spoiler: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub theme_id: Option<Option<i64>>,
}

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Offset pagination parameters, clamped on read.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// Filters for the public timeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    /// A tag slug; only records whose book carries the tag are returned.
    #[serde(default)]
    pub tag: Option<String>,
    /// Restricts the timeline to a single author.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TimelineQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// A record as shown on the public timeline.
///
/// `learning`, `action` and `notes` are `None` when the record is a spoiler
/// and the viewer asked to hide spoilers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: i64,
    pub owner_id: String,
    pub author_name: Option<String>,
    pub title: String,
    pub link: Option<String>,
    pub amount: ReadingAmount,
    pub learning: Option<String>,
    pub action: Option<String>,
    pub notes: Option<String>,
    pub is_spoiler: bool,
    pub spoiler_hidden: bool,
    pub tags: Vec<Tag>,
    pub like_count: i64,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

/// The identity under which a like is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liker {
    User(String),
    Session(String),
}

impl Liker {
    /// The value stored in `likes.liker_key`.
    pub fn key(&self) -> String {
        match self {
            Liker::User(id) => format!("user:{id}"),
            Liker::Session(id) => format!("session:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub record_id: i64,
    pub like_count: i64,
    pub liked: bool,
}

/// An entry of the admin-managed tag catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// A user-defined label used to bucket records for draft generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSummary {
    #[serde(flatten)]
    pub theme: Theme,
    pub record_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTheme {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTheme {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub hide_spoilers: bool,
    pub draft_threshold: i64,
    /// `None` until the user saves settings for the first time.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettings {
    #[serde(default)]
    pub hide_spoilers: Option<bool>,
    #[serde(default)]
    pub draft_threshold: Option<i64>,
}

/// Habit statistics for the personal page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_records: i64,
    pub likes_received: i64,
    pub reading_days: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_read_on: Option<NaiveDate>,
}

/// Where a generated draft is meant to be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftPlatform {
    X,
    Note,
    Zenn,
}

impl DraftPlatform {
    pub fn label(&self) -> &'static str {
        match self {
            DraftPlatform::X => "X",
            DraftPlatform::Note => "note",
            DraftPlatform::Zenn => "Zenn",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub theme_id: i64,
    pub platform: DraftPlatform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSource {
    Ai,
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub platform: DraftPlatform,
    pub theme_id: i64,
    pub theme_name: String,
    pub content: String,
    pub source: DraftSource,
    pub record_count: usize,
    pub truncated: bool,
}
