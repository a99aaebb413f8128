//! # Ichidan-Dokusho Core Library
//!
//! This crate holds the domain logic for the "one-step reading" habit tracker:
//! reading records, likes, the tag catalog, writing themes, user settings,
//! habit statistics and AI-assisted draft generation. It also provides the
//! SQLite storage provider and the external AI and identity providers.
//!
//! Every operation takes a `turso::Database` handle and issues parameterized
//! SQL against a fresh connection. No state is kept in-process.

pub mod constants;
pub mod drafts;
pub mod errors;
pub mod likes;
pub mod prompts;
pub mod providers;
pub mod records;
pub mod settings;
pub mod stats;
pub mod tags;
pub mod text;
pub mod themes;
pub mod types;

mod row;
mod validate;

pub use errors::IchidanError;
pub use prompts::DraftPrompts;
pub use types::{
    Draft, DraftPlatform, DraftRequest, DraftSource, LikeStatus, Liker, NewReadingRecord,
    NewTheme, Pagination, ReadingAmount, ReadingRecord, Tag, Theme, ThemeSummary, TimelineEntry,
    TimelineQuery, UpdateReadingRecord, UpdateSettings, UpdateTheme, UserSettings, UserStats,
};
