//! Text utilities: tag slug transliteration and platform length rules.

pub mod format;
pub mod romaji;

pub use format::{truncate_for_platform, weighted_length};
pub use romaji::{slugify, to_romaji};
