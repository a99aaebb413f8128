//! # External and Storage Providers
//!
//! - `ai`: chat-completion providers used by draft generation.
//! - `db`: the SQLite storage provider and the schema it owns.
//! - `identity`: verification of third-party ID tokens (Google).

pub mod ai;
pub mod db;
pub mod identity;
