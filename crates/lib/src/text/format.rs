//! # Platform Formatting
//!
//! Length rules for the places a draft is published to.

use crate::constants::X_WEIGHTED_LIMIT;
use crate::types::DraftPlatform;

const ELLIPSIS: char = '…';

/// The weight X assigns to a character: 1 for Latin script and common
/// punctuation, 2 for everything else (CJK, kana, emoji).
fn char_weight(c: char) -> usize {
    match c as u32 {
        0x0000..=0x10FF | 0x2000..=0x200D | 0x2010..=0x201F | 0x2032..=0x2037 => 1,
        _ => 2,
    }
}

/// The length of `text` as counted by X.
pub fn weighted_length(text: &str) -> usize {
    text.chars().map(char_weight).sum()
}

/// The maximum weighted length accepted by the platform, if any.
pub fn platform_limit(platform: DraftPlatform) -> Option<usize> {
    match platform {
        DraftPlatform::X => Some(X_WEIGHTED_LIMIT),
        DraftPlatform::Note | DraftPlatform::Zenn => None,
    }
}

/// Truncates `text` to fit `limit` weighted units, appending `…` when cut.
/// Returns the (possibly shortened) text and whether it was truncated.
pub fn truncate_weighted(text: &str, limit: usize) -> (String, bool) {
    if weighted_length(text) <= limit {
        return (text.to_string(), false);
    }

    let budget = limit.saturating_sub(char_weight(ELLIPSIS));
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = char_weight(c);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    let mut out = out.trim_end().to_string();
    out.push(ELLIPSIS);
    (out, true)
}

/// Applies the platform's length rule to `text`.
pub fn truncate_for_platform(text: &str, platform: DraftPlatform) -> (String, bool) {
    let text = text.trim();
    match platform_limit(platform) {
        Some(limit) => truncate_weighted(text, limit),
        None => (text.to_string(), false),
    }
}
