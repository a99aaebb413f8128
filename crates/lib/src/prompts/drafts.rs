//! # Draft Prompt Templates

use crate::types::{DraftPlatform, ReadingRecord};

/// The default system prompt for draft generation.
pub const DEFAULT_DRAFT_SYSTEM_PROMPT: &str = "You are an editor who helps readers turn short reading notes into posts for social and blogging platforms. Write in natural Japanese, in the first person, as the reader. Only use facts that appear in the notes. Never invent quotes, page numbers or book contents. Output the post body only, without a preamble or surrounding quotes.";

/// The default user prompt for draft generation.
///
/// Placeholders: `{theme}`, `{platform}`, `{platform_rules}`, `{records}`
pub const DEFAULT_DRAFT_USER_PROMPT: &str = r#"# TASK
Write a {platform} post about the theme "{theme}" based on the reading records below.

# PLATFORM RULES
{platform_rules}

# READING RECORDS
{records}"#;

/// Writing rules for each platform, substituted into `{platform_rules}`.
pub fn platform_rules(platform: DraftPlatform) -> &'static str {
    match platform {
        DraftPlatform::X => "- Keep it within 140 Japanese characters (280 weighted characters).\n- One short insight and one next action.\n- At most two hashtags, placed at the end.",
        DraftPlatform::Note => "- 800 to 1500 Japanese characters.\n- A friendly essay: an opening, what I learned from each book, and what I will try next.\n- Use short paragraphs and no Markdown headings deeper than ##.",
        DraftPlatform::Zenn => "- Markdown article with a `#` title and `##` sections.\n- Summarize each book's learning and the concrete action taken.\n- End with a short \"まとめ\" section.",
    }
}

/// Renders records as a numbered list for the `{records}` placeholder.
pub fn format_records(records: &[ReadingRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut entry = format!(
                "{}. 『{}』 ({})\n   - 学び: {}\n   - 行動: {}",
                i + 1,
                r.title,
                r.amount.label(),
                r.learning,
                r.action
            );
            if let Some(notes) = &r.notes {
                entry.push_str(&format!("\n   - メモ: {notes}"));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n")
}
