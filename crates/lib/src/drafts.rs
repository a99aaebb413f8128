//! # Draft Generation
//!
//! Turns the records filed under one of a user's themes into a post for X,
//! note or Zenn. When an AI provider is configured the prompt templates are
//! sent to it; when it is missing or fails, a static template is filled in
//! from the records instead, so the user always gets a draft back.

use crate::{
    errors::IchidanError,
    prompts::DraftPrompts,
    providers::ai::AiProvider,
    records, settings,
    text::truncate_for_platform,
    themes,
    types::{Draft, DraftPlatform, DraftRequest, DraftSource, ReadingRecord},
};
use tracing::{debug, info, warn};
use turso::Database;

const HASHTAG: &str = "#一段読書";

/// Builds a draft from the owner's records for `request.theme_id`.
///
/// Fails with a validation error while the theme holds fewer records than
/// the owner's `draft_threshold`.
pub async fn generate_draft(
    db: &Database,
    ai_provider: Option<&dyn AiProvider>,
    prompts: &DraftPrompts,
    owner_id: &str,
    request: DraftRequest,
) -> Result<Draft, IchidanError> {
    let theme = themes::get_theme(db, owner_id, request.theme_id).await?;
    let records = records::list_theme_records(db, owner_id, theme.id).await?;
    let threshold = settings::get_settings(db, owner_id).await?.draft_threshold;

    let have = records.len() as i64;
    if have < threshold {
        return Err(IchidanError::validation(format!(
            "Theme '{}' has {have} record(s); {} more needed to generate a draft.",
            theme.name,
            threshold - have
        )));
    }

    let fallback = || {
        (
            template_draft(&theme.name, request.platform, &records),
            DraftSource::Template,
        )
    };
    let (raw, source) = match ai_provider {
        Some(ai) => {
            let user_prompt = prompts.render_user(&theme.name, request.platform, &records);
            debug!(
                system_prompt = %prompts.system,
                user_prompt = %user_prompt,
                "--> Sending draft prompt to LLM"
            );
            match ai.generate(&prompts.system, &user_prompt).await {
                Ok(content) if !content.trim().is_empty() => (content, DraftSource::Ai),
                Ok(_) => {
                    warn!(theme_id = theme.id, "AI returned an empty draft, using template");
                    fallback()
                }
                Err(e) => {
                    warn!(theme_id = theme.id, error = %e, "AI draft failed, using template");
                    fallback()
                }
            }
        }
        None => fallback(),
    };

    let (content, truncated) = truncate_for_platform(&raw, request.platform);
    info!(
        theme_id = theme.id,
        platform = request.platform.label(),
        ?source,
        truncated,
        "Generated draft"
    );

    Ok(Draft {
        platform: request.platform,
        theme_id: theme.id,
        theme_name: theme.name,
        content,
        source,
        record_count: records.len(),
        truncated,
    })
}

/// The static draft used when no AI output is available.
pub fn template_draft(theme: &str, platform: DraftPlatform, records: &[ReadingRecord]) -> String {
    match platform {
        DraftPlatform::X => {
            let Some(latest) = records.last() else {
                return format!("「{theme}」について読書中。{HASHTAG}");
            };
            format!(
                "「{theme}」について{}件の記録から。\
                 最近の学びは「{}」。次は「{}」を実践します。{HASHTAG}",
                records.len(),
                latest.learning,
                latest.action
            )
        }
        DraftPlatform::Note => {
            let mut out = format!(
                "{theme}について、少しずつ読み進めた{}件の記録をまとめました。\n",
                records.len()
            );
            for r in records {
                out.push_str(&format!(
                    "\n■ 『{}』({})\n学んだこと: {}\n次の行動: {}\n",
                    r.title,
                    r.amount.label(),
                    r.learning,
                    r.action
                ));
            }
            out.push_str("\n一段ずつでも、続けることで見えてくるものがあります。");
            out
        }
        DraftPlatform::Zenn => {
            let mut out = format!("# {theme}\n\n## 読んだ本と学び\n");
            for r in records {
                out.push_str(&format!(
                    "\n### {}\n\n- 学び: {}\n- 行動: {}\n",
                    r.title, r.learning, r.action
                ));
                if let Some(link) = &r.link {
                    out.push_str(&format!("- リンク: {link}\n"));
                }
            }
            out.push_str(&format!(
                "\n## まとめ\n\n{}件の記録から得た学びを、日々の行動に落とし込んでいきます。\n",
                records.len()
            ));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{text::weighted_length, types::ReadingAmount};
    use chrono::Utc;

    fn record(title: &str, learning: &str, action: &str) -> ReadingRecord {
        ReadingRecord {
            id: 1,
            owner_id: "u".to_string(),
            title: title.to_string(),
            link: Some("https://example.com/book".to_string()),
            amount: ReadingAmount::OnePage,
            learning: learning.to_string(),
            action: action.to_string(),
            notes: None,
            is_spoiler: false,
            theme_id: Some(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn x_template_uses_latest_record() {
        let records = vec![
            record("本A", "古い学び", "古い行動"),
            record("本B", "朝の時間は集中できる", "6時に起きる"),
        ];
        let draft = template_draft("習慣", DraftPlatform::X, &records);
        assert!(draft.contains("2件"));
        assert!(draft.contains("朝の時間は集中できる"));
        assert!(!draft.contains("古い学び"));
        assert!(draft.ends_with(HASHTAG));
    }

    #[test]
    fn zenn_template_is_markdown_with_every_book() {
        let records = vec![record("本A", "学びA", "行動A"), record("本B", "学びB", "行動B")];
        let draft = template_draft("習慣", DraftPlatform::Zenn, &records);
        assert!(draft.starts_with("# 習慣"));
        assert!(draft.contains("### 本A"));
        assert!(draft.contains("### 本B"));
        assert!(draft.contains("## まとめ"));
        assert!(draft.contains("https://example.com/book"));
    }

    #[test]
    fn long_x_template_still_fits_after_formatting() {
        let long = "とても長い学び".repeat(40);
        let records = vec![record("本", &long, "行動")];
        let draft = template_draft("習慣", DraftPlatform::X, &records);
        let (content, truncated) = truncate_for_platform(&draft, DraftPlatform::X);
        assert!(truncated);
        assert!(weighted_length(&content) <= 280);
    }
}
