//! # Prompt Template Modules
//!
//! Prompt templates used by the draft generator. The defaults live in
//! [`drafts`]; deployments may override them through configuration, which is
//! why they are carried around in a [`DraftPrompts`] value rather than read
//! directly from the constants.

pub mod drafts;

use crate::types::{DraftPlatform, ReadingRecord};

/// The system and user templates for draft generation.
///
/// User template placeholders: `{theme}`, `{platform}`, `{platform_rules}`, `{records}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftPrompts {
    pub system: String,
    pub user: String,
}

impl Default for DraftPrompts {
    fn default() -> Self {
        Self {
            system: drafts::DEFAULT_DRAFT_SYSTEM_PROMPT.to_string(),
            user: drafts::DEFAULT_DRAFT_USER_PROMPT.to_string(),
        }
    }
}

impl DraftPrompts {
    /// Starts from the defaults and replaces whichever templates are given.
    pub fn with_overrides(system: Option<String>, user: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            system: system.unwrap_or(defaults.system),
            user: user.unwrap_or(defaults.user),
        }
    }

    /// Fills the user template for one theme and platform.
    pub fn render_user(
        &self,
        theme: &str,
        platform: DraftPlatform,
        records: &[ReadingRecord],
    ) -> String {
        self.user
            .replace("{theme}", theme)
            .replace("{platform}", platform.label())
            .replace("{platform_rules}", drafts::platform_rules(platform))
            .replace("{records}", &drafts::format_records(records))
    }
}
