//! Input checks shared by the write operations.

use crate::errors::IchidanError;

/// Trims a required text field and checks its length in characters.
pub(crate) fn required(field: &str, value: &str, max_chars: usize) -> Result<String, IchidanError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(IchidanError::validation(format!("{field} must not be empty.")));
    }
    check_length(field, value, max_chars)?;
    Ok(value.to_string())
}

/// Trims an optional text field; blank input is stored as `NULL`.
pub(crate) fn optional(
    field: &str,
    value: Option<String>,
    max_chars: usize,
) -> Result<Option<String>, IchidanError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_length(field, v, max_chars)?;
            Ok(Some(v.to_string()))
        }
    }
}

fn check_length(field: &str, value: &str, max_chars: usize) -> Result<(), IchidanError> {
    let len = value.chars().count();
    if len > max_chars {
        return Err(IchidanError::validation(format!(
            "{field} must be at most {max_chars} characters (got {len})."
        )));
    }
    Ok(())
}

/// Links are optional but must be absolute http(s) URLs.
pub(crate) fn link(value: Option<String>) -> Result<Option<String>, IchidanError> {
    let link = optional("link", value, 2048)?;
    if let Some(url) = &link {
        let has_scheme = url.starts_with("https://") || url.starts_with("http://");
        if !has_scheme || url.contains(char::is_whitespace) {
            return Err(IchidanError::validation(
                "link must be an http:// or https:// URL.",
            ));
        }
    }
    Ok(link)
}
