//! Input checks for the prompt and API key fields.

use crate::error::ValidationError;

/// Example hint shown in the prompt field; submitting it verbatim is rejected.
pub const PROMPT_PLACEHOLDER: &str = "A friendly robot mascot for a coding assistant app";

/// Validate an icon description.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyPrompt`] for blank input and
/// [`ValidationError::PlaceholderPrompt`] for the untouched hint text.
pub fn validate_prompt(text: &str) -> Result<(), ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    if text == PROMPT_PLACEHOLDER {
        return Err(ValidationError::PlaceholderPrompt);
    }
    Ok(())
}

/// Validate an API key. Only blank keys are rejected.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyKey`] if the key is blank.
pub fn validate_api_key(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::EmptyKey)
    } else {
        Ok(())
    }
}
