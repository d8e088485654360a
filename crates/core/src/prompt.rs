//! Prompt construction for the AI writing helpers.

use crate::error::CoreError;

/// Longest user message accepted for a single generation request.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Image sizes the character generator accepts.
pub const IMAGE_SIZES: &[&str] = &["1024x1024", "1792x1024", "1024x1792"];

/// Size used when the request does not name one.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Validate a free-form message sent by the user.
pub fn validate_message(message: &str) -> Result<(), CoreError> {
    if message.trim().is_empty() {
        return Err(CoreError::Validation("Message must not be blank".into()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

/// Resolve the requested image size, falling back to the default.
pub fn resolve_image_size(size: Option<&str>) -> Result<&'static str, CoreError> {
    match size.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_IMAGE_SIZE),
        Some(size) => IMAGE_SIZES
            .iter()
            .copied()
            .find(|s| *s == size)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid image size '{size}'. Must be one of: {IMAGE_SIZES:?}"
                ))
            }),
    }
}

const STORYLINE_INTRO: &str = "Please generate story about: ";
const STORYLINE_OUTRO: &str = " Only provide structure of story not whole story.";

/// Prompt asking for the outline of a story about `message`.
///
/// The message is quoted verbatim, with one space on each side of the
/// quotes in addition to the spaces the intro and outro already carry.
pub fn storyline_prompt(message: &str) -> String {
    format!("{STORYLINE_INTRO} '{message}' {STORYLINE_OUTRO}")
}

/// Prompt asking for a character reference sheet in T-pose.
pub fn character_prompt(message: &str) -> String {
    format!(
        "Please generate character follow this prompt in T-pose so image can be use as \
         reference for future generation. The prompt is: '{}'",
        message.trim()
    )
}
