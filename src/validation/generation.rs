use uuid::Uuid;

use crate::{
    error::ValidationError,
    models::generation::{GenerationInput, GenerationRequest},
};

/// Requires an attached, non-empty image.
pub fn require_image(image: Option<&[u8]>) -> Result<&[u8], ValidationError> {
    match image {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ValidationError::MissingImage),
    }
}

/// Requires a prompt that is not blank, and returns it trimmed.
pub fn require_prompt(prompt: &str) -> Result<&str, ValidationError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingPrompt);
    }
    Ok(trimmed)
}

/// Sniffs the mime type of `bytes` and requires an `image/*` type.
pub fn image_mime(bytes: &[u8]) -> Result<&'static str, ValidationError> {
    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(kind.mime_type()),
        _ => Err(ValidationError::NotAnImage),
    }
}

/// Turns UI input into a request.
///
/// Checks run in order: image present, prompt not blank, image type.
pub fn build_request(
    input: &GenerationInput,
    style_label: Option<String>,
) -> Result<GenerationRequest, ValidationError> {
    let image = require_image(input.image.as_deref())?;
    let prompt = require_prompt(&input.prompt)?;
    let mime = image_mime(image)?;

    Ok(GenerationRequest {
        id: Uuid::new_v4(),
        image_data: image.to_vec(),
        image_mime: mime.to_string(),
        prompt_text: prompt.to_string(),
        style_label,
    })
}
